//! HTTP surface of the persistence service.
//!
//! One stateless write route. Each request is independent; there is no
//! retry or queueing on failure, and no read, update, delete, or list
//! operation exists.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::store::ImageStore;

/// Request bodies above this size are rejected outright.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// The backing image collection.
    pub store: Arc<dyn ImageStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Body of the write endpoint.
#[derive(Debug, Deserialize)]
pub struct SaveImageRequest {
    /// The encoded image payload.
    #[serde(rename = "imageData")]
    pub image_data: Option<String>,
}

/// Build the service router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/images", post(save_image))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// `POST /api/images`.
///
/// A missing or null `imageData` is rejected rather than persisted as a
/// null record.
async fn save_image(
    State(state): State<AppState>,
    Json(body): Json<SaveImageRequest>,
) -> Response {
    let Some(image_data) = body.image_data else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": "imageData is required" })),
        )
            .into_response();
    };

    match state.store.save(&image_data).await {
        Ok(saved) => {
            info!("Image {} saved ({} bytes)", saved.id, saved.data.len());
            (
                StatusCode::CREATED,
                Json(serde_json::json!({ "message": "Image saved successfully" })),
            )
                .into_response()
        }
        Err(err) => {
            error!("Failed to save image: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "message": "Error saving image",
                    "error": err.to_string(),
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteImageStore;
    use chrono::Utc;

    fn in_memory_state() -> AppState {
        AppState {
            store: Arc::new(SqliteImageStore::open_in_memory().unwrap()),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_save_image_persists_and_responds_201() {
        let state = in_memory_state();
        let before = Utc::now();

        let response = save_image(
            State(state.clone()),
            Json(SaveImageRequest {
                image_data: Some("abc".to_string()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Image saved successfully");

        let recent = state.store.recent(1).await.unwrap();
        assert_eq!(recent[0].data, "abc");
        assert!(recent[0].timestamp >= before);
    }

    #[tokio::test]
    async fn test_missing_image_data_is_rejected() {
        // The field is required; a payload without it never reaches the
        // store.
        let state = in_memory_state();

        let response = save_image(
            State(state.clone()),
            Json(SaveImageRequest { image_data: None }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "imageData is required");
        assert_eq!(state.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_500() {
        #[derive(Debug)]
        struct FailingStore;

        #[async_trait::async_trait]
        impl ImageStore for FailingStore {
            async fn save(&self, _data: &str) -> crate::error::Result<crate::store::SavedImage> {
                Err(crate::error::Error::ConfigValidation {
                    message: "store unreachable".to_string(),
                })
            }

            async fn count(&self) -> crate::error::Result<i64> {
                Ok(0)
            }

            async fn recent(
                &self,
                _limit: usize,
            ) -> crate::error::Result<Vec<crate::store::SavedImage>> {
                Ok(Vec::new())
            }
        }

        let state = AppState {
            store: Arc::new(FailingStore),
        };

        let response = save_image(
            State(state),
            Json(SaveImageRequest {
                image_data: Some("abc".to_string()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Error saving image");
        assert!(body["error"].as_str().unwrap().contains("store unreachable"));
    }

    #[tokio::test]
    async fn test_writes_append_in_order() {
        let state = in_memory_state();
        for payload in ["one", "two", "three"] {
            let response = save_image(
                State(state.clone()),
                Json(SaveImageRequest {
                    image_data: Some(payload.to_string()),
                }),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let recent = state.store.recent(3).await.unwrap();
        let payloads: Vec<_> = recent.iter().map(|img| img.data.as_str()).collect();
        assert_eq!(payloads, vec!["three", "two", "one"]);
    }
}
