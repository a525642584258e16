//! Best-effort mirror of captures to the remote write endpoint.
//!
//! Uploads are attempted exactly once on a detached task. The caller never
//! awaits the outcome; success and failure are both swallowed after a
//! diagnostic log. There is no retry, no backoff, and no timeout.

use serde::Serialize;
use tracing::{debug, warn};

use crate::capture::CapturedImage;

/// Body of the remote write endpoint.
#[derive(Debug, Clone, Serialize)]
struct UploadRequest {
    #[serde(rename = "imageData")]
    image_data: String,
}

/// The pipeline-facing seam for mirroring captures.
///
/// Implementations must not block on, surface, or retry the outcome.
pub trait Uploader: Send + Sync {
    /// Dispatch one capture to the mirror.
    fn upload(&self, image: &CapturedImage);
}

/// HTTP uploader posting captures to the remote write endpoint.
#[derive(Debug, Clone)]
pub struct SyncClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SyncClient {
    /// Create a client targeting the given write endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The configured write endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Spawn the detached `POST`.
    ///
    /// The returned handle exists so tests can observe completion; the
    /// pipeline drops it. Must be called within a tokio runtime.
    pub fn dispatch(&self, image: &CapturedImage) -> tokio::task::JoinHandle<()> {
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        let body = UploadRequest {
            image_data: image.as_str().to_string(),
        };
        tokio::spawn(async move {
            match http.post(&endpoint).json(&body).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(endpoint = %endpoint, status = %response.status(), "capture mirrored");
                }
                Ok(response) => {
                    warn!(endpoint = %endpoint, status = %response.status(), "mirror rejected the capture");
                }
                Err(err) => {
                    warn!(endpoint = %endpoint, "mirror unreachable: {err}");
                }
            }
        })
    }
}

impl Uploader for SyncClient {
    fn upload(&self, image: &CapturedImage) {
        let _detached = self.dispatch(image);
    }
}
