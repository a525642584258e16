//! `photocap-server` - write-only image persistence service
//!
//! Exposes a single HTTP write operation (`POST /api/images`) that appends
//! an image payload to a durable collection with a server-assigned
//! timestamp. There is no read surface; the service is a best-effort mirror
//! target for the photocap client.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod store;

pub use api::{router, AppState};
pub use config::Config;
pub use error::{Error, Result};
pub use store::{ImageStore, SavedImage, SqliteImageStore};
