//! `photocap` - a frame capture pipeline with a best-effort storage mirror
//!
//! This library captures frames from a video input device into a fixed-size
//! raster buffer, encodes them as portable PNG data URIs, persists them in
//! an ordered local slot that survives restarts, and mirrors each capture to
//! a remote persistence service without awaiting the outcome.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod capture;
pub mod cli;
pub mod config;
pub mod device;
pub mod engine;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod store;
pub mod sync;

pub use capture::CapturedImage;
pub use config::Config;
pub use engine::{CaptureEngine, EngineState};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use pipeline::CapturePipeline;
pub use store::LocalImageStore;
pub use sync::{SyncClient, Uploader};
