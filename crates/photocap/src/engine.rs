//! The capture engine state machine.
//!
//! Two states: `Idle` and `Streaming`. Acquiring the configured device moves
//! the engine to `Streaming`; releasing it moves back to `Idle`. A failed
//! acquisition leaves the engine untouched.

use tracing::{debug, info};

use crate::capture::{fit_to_raster, CapturedImage};
use crate::config::CaptureConfig;
use crate::device::{self, FrameSource};
use crate::error::{Error, Result};

/// Engine lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No live stream; captures are ignored.
    Idle,
    /// A frame source is live and captures are served from it.
    Streaming,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Streaming => write!(f, "streaming"),
        }
    }
}

/// Drives a frame source and produces encoded captures.
///
/// The streaming flag is explicit engine state; nothing here is global.
#[derive(Debug)]
pub struct CaptureEngine {
    config: CaptureConfig,
    state: EngineState,
    source: Option<Box<dyn FrameSource>>,
    frames_captured: u64,
}

impl CaptureEngine {
    /// Create an idle engine for the given capture configuration.
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            state: EngineState::Idle,
            source: None,
            frames_captured: 0,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Check if a frame source is live.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.state == EngineState::Streaming
    }

    /// Number of frames captured since construction.
    #[must_use]
    pub fn frames_captured(&self) -> u64 {
        self.frames_captured
    }

    /// Acquire the configured device and begin streaming.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the device is denied or
    /// absent (the engine stays `Idle`), or [`Error::AlreadyStreaming`] if a
    /// stream is already live.
    pub fn start(&mut self) -> Result<()> {
        if self.is_streaming() {
            return Err(Error::AlreadyStreaming);
        }
        let source = device::open(&self.config)?;
        info!("streaming from '{}'", source.name());
        self.source = Some(source);
        self.state = EngineState::Streaming;
        Ok(())
    }

    /// Capture the current frame into the fixed raster buffer and encode it.
    ///
    /// Returns `None` without side effects when the engine is idle.
    ///
    /// # Errors
    ///
    /// Returns an error if the source stops producing frames or encoding
    /// fails.
    pub fn capture_frame(&mut self) -> Result<Option<CapturedImage>> {
        let Some(source) = self.source.as_mut() else {
            debug!("capture requested while idle; ignoring");
            return Ok(None);
        };
        let frame = source.next_frame()?;
        let raster = fit_to_raster(&frame, self.config.width, self.config.height);
        let image = CapturedImage::from_frame(&raster)?;
        self.frames_captured += 1;
        Ok(Some(image))
    }

    /// Release the frame source and return to idle.
    ///
    /// Safe to call when already idle.
    pub fn stop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            info!("released '{}'", source.name());
        }
        self.state = EngineState::Idle;
    }
}

impl Drop for CaptureEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
