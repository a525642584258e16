//! Frame sources for the capture engine.
//!
//! A [`FrameSource`] is a live video input session. The engine only ever
//! talks to this trait; camera backends (V4L2 and friends) plug in behind it
//! the same way the built-in test pattern does.

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::config::CaptureConfig;
use crate::error::{Error, Result};

/// Name of the built-in synthetic device.
pub const TEST_PATTERN_DEVICE: &str = "test-pattern";

/// A live video input session.
///
/// Implementors own the underlying device for the lifetime of the session
/// and must release it exactly once via [`FrameSource::release`].
pub trait FrameSource: Send + std::fmt::Debug {
    /// The name of this source (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Read the current frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the device stops producing frames.
    fn next_frame(&mut self) -> Result<RgbImage>;

    /// Release the underlying device. Called once when the session ends.
    fn release(&mut self);
}

/// Acquire the device named in the capture configuration.
///
/// # Errors
///
/// Returns [`Error::DeviceUnavailable`] if the device is absent or access
/// was denied.
pub fn open(config: &CaptureConfig) -> Result<Box<dyn FrameSource>> {
    match config.device.as_str() {
        TEST_PATTERN_DEVICE => Ok(Box::new(TestPatternSource::new(
            config.width,
            config.height,
        ))),
        other => Err(Error::device_unavailable(
            other,
            "no backend for this device is available",
        )),
    }
}

/// Synthetic moving-gradient source used for development and tests.
///
/// Produces a horizontal/vertical gradient whose blue channel shifts every
/// frame, so consecutive captures are distinguishable.
#[derive(Debug)]
pub struct TestPatternSource {
    width: u32,
    height: u32,
    tick: u32,
    released: bool,
}

impl TestPatternSource {
    /// Create a test pattern emitting frames of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            tick: 0,
            released: false,
        }
    }

    /// Whether [`FrameSource::release`] has been called.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FrameSource for TestPatternSource {
    fn name(&self) -> &'static str {
        TEST_PATTERN_DEVICE
    }

    fn next_frame(&mut self) -> Result<RgbImage> {
        let (width, height, tick) = (self.width, self.height, self.tick);
        self.tick = self.tick.wrapping_add(1);
        let shift = u8::try_from(tick.wrapping_mul(31) % 256).unwrap_or(0);
        Ok(RgbImage::from_fn(width, height, |x, y| {
            let r = u8::try_from(x * 255 / width).unwrap_or(255);
            let g = u8::try_from(y * 255 / height).unwrap_or(255);
            Rgb([r, g, shift])
        }))
    }

    fn release(&mut self) {
        self.released = true;
        debug!("test pattern released after {} frame(s)", self.tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(device: &str) -> CaptureConfig {
        CaptureConfig {
            device: device.to_string(),
            width: 32,
            height: 24,
        }
    }

    #[test]
    fn test_open_test_pattern() {
        let source = open(&test_config(TEST_PATTERN_DEVICE)).unwrap();
        assert_eq!(source.name(), TEST_PATTERN_DEVICE);
    }

    #[test]
    fn test_open_unknown_device_is_unavailable() {
        let err = open(&test_config("/dev/video0")).unwrap_err();
        assert!(err.is_device_unavailable());
        assert!(err.to_string().contains("/dev/video0"));
    }

    #[test]
    fn test_pattern_frame_dimensions() {
        let mut source = TestPatternSource::new(32, 24);
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.dimensions(), (32, 24));
    }

    #[test]
    fn test_pattern_frames_change_over_time() {
        let mut source = TestPatternSource::new(16, 16);
        let first = source.next_frame().unwrap();
        let second = source.next_frame().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_pattern_zero_dimensions_clamped() {
        let mut source = TestPatternSource::new(0, 0);
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.dimensions(), (1, 1));
    }

    #[test]
    fn test_release_marks_source() {
        let mut source = TestPatternSource::new(8, 8);
        assert!(!source.is_released());
        source.release();
        assert!(source.is_released());
    }
}
