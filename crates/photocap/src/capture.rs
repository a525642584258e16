//! Portable capture encoding for photocap.
//!
//! This module defines the encoded form of a captured frame and the
//! conversions between raw raster buffers and that form.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::imageops::FilterType;
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix carried by every encoded capture.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A captured frame in its portable, self-describing encoded form.
///
/// The encoding is a lossless PNG wrapped in a base64 data URI, so the same
/// string round-trips through the local slot, the wire, and the remote
/// collection unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapturedImage {
    data: String,
}

impl CapturedImage {
    /// Encode a raster buffer into a PNG data URI.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn from_frame(frame: &RgbImage) -> Result<Self> {
        let mut png = Vec::new();
        frame.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            data: format!("{DATA_URI_PREFIX}{}", BASE64.encode(&png)),
        })
    }

    /// Wrap an already-encoded string, e.g. one reloaded from the slot.
    #[must_use]
    pub fn from_encoded(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// The encoded string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Consume the capture, yielding the encoded string.
    #[must_use]
    pub fn into_data(self) -> String {
        self.data
    }

    /// Length of the encoded string in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }

    /// Decode back into a raster buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a PNG data URI or the payload
    /// does not decode.
    pub fn to_frame(&self) -> Result<RgbImage> {
        let payload = self
            .data
            .strip_prefix(DATA_URI_PREFIX)
            .ok_or(Error::InvalidDataUri)?;
        let png = BASE64.decode(payload)?;
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)?;
        Ok(decoded.to_rgb8())
    }
}

impl std::fmt::Display for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data)
    }
}

/// Scale a raw frame into the fixed-dimension raster buffer.
///
/// Frames already at the target dimensions pass through unchanged.
#[must_use]
pub fn fit_to_raster(frame: &RgbImage, width: u32, height: u32) -> RgbImage {
    if frame.dimensions() == (width, height) {
        return frame.clone();
    }
    image::imageops::resize(frame, width, height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid_frame(width: u32, height: u32, pixel: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(pixel))
    }

    #[test]
    fn test_from_frame_produces_data_uri() {
        let frame = solid_frame(4, 3, [10, 20, 30]);
        let image = CapturedImage::from_frame(&frame).unwrap();
        assert!(image.as_str().starts_with(DATA_URI_PREFIX));
        assert!(image.encoded_len() > DATA_URI_PREFIX.len());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let frame = solid_frame(8, 6, [200, 100, 50]);
        let image = CapturedImage::from_frame(&frame).unwrap();
        let decoded = image.to_frame().unwrap();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([200, 100, 50]));
        assert_eq!(decoded.get_pixel(7, 5), &Rgb([200, 100, 50]));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let frame = solid_frame(4, 4, [1, 2, 3]);
        let first = CapturedImage::from_frame(&frame).unwrap();
        let second = CapturedImage::from_frame(&frame).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_to_frame_rejects_missing_prefix() {
        let image = CapturedImage::from_encoded("iVBORw0KGgo=");
        let err = image.to_frame().unwrap_err();
        assert!(matches!(err, Error::InvalidDataUri));
    }

    #[test]
    fn test_to_frame_rejects_bad_base64() {
        let image = CapturedImage::from_encoded(format!("{DATA_URI_PREFIX}!!!not base64!!!"));
        let err = image.to_frame().unwrap_err();
        assert!(matches!(err, Error::Base64Decode(_)));
    }

    #[test]
    fn test_serializes_as_bare_string() {
        let image = CapturedImage::from_encoded("data:image/png;base64,AAAA");
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, "\"data:image/png;base64,AAAA\"");

        let back: CapturedImage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_fit_to_raster_passes_through_matching_dimensions() {
        let frame = solid_frame(300, 200, [9, 9, 9]);
        let fitted = fit_to_raster(&frame, 300, 200);
        assert_eq!(fitted, frame);
    }

    #[test]
    fn test_fit_to_raster_scales_to_target() {
        let frame = solid_frame(640, 480, [40, 50, 60]);
        let fitted = fit_to_raster(&frame, 300, 200);
        assert_eq!(fitted.dimensions(), (300, 200));
        // A solid frame stays solid through resampling.
        assert_eq!(fitted.get_pixel(150, 100), &Rgb([40, 50, 60]));
    }

    #[test]
    fn test_display_matches_encoded_string() {
        let image = CapturedImage::from_encoded("data:image/png;base64,QUJD");
        assert_eq!(image.to_string(), "data:image/png;base64,QUJD");
    }
}
