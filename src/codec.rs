//! Image codec bridge: canvas snapshot → PNG bytes → base64 data URI.
//!
//! Encoding happens entirely in memory. The base64 output is what gets
//! inlined into the vision request payload, so it is regenerated from the
//! latest snapshot on every analyze — never cached across edits.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
    #[error("cannot encode an empty pixel buffer")]
    EmptyBuffer,
}

/// Encode an RGBA buffer as a base64 PNG string (no data-URI prefix).
pub fn encode_png_base64(img: &RgbaImage) -> Result<String, EncodeError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(EncodeError::EmptyBuffer);
    }
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ColorType::Rgba8,
    )?;
    Ok(BASE64.encode(&png))
}

/// Wrap a base64 PNG string as an inline data URI.
pub fn data_uri(base64_png: &str) -> String {
    format!("data:image/png;base64,{}", base64_png)
}
