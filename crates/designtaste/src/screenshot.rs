//! Screenshot capture and cropping.
//!
//! A capture host (the browser tab in production) produces a PNG data URI of
//! the visible viewport. The element screenshot is cut out of that image
//! using the element's bounding box scaled by the device pixel ratio, with a
//! small padding, and never smaller than 100x100 output pixels.

use std::io::Cursor;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};
use thiserror::Error;

use crate::element::BoundingBox;

/// Padding around the element, in CSS pixels.
pub const CROP_PADDING: f64 = 8.0;
/// Minimum output width and height, in pixels.
pub const MIN_OUTPUT_SIZE: u32 = 100;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Error, Debug)]
pub enum ScreenshotError {
    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Not a base64 data URI")]
    NotDataUri,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Bounding box has no area")]
    EmptyRegion,

    #[error("Bounding box lies outside the {width}x{height} viewport image")]
    OutOfBounds { width: u32, height: u32 },
}

/// Something that can photograph the visible viewport.
#[async_trait]
pub trait CaptureHost: Send + Sync {
    /// Returns a PNG data URI of the visible viewport.
    async fn capture_visible(&self) -> Result<String, ScreenshotError>;
}

/// Decodes the payload of a `data:<mime>;base64,<payload>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ScreenshotError> {
    let rest = uri.strip_prefix("data:").ok_or(ScreenshotError::NotDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(ScreenshotError::NotDataUri)?;
    if !meta.ends_with(";base64") {
        return Err(ScreenshotError::NotDataUri);
    }
    Ok(STANDARD.decode(payload.trim())?)
}

/// Encodes an image as a PNG data URI.
pub fn encode_png_data_uri(img: &DynamicImage) -> Result<String, ScreenshotError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(&buf)))
}

/// Cuts the element out of a viewport screenshot.
pub fn crop_to_element(
    viewport_uri: &str,
    bbox: &BoundingBox,
    device_pixel_ratio: f64,
) -> Result<String, ScreenshotError> {
    if !(bbox.width.is_finite() && bbox.height.is_finite())
        || bbox.width <= 0.0
        || bbox.height <= 0.0
    {
        return Err(ScreenshotError::EmptyRegion);
    }
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };

    let bytes = decode_data_uri(viewport_uri)?;
    let img = image::load_from_memory(&bytes)?;
    let (img_w, img_h) = img.dimensions();
    let out_of_bounds = ScreenshotError::OutOfBounds {
        width: img_w,
        height: img_h,
    };
    if !(bbox.x.is_finite() && bbox.y.is_finite()) {
        return Err(out_of_bounds);
    }

    let sx = ((bbox.x - CROP_PADDING) * dpr).max(0.0).floor() as u32;
    let sy = ((bbox.y - CROP_PADDING) * dpr).max(0.0).floor() as u32;
    if sx >= img_w || sy >= img_h {
        return Err(out_of_bounds);
    }
    let padded_w = bbox.width + CROP_PADDING * 2.0;
    let padded_h = bbox.height + CROP_PADDING * 2.0;
    // Clamp in f64 so an oversized box never saturates the cast.
    let sw = (padded_w * dpr).ceil().min(f64::from(img_w - sx)).max(1.0) as u32;
    let sh = (padded_h * dpr).ceil().min(f64::from(img_h - sy)).max(1.0) as u32;

    // Output never exceeds the visible slice that was actually cropped.
    let out_w = (padded_w.min(f64::from(sw) / dpr).round() as u32).max(MIN_OUTPUT_SIZE);
    let out_h = (padded_h.min(f64::from(sh) / dpr).round() as u32).max(MIN_OUTPUT_SIZE);

    let cropped = img
        .crop_imm(sx, sy, sw, sh)
        .resize_exact(out_w, out_h, FilterType::Triangle);

    encode_png_data_uri(&cropped)
}

/// Captures the viewport. A failed capture is logged and yields an empty string.
pub async fn capture_viewport(host: &dyn CaptureHost) -> String {
    match host.capture_visible().await {
        Ok(uri) => uri,
        Err(e) => {
            log::warn!("Failed to capture screenshot: {}", e);
            String::new()
        }
    }
}

/// Captures the viewport and crops it to the element. Any failure is logged
/// and yields an empty string.
pub async fn capture_element(
    host: &dyn CaptureHost,
    bbox: &BoundingBox,
    device_pixel_ratio: f64,
) -> String {
    let viewport = capture_viewport(host).await;
    if viewport.is_empty() {
        return viewport;
    }
    match crop_to_element(&viewport, bbox, device_pixel_ratio) {
        Ok(uri) => uri,
        Err(e) => {
            log::warn!("Failed to crop element screenshot: {}", e);
            String::new()
        }
    }
}
