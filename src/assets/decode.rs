use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::core::RgbaFrame;
use crate::foundation::error::{BoothError, BoothResult};

/// Media type of every encoded frame and collage.
pub const PNG_MIME: &str = "image/png";

/// An encoded still image: one captured snapshot or a finished collage.
///
/// Cloning is cheap; the encoded bytes are shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    bytes: Arc<Vec<u8>>,
}

impl ImageFrame {
    /// Wrap already-encoded bytes without decoding them.
    ///
    /// The dimensions are informational; composition decodes the bytes again and trusts the
    /// decoder over these values.
    pub fn from_encoded(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes: Arc::new(bytes),
        }
    }

    /// Read an encoded image file, probing its dimensions.
    pub fn from_path(path: impl AsRef<Path>) -> BoothResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .context("guess image format")?
            .into_dimensions()
            .map_err(|e| BoothError::validation(format!("probe '{}': {e}", path.display())))?;
        Ok(Self::from_encoded(width, height, bytes))
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:image/png;base64,...` URL for embedding in documents.
    pub fn to_data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(self.bytes.as_slice());
        format!("data:{PNG_MIME};base64,{b64}")
    }

    /// Decode back into a straight RGBA8 raster.
    pub fn decode(&self) -> BoothResult<RgbaFrame> {
        decode_image(&self.bytes)
    }
}

/// Decode encoded image bytes into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> BoothResult<RgbaFrame> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RgbaFrame::new(width, height, rgba.into_raw())
}

/// Encode a straight RGBA8 raster as PNG.
pub fn encode_png(frame: &RgbaFrame) -> BoothResult<ImageFrame> {
    if frame.is_empty() {
        return Err(BoothError::validation("cannot encode an empty frame"));
    }
    let mut out = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut out),
        &frame.data,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(ImageFrame::from_encoded(frame.width, frame.height, out))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
