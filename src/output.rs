//! Encoding rendered images for download.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::RenderResult;

/// Quality used for JPEG output.
pub const JPEG_QUALITY: u8 = 95;

/// Encoded image format for saved renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless.
    #[default]
    Png,
    /// Quality 95.
    Jpeg,
}

impl OutputFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Encodes an opaque image in memory.
pub fn encode(image: &RgbImage, format: OutputFormat) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        }
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
            image.write_with_encoder(encoder)?;
        }
    }
    Ok(bytes)
}

/// Encodes and writes to `path`.
pub fn save(image: &RgbImage, path: &Path, format: OutputFormat) -> RenderResult<()> {
    let bytes = encode(image, format)?;
    std::fs::write(path, bytes)?;
    tracing::debug!(path = %path.display(), ?format, "saved image");
    Ok(())
}
