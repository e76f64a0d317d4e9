pub mod jpeg;
pub mod png;
pub mod reference;

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::types::{ImageBuffer, ImageBufferError};

pub use self::jpeg::Jpeg;
pub use self::png::Png;
pub use self::reference::Reference;

/// Turns encoded bytes into an [`ImageBuffer`] and back.
pub trait ImageCodec {
    fn decode(&self, data: &[u8]) -> Result<ImageBuffer, DecodeError>;

    fn encode(&self, image: &ImageBuffer) -> Result<Vec<u8>, EncodeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    Png,
    Jpeg,
    // gray as PNG, RGB as JPEG
    Reference,
}

impl Format {
    pub fn from_path(path: &Path) -> Format {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") => Format::Png,
            Some("jpg" | "jpeg") => Format::Jpeg,
            _ => Format::Reference,
        }
    }

    pub fn codec(self, jpeg_quality: u8) -> Box<dyn ImageCodec + Send + Sync> {
        match self {
            Format::Png => Box::new(Png::default()),
            Format::Jpeg => Box::new(Jpeg::new(jpeg_quality)),
            Format::Reference => Box::new(Reference::with_quality(jpeg_quality)),
        }
    }
}

/// Codec matching the extension of `path`, with JPEG output at full quality.
pub fn codec_for_path(path: &Path) -> Box<dyn ImageCodec + Send + Sync> {
    Format::from_path(path).codec(jpeg::DEFAULT_QUALITY)
}

// keeps the source channel layout, narrowing wider samples to 8 bits
pub(crate) fn from_dynamic(image: DynamicImage) -> Result<ImageBuffer, DecodeError> {
    let (width, height) = image.dimensions();

    let (channels, pixels) = match image.color().channel_count() {
        1 => (1, image.into_luma8().into_raw()),
        3 => (3, image.into_rgb8().into_raw()),
        4 => (4, image.into_rgba8().into_raw()),
        other => return Err(DecodeError::UnsupportedChannelCount(other)),
    };

    Ok(ImageBuffer::new(width, height, channels, pixels)?)
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Png(#[from] ::png::DecodingError),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(u8),

    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u8),

    #[error("Invalid image")]
    InvalidImage(#[from] ImageBufferError),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(u8),

    #[error(transparent)]
    Png(#[from] ::png::EncodingError),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
