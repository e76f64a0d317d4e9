use super::{from_dynamic, DecodeError, EncodeError, ImageCodec, Jpeg, Png};
use crate::types::{Channels, ImageBuffer};

/// Reads anything the `image` crate can decode; writes gray images as PNG and
/// RGB images as JPEG. Four-channel images have no output format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reference {
    png: Png,
    jpeg: Jpeg,
}

impl Reference {
    pub fn with_quality(jpeg_quality: u8) -> Self {
        Self {
            png: Png::default(),
            jpeg: Jpeg::new(jpeg_quality),
        }
    }
}

impl ImageCodec for Reference {
    fn decode(&self, data: &[u8]) -> Result<ImageBuffer, DecodeError> {
        from_dynamic(image::load_from_memory(data)?)
    }

    fn encode(&self, image: &ImageBuffer) -> Result<Vec<u8>, EncodeError> {
        match image.channels() {
            Channels::Gray => self.png.encode(image),
            Channels::Rgb => self.jpeg.encode(image),
            other => Err(EncodeError::UnsupportedChannelCount(other.into())),
        }
    }
}
