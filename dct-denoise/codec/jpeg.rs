use image::{codecs::jpeg::JpegEncoder, ColorType, ImageFormat};

use super::{from_dynamic, DecodeError, EncodeError, ImageCodec};
use crate::types::{Channels, ImageBuffer};

pub const DEFAULT_QUALITY: u8 = 100;

#[derive(Debug, Clone, Copy)]
pub struct Jpeg {
    quality: u8, // 1..=100
}

impl Jpeg {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for Jpeg {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY)
    }
}

impl ImageCodec for Jpeg {
    fn decode(&self, data: &[u8]) -> Result<ImageBuffer, DecodeError> {
        from_dynamic(image::load_from_memory_with_format(data, ImageFormat::Jpeg)?)
    }

    fn encode(&self, image: &ImageBuffer) -> Result<Vec<u8>, EncodeError> {
        let color = match image.channels() {
            Channels::Gray => ColorType::L8,
            Channels::Rgb => ColorType::Rgb8,
            other => return Err(EncodeError::UnsupportedChannelCount(other.into())),
        };

        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.quality).encode(
            image.pixels(),
            image.width(),
            image.height(),
            color,
        )?;

        Ok(out)
    }
}
