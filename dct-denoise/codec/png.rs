use super::{DecodeError, EncodeError, ImageCodec};
use crate::types::{Channels, ImageBuffer};

#[derive(Debug, Clone, Copy)]
pub struct Png {
    compression: png::Compression,
}

impl Png {
    pub fn new(compression: png::Compression) -> Self {
        Self { compression }
    }

    pub fn fast() -> Self {
        Self::new(png::Compression::Fast)
    }
}

impl Default for Png {
    fn default() -> Self {
        Self::new(png::Compression::Default)
    }
}

impl ImageCodec for Png {
    fn decode(&self, data: &[u8]) -> Result<ImageBuffer, DecodeError> {
        let mut decoder = png::Decoder::new(data);
        // palettes, low bit depths and tRNS become plain 8-bit samples
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        if info.bit_depth != png::BitDepth::Eight {
            return Err(DecodeError::UnsupportedBitDepth(info.bit_depth as u8));
        }

        let channels = match info.color_type {
            png::ColorType::Grayscale => Channels::Gray,
            png::ColorType::Rgb => Channels::Rgb,
            png::ColorType::Rgba => Channels::Rgba,
            other => return Err(DecodeError::UnsupportedChannelCount(other.samples() as u8)),
        };

        Ok(ImageBuffer::new(info.width, info.height, channels.into(), buf)?)
    }

    fn encode(&self, image: &ImageBuffer) -> Result<Vec<u8>, EncodeError> {
        let color = match image.channels() {
            Channels::Gray => png::ColorType::Grayscale,
            Channels::Rgb => png::ColorType::Rgb,
            other => return Err(EncodeError::UnsupportedChannelCount(other.into())),
        };

        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
        encoder.set_compression(self.compression);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.pixels())?;
        writer.finish()?;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba_png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer
            .write_image_data(&vec![7; (width * height * 4) as usize])
            .unwrap();
        writer.finish().unwrap();
        out
    }

    #[test]
    fn gray_and_rgb_round_trip() {
        for channels in [1u8, 3] {
            let image = ImageBuffer::from_fn(5, 4, channels, |x, y, c| (x * 40 + y * 9) as u8 ^ c as u8)
                .unwrap();

            let codec = Png::default();
            let encoded = codec.encode(&image).unwrap();
            assert_eq!(&encoded[..4], b"\x89PNG");
            assert_eq!(codec.decode(&encoded).unwrap(), image);
        }
    }

    #[test]
    fn fast_compression_round_trips() {
        let image = ImageBuffer::from_fn(3, 3, 3, |x, _, _| x as u8).unwrap();
        let codec = Png::fast();
        assert_eq!(codec.decode(&codec.encode(&image).unwrap()).unwrap(), image);
    }

    #[test]
    fn rgba_decodes_but_does_not_encode() {
        let codec = Png::default();
        let image = codec.decode(&rgba_png(2, 3)).unwrap();
        assert_eq!(image.channel_count(), 4);
        assert_eq!((image.width(), image.height()), (2, 3));

        let err = codec.encode(&image).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedChannelCount(4)));
    }

    #[test]
    fn garbage_fails_to_decode() {
        let err = Png::default().decode(b"definitely not a png").unwrap_err();
        assert!(matches!(err, DecodeError::Png(_)));
    }
}
