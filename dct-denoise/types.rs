use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

// every sample is stored as a single byte
pub const BIT_DEPTH: u8 = 8;

#[derive(IntoPrimitive, TryFromPrimitive, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Channels {
    Gray = 1,
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    #[inline]
    pub fn count(self) -> usize {
        u8::from(self) as usize
    }
}

/// Decoded 8-bit image with row-major, channel-interleaved samples.
///
/// The pixel buffer always holds exactly `width * height * channels` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    pixels: Vec<u8>,
}

impl ImageBuffer {
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    ) -> Result<ImageBuffer, ImageBufferError> {
        if width == 0 || height == 0 {
            return Err(ImageBufferError::ZeroDimension { width, height });
        }

        let channels = Channels::try_from(channels)
            .map_err(|_| ImageBufferError::UnsupportedChannelCount(channels))?;

        let expected = width as usize * height as usize * channels.count();
        if pixels.len() != expected {
            return Err(ImageBufferError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(ImageBuffer {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Builds an image by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn<F>(
        width: u32,
        height: u32,
        channels: u8,
        mut f: F,
    ) -> Result<ImageBuffer, ImageBufferError>
    where
        F: FnMut(u32, u32, usize) -> u8,
    {
        let count = channels as usize;
        let mut pixels = Vec::with_capacity(width as usize * height as usize * count);
        for y in 0..height {
            for x in 0..width {
                pixels.extend((0..count).map(|c| f(x, y, c)));
            }
        }
        ImageBuffer::new(width, height, channels, pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.count()
    }

    #[inline]
    pub fn bit_depth(&self) -> u8 {
        BIT_DEPTH
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    // a slice keeps the length invariant intact
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn sample(&self, x: u32, y: u32, channel: usize) -> Option<u8> {
        if x >= self.width || y >= self.height || channel >= self.channel_count() {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * self.channel_count() + channel;
        self.pixels.get(index).copied()
    }

    /// Samples of one channel in row-major order.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = u8> + '_ {
        self.pixels
            .iter()
            .skip(channel)
            .step_by(self.channel_count())
            .copied()
    }

    pub fn channel_mut(&mut self, channel: usize) -> impl Iterator<Item = &mut u8> + '_ {
        let step = self.channel_count();
        self.pixels.iter_mut().skip(channel).step_by(step)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageBufferError {
    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(u8),

    #[error("Pixel buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}
