use std::{mem::size_of, time::Instant};

use log::{debug, trace};
use ndarray::Array2;
use rayon::prelude::*;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    transform::{Algorithm, Dct2d, Normalization, TransformError},
    types::ImageBuffer,
    util::{to_byte, try_grid},
};

// cutoff used when none is given
pub const DEFAULT_THRESHOLD: f64 = 10.0;

/// Cutoff on a coefficient's index sum.
///
/// The coefficient at `(row, col)` is zeroed when `row + col > threshold`; its
/// magnitude plays no part. A NaN threshold therefore keeps every coefficient.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(pub f64);

impl Threshold {
    pub const KEEP_ALL: Threshold = Threshold(f64::INFINITY);
    pub const DROP_ALL: Threshold = Threshold(-1.0);

    #[inline]
    pub fn retains(self, row: usize, col: usize) -> bool {
        !((row + col) as f64 > self.0)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold(DEFAULT_THRESHOLD)
    }
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Threshold(value)
    }
}

/// Number of coefficients of a `width x height` grid kept by `threshold`.
pub fn retained_coefficients(width: usize, height: usize, threshold: Threshold) -> usize {
    (0..height)
        .map(|row| (0..width).filter(|&col| threshold.retains(row, col)).count())
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Parallelism {
    #[default]
    Sequential,
    // one rayon task per channel, each with its own plan and grids
    PerChannel,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DenoiseOptions {
    pub threshold: Threshold,
    pub normalization: Normalization,
    pub algorithm: Algorithm,
    pub parallelism: Parallelism,
    /// Upper bound in bytes on the scratch memory of one call, across all
    /// concurrent channel passes. `None` leaves it to the allocator.
    pub memory_limit: Option<usize>,
}

impl DenoiseOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        DenoiseOptions {
            threshold: Threshold(threshold),
            ..Default::default()
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenoiseError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Out of memory for a {rows}x{cols} coefficient grid")]
    OutOfMemory { rows: usize, cols: usize },

    #[error("Channel {channel} out of range for a {channels}-channel image")]
    ChannelOutOfRange { channel: usize, channels: usize },

    #[error(transparent)]
    Transform(TransformError),
}

impl From<TransformError> for DenoiseError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::InvalidDimensions { width, height } => {
                DenoiseError::InvalidDimensions { width, height }
            }
            TransformError::OutOfMemory { rows, cols } => DenoiseError::OutOfMemory { rows, cols },
            other => DenoiseError::Transform(other),
        }
    }
}

// Scratch for one channel pass: a transform plan plus the spatial and frequency grids.
struct ChannelPass {
    plan: Dct2d,
    spatial: Array2<f64>,
    frequency: Array2<f64>,
}

impl ChannelPass {
    // plan plus spatial and frequency grids; None if the size overflows
    fn scratch_bytes(width: usize, height: usize, algorithm: Algorithm) -> Option<usize> {
        let grids = width.checked_mul(height)?.checked_mul(2)?;
        Dct2d::scratch_len(width, height, algorithm)?
            .checked_add(grids)?
            .checked_mul(size_of::<f64>())
    }

    fn new(width: usize, height: usize, options: &DenoiseOptions) -> Result<Self, DenoiseError> {
        Ok(ChannelPass {
            plan: Dct2d::new(width, height, options.normalization, options.algorithm)?,
            spatial: try_grid(height, width)?,
            frequency: try_grid(height, width)?,
        })
    }

    // leaves the denoised channel in `self.spatial`
    fn run(
        &mut self,
        image: &ImageBuffer,
        channel: usize,
        threshold: Threshold,
    ) -> Result<(), DenoiseError> {
        let start = Instant::now();

        for (cell, sample) in self.spatial.iter_mut().zip(image.channel(channel)) {
            *cell = f64::from(sample);
        }

        self.plan
            .forward_into(self.spatial.view(), self.frequency.view_mut())?;

        let mut kept = 0;
        for ((row, col), coefficient) in self.frequency.indexed_iter_mut() {
            if threshold.retains(row, col) {
                kept += 1;
            } else {
                *coefficient = 0.0;
            }
        }

        self.plan
            .inverse_into(self.frequency.view(), self.spatial.view_mut())?;

        trace!(
            "channel {channel}: kept {kept}/{} coefficients in {:?}",
            self.frequency.len(),
            start.elapsed()
        );
        Ok(())
    }

    fn write_back(&self, image: &mut ImageBuffer, channel: usize) {
        for (sample, &value) in image.channel_mut(channel).zip(self.spatial.iter()) {
            *sample = to_byte(value);
        }
    }
}

/// Frequency-domain denoiser.
///
/// Every channel is transformed, coefficients past the index-sum threshold are
/// zeroed and the result is transformed back and narrowed with [`to_byte`].
///
/// All scratch memory is checked against [`DenoiseOptions::memory_limit`] and
/// allocated before the first channel is written back, so a failed call leaves
/// the image untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Denoiser {
    options: DenoiseOptions,
}

impl Denoiser {
    pub fn new(options: DenoiseOptions) -> Self {
        Denoiser { options }
    }

    pub fn options(&self) -> &DenoiseOptions {
        &self.options
    }

    // fails when `passes` concurrent channel passes would exceed the memory limit
    fn check_memory(&self, width: usize, height: usize, passes: usize) -> Result<(), DenoiseError> {
        let Some(limit) = self.options.memory_limit else {
            return Ok(());
        };

        let needed = ChannelPass::scratch_bytes(width, height, self.options.algorithm)
            .and_then(|bytes| bytes.checked_mul(passes));

        match needed {
            Some(bytes) if bytes <= limit => Ok(()),
            _ => {
                debug!("{width}x{height} image needs {needed:?} scratch bytes, limit is {limit}");
                Err(DenoiseError::OutOfMemory {
                    rows: height,
                    cols: width,
                })
            }
        }
    }

    pub fn denoise(&self, image: &mut ImageBuffer) -> Result<(), DenoiseError> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let channels = image.channel_count();
        let threshold = self.options.threshold;

        debug!(
            "denoising {width}x{height}x{channels} image (threshold {}, {}, {}, {})",
            threshold.0,
            self.options.normalization,
            self.options.algorithm,
            self.options.parallelism
        );

        let concurrent = match self.options.parallelism {
            Parallelism::Sequential => 1,
            Parallelism::PerChannel => channels,
        };
        self.check_memory(width, height, concurrent)?;

        match self.options.parallelism {
            Parallelism::Sequential => {
                let mut pass = ChannelPass::new(width, height, &self.options)?;
                for channel in 0..channels {
                    pass.run(image, channel, threshold)?;
                    pass.write_back(image, channel);
                }
            }
            Parallelism::PerChannel => {
                let source: &ImageBuffer = image;
                let passes = (0..channels)
                    .into_par_iter()
                    .map(|channel| -> Result<(usize, ChannelPass), DenoiseError> {
                        let mut pass = ChannelPass::new(width, height, &self.options)?;
                        pass.run(source, channel, threshold)?;
                        Ok((channel, pass))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                for (channel, pass) in passes {
                    pass.write_back(image, channel);
                }
            }
        }

        Ok(())
    }

    /// Denoises a single channel, leaving the others untouched.
    pub fn denoise_channel(
        &self,
        image: &mut ImageBuffer,
        channel: usize,
    ) -> Result<(), DenoiseError> {
        let channels = image.channel_count();
        if channel >= channels {
            return Err(DenoiseError::ChannelOutOfRange { channel, channels });
        }

        let (width, height) = (image.width() as usize, image.height() as usize);
        self.check_memory(width, height, 1)?;

        let mut pass = ChannelPass::new(width, height, &self.options)?;
        pass.run(image, channel, self.options.threshold)?;
        pass.write_back(image, channel);
        Ok(())
    }
}

/// Denoises `image` in place with the reference transform and the given cutoff.
pub fn denoise(image: &mut ImageBuffer, threshold: f64) -> Result<(), DenoiseError> {
    Denoiser::new(DenoiseOptions::with_threshold(threshold)).denoise(image)
}
