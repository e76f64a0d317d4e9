use std::path::Path;

use log::info;
use thiserror::Error;

pub mod codec;
pub mod denoise;
pub mod transform;
pub mod types;
pub mod util;

pub use codec::{DecodeError, EncodeError, Format, ImageCodec};
pub use denoise::{denoise, DenoiseError, DenoiseOptions, Denoiser, Parallelism, Threshold};
pub use transform::{forward, inverse, Algorithm, Dct2d, Normalization, TransformError};
pub use types::{Channels, ImageBuffer, ImageBufferError};

/// Decodes `data`, denoises it and encodes the result.
pub fn denoise_bytes<D, E>(
    data: &[u8],
    decoder: &D,
    encoder: &E,
    options: DenoiseOptions,
) -> Result<Vec<u8>, Error>
where
    D: ImageCodec + ?Sized,
    E: ImageCodec + ?Sized,
{
    let mut image = decoder.decode(data)?;
    Denoiser::new(options).denoise(&mut image)?;
    Ok(encoder.encode(&image)?)
}

/// Reads `input` in any supported format, denoises it and writes it to `output`
/// with `encoder`. Nothing is written if any step fails.
pub fn denoise_file<E: ImageCodec + ?Sized>(
    input: &Path,
    output: &Path,
    encoder: &E,
    options: DenoiseOptions,
) -> Result<ImageBuffer, Error> {
    let data = std::fs::read(input)?;
    let mut image = codec::Reference::default().decode(&data)?;
    info!(
        "loaded {} ({}x{}, {} channels)",
        input.display(),
        image.width(),
        image.height(),
        image.channel_count()
    );

    Denoiser::new(options).denoise(&mut image)?;

    let encoded = encoder.encode(&image)?;
    std::fs::write(output, encoded)?;
    info!("wrote {}", output.display());

    Ok(image)
}

/// Pipeline error. The message names the failed step; the cause is its `source()`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to decode image")]
    Decode(#[from] DecodeError),

    #[error("Failed to encode image")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Denoise(#[from] DenoiseError),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}
