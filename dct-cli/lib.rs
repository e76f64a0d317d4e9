//! `dct-denoise` command line tool.
//!
//! Reads an image, zeroes every DCT coefficient whose row + column index exceeds
//! the threshold and writes the result.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use dct_denoise::{
    codec::{jpeg::DEFAULT_QUALITY, Format, ImageCodec},
    denoise::DEFAULT_THRESHOLD,
    denoise_file, Algorithm, DenoiseOptions, Normalization, Parallelism, Threshold,
};
use log::{info, LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "dct-denoise")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Denoise with the default cutoff (10):
        dct-denoise input.jpg output.jpg

    Keep only the lowest frequencies:
        dct-denoise -t 2 input.png output.png

    Gray images as PNG, RGB images as JPEG:
        dct-denoise --format reference input.png output")]
pub struct Cli {
    /// Image to denoise
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the denoised image
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Zero coefficients whose row + column index exceeds this value
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: f64,

    /// Output format (auto picks from the output extension)
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: FormatArg,

    /// JPEG quality
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Use the orthonormal DCT pair instead of the reference scaling
    #[arg(long)]
    pub orthonormal: bool,

    /// Evaluate the transform as two matrix products
    #[arg(long)]
    pub separable: bool,

    /// Process channels in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Fail instead of allocating more than this much scratch memory
    #[arg(long, value_name = "MIB")]
    pub memory_limit: Option<usize>,

    /// More output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Auto,
    Png,
    Jpeg,
    Reference,
}

impl Cli {
    pub fn options(&self) -> DenoiseOptions {
        DenoiseOptions {
            threshold: Threshold(self.threshold),
            normalization: if self.orthonormal {
                Normalization::Orthonormal
            } else {
                Normalization::Reference
            },
            algorithm: if self.separable {
                Algorithm::Separable
            } else {
                Algorithm::Direct
            },
            parallelism: if self.parallel {
                Parallelism::PerChannel
            } else {
                Parallelism::Sequential
            },
            memory_limit: self.memory_limit.map(|mib| mib.saturating_mul(1 << 20)),
        }
    }

    pub fn output_format(&self) -> Format {
        match self.format {
            FormatArg::Auto => Format::from_path(&self.output),
            FormatArg::Png => Format::Png,
            FormatArg::Jpeg => Format::Jpeg,
            FormatArg::Reference => Format::Reference,
        }
    }

    pub fn encoder(&self) -> Box<dyn ImageCodec + Send + Sync> {
        self.output_format().codec(self.quality)
    }
}

pub fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn run(cli: &Cli) -> Result<(), dct_denoise::Error> {
    let format = cli.output_format();
    info!("writing {} as {format}", cli.output.display());

    let encoder = cli.encoder();
    denoise_file(&cli.input, &cli.output, encoder.as_ref(), cli.options())?;
    Ok(())
}
