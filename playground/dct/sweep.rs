use dct_denoise::{codec::Png, Algorithm, DenoiseOptions, Denoiser, ImageCodec, Threshold};

use crate::util;

const THRESHOLDS: [f64; 7] = [0.0, 2.0, 5.0, 10.0, 20.0, 40.0, f64::INFINITY];

// denoises the same image at several cutoffs so the results can be compared side by side
pub fn run(file_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let image = util::read_image(file_name)?;
    let codec = Png::default();

    for threshold in THRESHOLDS {
        let mut denoised = image.clone();
        let options = DenoiseOptions {
            threshold: Threshold(threshold),
            algorithm: Algorithm::Separable,
            ..Default::default()
        };
        Denoiser::new(options).denoise(&mut denoised)?;

        let out = format!("{}.t{threshold}.png", util::stem(file_name));
        std::fs::write(&out, codec.encode(&denoised)?)?;
        println!("wrote {out}");
    }

    Ok(())
}
