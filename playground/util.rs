use dct_denoise::{codec::Reference, Error, ImageBuffer, ImageCodec};
use ndarray::Array2;

pub fn read_image(path: &str) -> Result<ImageBuffer, Error> {
    let data = std::fs::read(path)?;
    Ok(Reference::default().decode(&data)?)
}

pub fn channel_grid(image: &ImageBuffer, channel: usize) -> Array2<f64> {
    let shape = (image.height() as usize, image.width() as usize);
    let samples = image.channel(channel).map(f64::from).collect();
    Array2::from_shape_vec(shape, samples).expect("channel size matches image dimensions")
}

pub fn channel_color(channel: usize) -> (u8, u8, u8) {
    match channel {
        0 => (255, 0, 0),
        1 => (0, 255, 0),
        2 => (0, 0, 255),
        _ => (255, 255, 255),
    }
}

pub fn stem(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
}
