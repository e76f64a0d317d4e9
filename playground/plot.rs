use image::{ImageBuffer, ImageResult, Rgb};
use ndarray::Array2;

pub fn visualize_coefficients(
    coefficients: &Array2<f64>,
    color: (u8, u8, u8),
    filename: &str,
) -> ImageResult<()> {
    let (height, width) = coefficients.dim();

    // log scale so the DC term does not drown out everything else
    let magnitudes = coefficients.mapv(|c| (c.abs() + 1.0).ln());
    let max_magnitude = magnitudes.fold(f64::MIN, |n, ac| f64::max(n, *ac));

    let mut img = ImageBuffer::new(width as u32, height as u32);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let mag = magnitudes[(y as usize, x as usize)];
        let normalized_mag = if max_magnitude > 0.0 {
            mag / max_magnitude
        } else {
            0.0
        };

        *pixel = Rgb([
            (color.0 as f64 * normalized_mag) as u8,
            (color.1 as f64 * normalized_mag) as u8,
            (color.2 as f64 * normalized_mag) as u8,
        ]);
    }

    img.save(filename)
}
