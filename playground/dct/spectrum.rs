use dct_denoise::{Algorithm, Dct2d, Normalization};

use crate::{plot::visualize_coefficients, util};

// writes one coefficient map per channel, DC in the top left corner
pub fn run(file_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let image = util::read_image(file_name)?;
    let (width, height) = (image.width() as usize, image.height() as usize);

    let mut plan = Dct2d::new(width, height, Normalization::Reference, Algorithm::Separable)?;

    for channel in 0..image.channel_count() {
        let grid = util::channel_grid(&image, channel);
        let coefficients = plan.forward(grid.view())?;

        let out = format!("{}-{channel}.dct.png", util::stem(file_name));
        visualize_coefficients(&coefficients, util::channel_color(channel), &out)?;
        println!("wrote {out}");
    }

    Ok(())
}
