//! Color averaging and distance metrics used for tile matching

use image::{Rgb, RgbImage};

/// Floating point RGB color with channels in the 0-255 range
pub type Color = [f64; 3];

/// Channel weights for the perceptual metric (red, green, blue)
///
/// Green carries the most weight and blue the least, roughly following
/// the eye's luminance sensitivity.
pub const PERCEPTUAL_WEIGHTS: Color = [2.0, 4.0, 3.0];

/// Convert an 8-bit pixel into a floating point color
pub fn color_from_pixel(pixel: Rgb<u8>) -> Color {
    let [r, g, b] = pixel.0;
    [f64::from(r), f64::from(g), f64::from(b)]
}

/// Per-channel arithmetic mean of every pixel in the image
///
/// An image without pixels averages to black.
pub fn average_color(image: &RgbImage) -> Color {
    let mut sums = [0.0_f64; 3];
    for pixel in image.pixels() {
        for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += f64::from(channel);
        }
    }

    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return [0.0; 3];
    }

    let count = count as f64;
    sums.map(|sum| sum / count)
}

/// Plain Euclidean distance over the three channels
pub fn euclidean_distance(a: Color, b: Color) -> f64 {
    let [dr, dg, db] = channel_deltas(a, b);
    dr.mul_add(dr, dg.mul_add(dg, db * db)).sqrt()
}

/// Channel-weighted distance `sqrt(2·ΔR² + 4·ΔG² + 3·ΔB²)`
pub fn weighted_distance(a: Color, b: Color) -> f64 {
    let [dr, dg, db] = channel_deltas(a, b);
    let [wr, wg, wb] = PERCEPTUAL_WEIGHTS;
    (wr * dr).mul_add(dr, (wg * dg).mul_add(dg, wb * db * db)).sqrt()
}

fn channel_deltas(a: Color, b: Color) -> Color {
    let [ar, ag, ab] = a;
    let [br, bg, bb] = b;
    [ar - br, ag - bg, ab - bb]
}
