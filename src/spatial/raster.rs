//! Owned RGB rasters and the resampling operations the pipeline needs

use crate::math::color::{Color, average_color, color_from_pixel};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};

/// Filter used whenever a raster is resized
pub const RESAMPLING_FILTER: FilterType = FilterType::Lanczos3;

/// Rectangular grid of 8-bit RGB samples stored row-major
///
/// Operations never mutate a raster in place; resizing and cropping
/// return new rasters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pixels: RgbImage,
}

impl Raster {
    /// Wrap an already decoded RGB image
    pub const fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Convert any decoded image to RGB, dropping alpha
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self {
            pixels: image.to_rgb8(),
        }
    }

    /// Raster of the given size filled with a single color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self {
            pixels: RgbImage::from_pixel(width, height, Rgb(rgb)),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Height divided by width, or `None` for an empty raster
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.width() > 0).then(|| f64::from(self.height()) / f64::from(self.width()))
    }

    /// Pixel at `(x, y)` if inside the raster
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.pixels.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }

    /// Pixel at `(x, y)` as a floating point color
    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        self.pixels.get_pixel_checked(x, y).copied().map(color_from_pixel)
    }

    /// Per-channel mean over the whole raster
    pub fn average_color(&self) -> Color {
        average_color(&self.pixels)
    }

    /// Resample to exactly `width` x `height` with the high quality filter
    pub fn resample(&self, width: u32, height: u32) -> Self {
        Self {
            pixels: imageops::resize(&self.pixels, width, height, RESAMPLING_FILTER),
        }
    }

    /// Copy the `size` x `size` block whose top-left corner is `(x, y)`
    ///
    /// Returns `None` if the block does not fit inside the raster.
    pub fn crop_square(&self, x: u32, y: u32, size: u32) -> Option<Self> {
        let fits_x = x.checked_add(size).is_some_and(|end| end <= self.width());
        let fits_y = y.checked_add(size).is_some_and(|end| end <= self.height());
        (fits_x && fits_y).then(|| Self {
            pixels: imageops::crop_imm(&self.pixels, x, y, size, size).to_image(),
        })
    }

    /// Borrow the underlying image buffer
    pub const fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }

    /// Take ownership of the underlying image buffer
    pub fn into_rgb(self) -> RgbImage {
        self.pixels
    }

    /// Row-major channel bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

impl From<RgbImage> for Raster {
    fn from(pixels: RgbImage) -> Self {
        Self::from_rgb(pixels)
    }
}

impl From<DynamicImage> for Raster {
    fn from(image: DynamicImage) -> Self {
        Self {
            pixels: image.into_rgb8(),
        }
    }
}
