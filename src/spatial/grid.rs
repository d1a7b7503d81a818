//! Output grid geometry
//!
//! The mosaic is a grid of square cells, each one tile wide. The grid width
//! follows from the requested output width; the grid height preserves the
//! target's aspect ratio.

use crate::io::configuration::{MAX_GRID_DIMENSION, MAX_OUTPUT_PIXELS};
use crate::io::error::{Result, invalid_configuration};
use crate::spatial::raster::Raster;

/// Grid dimensions derived from output width, tile size and aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    /// Number of cells per row
    pub grid_width: u32,
    /// Number of cell rows
    pub grid_height: u32,
    /// Side length of one cell in pixels
    pub tile_size: u32,
    /// Nominal output height before snapping to whole tiles
    pub output_height: u32,
}

impl GridSpec {
    /// Derive the grid for an output width and a height/width aspect ratio
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the tile size or output width is zero,
    /// the aspect ratio is not a positive finite number, either grid
    /// dimension rounds to zero, a dimension exceeds `MAX_GRID_DIMENSION`, or
    /// the mosaic would exceed `MAX_OUTPUT_PIXELS`
    pub fn new(output_width: u32, tile_size: u32, aspect_ratio: f64) -> Result<Self> {
        if tile_size == 0 {
            return Err(invalid_configuration(
                "tile_size",
                &tile_size,
                &"must be at least 1",
            ));
        }
        if output_width == 0 {
            return Err(invalid_configuration(
                "output_width",
                &output_width,
                &"must be at least 1",
            ));
        }
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(invalid_configuration(
                "aspect_ratio",
                &aspect_ratio,
                &"must be a positive finite number",
            ));
        }

        let grid_width = output_width / tile_size;
        let grid_height = (f64::from(grid_width) * aspect_ratio).round();
        // Float to int casts saturate, so huge ratios cannot wrap
        let output_height = (f64::from(output_width) * aspect_ratio).round() as u32;

        if grid_width == 0 || grid_height < 1.0 {
            return Err(invalid_configuration(
                "grid",
                &format!("{grid_width}x{grid_height}"),
                &"output is smaller than one tile",
            ));
        }
        if grid_width > MAX_GRID_DIMENSION || grid_height > f64::from(MAX_GRID_DIMENSION) {
            return Err(invalid_configuration(
                "grid",
                &format!("{grid_width}x{grid_height}"),
                &format!("grid dimensions are limited to {MAX_GRID_DIMENSION} cells"),
            ));
        }

        let grid_height = grid_height as u32;
        let mosaic_width = u64::from(grid_width) * u64::from(tile_size);
        let mosaic_height = u64::from(grid_height) * u64::from(tile_size);
        if mosaic_width.saturating_mul(mosaic_height) > MAX_OUTPUT_PIXELS {
            return Err(invalid_configuration(
                "tile_size",
                &tile_size,
                &format!(
                    "{mosaic_width}x{mosaic_height} mosaic exceeds {MAX_OUTPUT_PIXELS} pixels"
                ),
            ));
        }

        Ok(Self {
            grid_width,
            grid_height,
            tile_size,
            output_height,
        })
    }

    /// Derive the grid for a target raster
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the target is empty or the
    /// parameters are rejected by [`GridSpec::new`]
    pub fn for_target(target: &Raster, output_width: u32, tile_size: u32) -> Result<Self> {
        let aspect_ratio = target.aspect_ratio().ok_or_else(|| {
            invalid_configuration(
                "target",
                &format!("{}x{}", target.width(), target.height()),
                &"target image has no pixels",
            )
        })?;
        Self::new(output_width, tile_size, aspect_ratio)
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    /// Width of the assembled mosaic in pixels
    pub const fn mosaic_width(&self) -> u32 {
        self.grid_width * self.tile_size
    }

    /// Height of the assembled mosaic in pixels
    pub const fn mosaic_height(&self) -> u32 {
        self.grid_height * self.tile_size
    }

    /// Pixel offset of the top-left corner of cell `(column, row)`
    pub const fn cell_origin(&self, column: u32, row: u32) -> (u32, u32) {
        (column * self.tile_size, row * self.tile_size)
    }

    /// All cells as `(column, row)` pairs in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let grid_width = self.grid_width;
        (0..self.grid_height).flat_map(move |row| (0..grid_width).map(move |column| (column, row)))
    }
}
