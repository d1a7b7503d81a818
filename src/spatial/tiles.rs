//! Tile sampling from source images
//!
//! Tiles are square blocks copied from random positions of the source and
//! tagged with their average color. Sampling is with replacement, so the
//! same region may appear in the pool more than once. Pool order is draw
//! order, which keeps matching ties deterministic for a given seed.

use crate::algorithm::cancellation::CancellationToken;
use crate::io::configuration::{
    FALLBACK_SCALE, MAX_OUTPUT_PIXELS, MAX_POOL_PIXELS, MAX_TILE_SIZE, PROGRESS_INTERVAL,
};
use crate::io::error::{MosaicError, Result, Stage, computation_error, invalid_configuration};
use crate::io::progress::{Phase, ProgressReporter, SilentProgress};
use crate::math::color::Color;
use crate::spatial::raster::Raster;
use rand::Rng;

/// Square block of source pixels with its precomputed average color
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pixels: Raster,
    average: Color,
}

impl Tile {
    /// Build a tile from a square raster
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the raster is not square or has no pixels
    pub fn from_pixels(pixels: Raster) -> Result<Self> {
        if pixels.width() != pixels.height() || pixels.width() == 0 {
            return Err(invalid_configuration(
                "tile",
                &format!("{}x{}", pixels.width(), pixels.height()),
                &"tiles must be non-empty squares",
            ));
        }
        let average = pixels.average_color();
        Ok(Self { pixels, average })
    }

    /// Side length in pixels
    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    /// Average color over every pixel of the tile
    pub const fn average(&self) -> Color {
        self.average
    }

    /// Tile pixels
    pub const fn pixels(&self) -> &Raster {
        &self.pixels
    }
}

/// Ordered tile collection shared read-only by one or more mosaic builds
#[derive(Debug, Clone, PartialEq)]
pub struct TilePool {
    tile_size: u32,
    tiles: Vec<Tile>,
}

impl TilePool {
    /// Assemble a pool from tiles that all share `tile_size`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if any tile has a different size
    pub fn from_tiles(tile_size: u32, tiles: Vec<Tile>) -> Result<Self> {
        if let Some(tile) = tiles.iter().find(|tile| tile.size() != tile_size) {
            return Err(invalid_configuration(
                "tile_size",
                &tile.size(),
                &format!("pool requires {tile_size}x{tile_size} tiles"),
            ));
        }
        Ok(Self { tile_size, tiles })
    }

    /// Side length shared by every tile
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of tiles in the pool
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the pool holds no tiles
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at `index` in insertion order
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Iterate tiles in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Tiles in insertion order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

impl<'a> IntoIterator for &'a TilePool {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

/// Draws a fixed number of fixed-size tiles from random source positions
#[derive(Debug, Clone)]
pub struct TileSampler {
    tile_size: u32,
    count: usize,
    cancellation: Option<CancellationToken>,
}

impl TileSampler {
    /// Create a sampler for `count` tiles of `tile_size` pixels per side
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if either value is zero, the tile is
    /// larger than `MAX_TILE_SIZE` or the pool would exceed `MAX_POOL_PIXELS`
    pub fn new(tile_size: u32, count: usize) -> Result<Self> {
        if tile_size == 0 {
            return Err(invalid_configuration(
                "tile_size",
                &tile_size,
                &"must be at least 1",
            ));
        }
        if count == 0 {
            return Err(invalid_configuration(
                "tile_count",
                &count,
                &"must be at least 1",
            ));
        }
        if tile_size > MAX_TILE_SIZE {
            return Err(invalid_configuration(
                "tile_size",
                &tile_size,
                &format!("must be at most {MAX_TILE_SIZE}"),
            ));
        }
        let pool_pixels = u64::from(tile_size)
            .checked_mul(u64::from(tile_size))
            .and_then(|tile_pixels| tile_pixels.checked_mul(count as u64));
        if pool_pixels.is_none_or(|pixels| pixels > MAX_POOL_PIXELS) {
            return Err(invalid_configuration(
                "tile_count",
                &count,
                &format!("pool of {tile_size}px tiles exceeds {MAX_POOL_PIXELS} pixels"),
            ));
        }
        Ok(Self {
            tile_size,
            count,
            cancellation: None,
        })
    }

    /// Stop sampling early once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Side length of sampled tiles
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of tiles drawn per call
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Sample the pool without progress notifications
    ///
    /// # Errors
    ///
    /// See [`TileSampler::sample_with_progress`]
    pub fn sample<R: Rng>(&self, source: &Raster, rng: &mut R) -> Result<TilePool> {
        self.sample_with_progress(source, rng, &mut SilentProgress)
    }

    /// Sample the pool, reporting the `extracting tiles` phase
    ///
    /// Sources that cannot hold a single tile are first upscaled to
    /// `tile_size * FALLBACK_SCALE` pixels per side.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source has no pixels
    /// - The progress reporter fails
    /// - The cancellation token fires before all tiles are drawn
    /// - The upscaled source would exceed `MAX_OUTPUT_PIXELS` or still cannot hold a tile
    pub fn sample_with_progress<R, P>(
        &self,
        source: &Raster,
        rng: &mut R,
        progress: &mut P,
    ) -> Result<TilePool>
    where
        R: Rng,
        P: ProgressReporter + ?Sized,
    {
        if source.width() == 0 || source.height() == 0 {
            return Err(invalid_configuration(
                "source",
                &format!("{}x{}", source.width(), source.height()),
                &"source image has no pixels",
            ));
        }

        let upscaled;
        let source = if self.fits(source) {
            source
        } else {
            let side = self.fallback_side()?;
            tracing::debug!(
                width = source.width(),
                height = source.height(),
                side,
                "source smaller than one tile, upscaling"
            );
            upscaled = source.resample(side, side);
            &upscaled
        };

        if !self.fits(source) {
            return Err(computation_error(
                Stage::Sampling,
                "tile sampling",
                &format!(
                    "source {}x{} cannot hold a {}px tile",
                    source.width(),
                    source.height(),
                    self.tile_size
                ),
            ));
        }

        let max_x = source.width() - self.tile_size;
        let max_y = source.height() - self.tile_size;

        progress.report(0.0, Phase::ExtractingTiles)?;

        let mut tiles = Vec::with_capacity(self.count);
        for drawn in 0..self.count {
            if self
                .cancellation
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                return Err(MosaicError::Cancelled {
                    stage: Stage::Sampling,
                    processed: drawn,
                    total: self.count,
                });
            }

            let x = rng.random_range(0..=max_x);
            let y = rng.random_range(0..=max_y);
            let block = source.crop_square(x, y, self.tile_size).ok_or_else(|| {
                computation_error(
                    Stage::Sampling,
                    "tile sampling",
                    &format!("block at ({x}, {y}) out of bounds"),
                )
            })?;
            tiles.push(Tile::from_pixels(block)?);

            let sampled = drawn + 1;
            if sampled % PROGRESS_INTERVAL == 0 {
                progress.report(sampled as f64 / self.count as f64, Phase::ExtractingTiles)?;
            }
        }

        if tiles.is_empty() {
            return Err(MosaicError::EmptyTilePool {
                stage: Stage::Sampling,
            });
        }

        tracing::debug!(tiles = tiles.len(), tile_size = self.tile_size, "tile pool sampled");

        Ok(TilePool {
            tile_size: self.tile_size,
            tiles,
        })
    }

    // Side of the square an undersized source is upscaled to
    fn fallback_side(&self) -> Result<u32> {
        self.tile_size
            .checked_mul(FALLBACK_SCALE)
            .filter(|&side| u64::from(side) * u64::from(side) <= MAX_OUTPUT_PIXELS)
            .ok_or_else(|| {
                invalid_configuration(
                    "tile_size",
                    &self.tile_size,
                    &format!("fallback source of {FALLBACK_SCALE} tiles per side is too large"),
                )
            })
    }

    // A source holds a tile only if it is strictly larger on both axes
    fn fits(&self, source: &Raster) -> bool {
        source.width() > self.tile_size && source.height() > self.tile_size
    }
}
