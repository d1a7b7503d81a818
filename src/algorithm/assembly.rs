//! Mosaic assembly pipeline
//!
//! The target is resampled to one color per grid cell, a tile pool is
//! sampled from the source, and every cell independently receives the
//! nearest tile by average color. Cells are processed in row-major order
//! and the only shared state is the read-only pool.

use crate::algorithm::cancellation::CancellationToken;
use crate::algorithm::matching::{ColorMatcher, MatchMode, TileMatcher};
use crate::io::configuration::{
    DEFAULT_OUTPUT_WIDTH, DEFAULT_TILE_COUNT, DEFAULT_TILE_SIZE, PROGRESS_INTERVAL,
};
use crate::io::error::{MosaicError, Result, Stage, computation_error, invalid_configuration};
use crate::io::progress::{Phase, ProgressReporter};
use crate::math::color::Color;
use crate::spatial::grid::GridSpec;
use crate::spatial::raster::Raster;
use crate::spatial::tiles::{TilePool, TileSampler};
use image::{RgbImage, imageops};
use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Parameters of one mosaic build
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MosaicConfig {
    /// Side length of each square tile in pixels
    pub tile_size: u32,
    /// Requested output width; the result is snapped down to whole tiles
    pub output_width: u32,
    /// Number of tiles sampled from the source
    pub tile_count: usize,
    /// Color distance metric for matching
    pub match_mode: MatchMode,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            output_width: DEFAULT_OUTPUT_WIDTH,
            tile_count: DEFAULT_TILE_COUNT,
            match_mode: MatchMode::Average,
        }
    }
}

impl MosaicConfig {
    /// Check that every size and count is positive and within the memory limits
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first zero parameter, or the
    /// parameter that pushes the tile pool past its limits
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("tile_size", self.tile_size as usize),
            ("output_width", self.output_width as usize),
            ("tile_count", self.tile_count),
        ];
        for (parameter, value) in checks {
            if value == 0 {
                return Err(invalid_configuration(
                    parameter,
                    &value,
                    &"must be at least 1",
                ));
            }
        }
        self.sampler().map(|_| ())
    }

    /// Sampler drawing `tile_count` tiles of `tile_size`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the tile size or count is zero
    pub fn sampler(&self) -> Result<TileSampler> {
        TileSampler::new(self.tile_size, self.tile_count)
    }
}

/// Output of a full build, including the pool for reuse
#[derive(Debug, Clone)]
pub struct MosaicBuild {
    /// Assembled mosaic
    pub mosaic: Raster,
    /// Pool the mosaic was built from
    pub pool: TilePool,
    /// Grid the mosaic follows
    pub grid: GridSpec,
}

/// Drives sampling, matching and compositing for one configuration
#[derive(Debug, Clone)]
pub struct MosaicAssembler<M = ColorMatcher> {
    config: MosaicConfig,
    matcher: M,
    cancellation: Option<CancellationToken>,
}

impl MosaicAssembler<ColorMatcher> {
    /// Create an assembler using the configured match mode
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the configuration is invalid
    pub fn new(config: MosaicConfig) -> Result<Self> {
        Self::with_matcher(config, ColorMatcher::new(config.match_mode))
    }
}

impl<M: TileMatcher> MosaicAssembler<M> {
    /// Create an assembler with a custom matcher
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the configuration is invalid
    pub fn with_matcher(config: MosaicConfig, matcher: M) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            matcher,
            cancellation: None,
        })
    }

    /// Abort the build between tiles or cells once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Configuration in use
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Sample a pool from `source` and assemble the mosaic of `target`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The grid derived from the target is degenerate
    /// - Sampling fails or is cancelled
    /// - The progress reporter fails
    /// - Matching finds no tile
    pub fn assemble<R, P>(
        &self,
        target: &Raster,
        source: &Raster,
        rng: &mut R,
        progress: &mut P,
    ) -> Result<MosaicBuild>
    where
        R: Rng,
        P: ProgressReporter + ?Sized,
    {
        let grid = GridSpec::for_target(target, self.config.output_width, self.config.tile_size)?;
        let cell_colors = cell_colors(target, &grid)?;

        let mut sampler = self.config.sampler()?;
        if let Some(token) = &self.cancellation {
            sampler = sampler.with_cancellation(token.clone());
        }
        let pool = sampler.sample_with_progress(source, rng, progress)?;

        let mosaic = self.compose(&cell_colors, &pool, &grid, progress)?;
        Ok(MosaicBuild { mosaic, pool, grid })
    }

    /// Assemble the mosaic of `target` from an existing pool
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pool's tile size differs from the configured tile size
    /// - The pool is empty
    /// - The grid derived from the target is degenerate
    /// - The progress reporter fails or the build is cancelled
    pub fn assemble_with_pool<P>(
        &self,
        target: &Raster,
        pool: &TilePool,
        progress: &mut P,
    ) -> Result<Raster>
    where
        P: ProgressReporter + ?Sized,
    {
        if pool.tile_size() != self.config.tile_size {
            return Err(invalid_configuration(
                "tile_size",
                &pool.tile_size(),
                &format!("pool tiles do not match configured size {}", self.config.tile_size),
            ));
        }

        let grid = GridSpec::for_target(target, self.config.output_width, self.config.tile_size)?;
        let cell_colors = cell_colors(target, &grid)?;
        self.compose(&cell_colors, pool, &grid, progress)
    }

    fn compose<P>(
        &self,
        cell_colors: &Array2<Color>,
        pool: &TilePool,
        grid: &GridSpec,
        progress: &mut P,
    ) -> Result<Raster>
    where
        P: ProgressReporter + ?Sized,
    {
        if pool.is_empty() {
            return Err(MosaicError::EmptyTilePool {
                stage: Stage::Assembly,
            });
        }

        tracing::debug!(
            grid_width = grid.grid_width,
            grid_height = grid.grid_height,
            tiles = pool.len(),
            mode = %self.config.match_mode,
            "building mosaic"
        );

        let total = grid.cell_count();
        let mut output = RgbImage::new(grid.mosaic_width(), grid.mosaic_height());
        progress.report(0.0, Phase::BuildingMosaic)?;

        for (processed, (column, row)) in grid.cells().enumerate() {
            if self
                .cancellation
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                return Err(MosaicError::Cancelled {
                    stage: Stage::Assembly,
                    processed,
                    total,
                });
            }

            let color = cell_colors
                .get((row as usize, column as usize))
                .copied()
                .ok_or_else(|| {
                    computation_error(
                        Stage::Assembly,
                        "cell lookup",
                        &format!("no color for cell ({column}, {row})"),
                    )
                })?;
            let tile = self.matcher.best_match(color, pool)?;

            let (x, y) = grid.cell_origin(column, row);
            imageops::replace(&mut output, tile.pixels().as_rgb(), i64::from(x), i64::from(y));

            let placed = processed + 1;
            if placed % PROGRESS_INTERVAL == 0 {
                progress.report(placed as f64 / total as f64, Phase::BuildingMosaic)?;
            }
        }

        if total % PROGRESS_INTERVAL != 0 {
            progress.report(1.0, Phase::BuildingMosaic)?;
        }

        Ok(Raster::from_rgb(output))
    }
}

/// Representative color of every grid cell, indexed `(row, column)`
///
/// The target is resampled to exactly one pixel per cell with the high
/// quality filter; no other averaging takes place.
///
/// # Errors
///
/// Returns a computation error if the resampled target is missing a cell
pub fn cell_colors(target: &Raster, grid: &GridSpec) -> Result<Array2<Color>> {
    let resampled = target.resample(grid.grid_width, grid.grid_height);
    let shape = (grid.grid_height as usize, grid.grid_width as usize);

    let mut colors = Array2::from_elem(shape, [0.0; 3]);
    for ((row, column), cell) in colors.indexed_iter_mut() {
        *cell = resampled
            .color_at(column as u32, row as u32)
            .ok_or_else(|| {
                computation_error(
                    Stage::Assembly,
                    "target resampling",
                    &"resampled target too small",
                )
            })?;
    }
    Ok(colors)
}

/// Build a mosaic with a `StdRng` seeded from `seed`
///
/// # Errors
///
/// See [`MosaicAssembler::assemble`]
pub fn build_mosaic<P>(
    target: &Raster,
    source: &Raster,
    config: MosaicConfig,
    seed: u64,
    progress: &mut P,
) -> Result<MosaicBuild>
where
    P: ProgressReporter + ?Sized,
{
    let mut rng = StdRng::seed_from_u64(seed);
    MosaicAssembler::new(config)?.assemble(target, source, &mut rng, progress)
}
