//! Command-line interface for building mosaics from image files
//!
//! The source image is decoded and sampled once; the resulting tile pool
//! is reused for every target, so a directory of targets costs a single
//! sampling pass.

use crate::algorithm::assembly::{MosaicAssembler, MosaicConfig};
use crate::algorithm::matching::MatchMode;
use crate::io::configuration::{
    DEFAULT_OUTPUT_WIDTH, DEFAULT_SEED, DEFAULT_TILE_COUNT, DEFAULT_TILE_SIZE, OUTPUT_EXTENSION,
    OUTPUT_SUFFIX,
};
use crate::io::error::{MosaicError, Result, invalid_input};
use crate::io::image::{export_raster, is_supported_image, load_raster};
use crate::io::progress::TerminalProgress;
use crate::spatial::raster::Raster;
use crate::spatial::tiles::TilePool;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "photomosaic")]
#[command(
    author,
    version,
    about = "Recreate an image as a mosaic of tiles sampled from another image"
)]
/// Command-line arguments for the mosaic builder
pub struct Cli {
    /// Target image, or directory of target images, to recreate
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Image the tiles are sampled from
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output file, or output directory when TARGET is a directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Side length of each tile in pixels
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Requested output width in pixels
    #[arg(short, long, default_value_t = DEFAULT_OUTPUT_WIDTH)]
    pub width: u32,

    /// Number of tiles to sample from the source
    #[arg(short = 'n', long = "tiles", default_value_t = DEFAULT_TILE_COUNT)]
    pub tile_count: usize,

    /// Color comparison: average or weighted
    #[arg(short, long = "match", default_value_t = MatchMode::Average)]
    pub match_mode: MatchMode,

    /// Random seed for reproducible sampling
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Process targets even if their output exists
    #[arg(long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Mosaic parameters selected on the command line
    pub const fn config(&self) -> MosaicConfig {
        MosaicConfig {
            tile_size: self.tile_size,
            output_width: self.width,
            tile_count: self.tile_count,
            match_mode: self.match_mode,
        }
    }
}

/// A target image and the path its mosaic is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Target image to recreate
    pub target: PathBuf,
    /// Destination of the mosaic
    pub output: PathBuf,
}

/// Orchestrates mosaic builds for one or more targets
pub struct FileProcessor {
    cli: Cli,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build a mosaic for every target selected by the CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The target path is missing or not a supported image
    /// - An image cannot be decoded, assembled or written
    pub fn process(&self) -> Result<()> {
        let assembler = MosaicAssembler::new(self.cli.config())?;
        let jobs = self.collect_jobs()?;

        if jobs.is_empty() {
            tracing::info!("no targets to process");
            return Ok(());
        }

        let source = load_raster(&self.cli.source)?;
        let pool = self.sample_pool(&assembler, &source)?;

        for job in &jobs {
            self.process_job(&assembler, &pool, job)?;
        }

        Ok(())
    }

    /// Targets to build and their output paths, skipping finished ones
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a supported image nor a
    /// readable directory
    pub fn collect_jobs(&self) -> Result<Vec<Job>> {
        let target = &self.cli.target;

        let jobs = if target.is_file() {
            if !is_supported_image(target) {
                return Err(invalid_input(
                    target.clone(),
                    &"target file must be a png, jpeg, bmp or gif image",
                ));
            }
            let output = match &self.cli.output {
                Some(output) if output.is_dir() => {
                    Self::output_path(target, Some(output.as_path()))
                }
                Some(output) => output.clone(),
                None => Self::output_path(target, None),
            };
            vec![Job {
                target: target.clone(),
                output,
            }]
        } else if target.is_dir() {
            let read_dir = |e: std::io::Error| MosaicError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source: e,
            };
            let mut jobs = Vec::new();
            for entry in std::fs::read_dir(target).map_err(read_dir)? {
                let path = entry.map_err(read_dir)?.path();
                if path.is_file() && is_supported_image(&path) && !self.is_excluded(&path) {
                    let output = Self::output_path(&path, self.cli.output.as_deref());
                    jobs.push(Job {
                        target: path,
                        output,
                    });
                }
            }
            jobs.sort_by(|a, b| a.target.cmp(&b.target));
            jobs
        } else {
            return Err(invalid_input(
                target.clone(),
                &"target must be an image file or directory",
            ));
        };

        Ok(jobs
            .into_iter()
            .filter(|job| self.should_process(job))
            .collect())
    }

    /// Default output path: `<stem>_mosaic.png` in `directory` or next to the target
    pub fn output_path(target: &Path, directory: Option<&Path>) -> PathBuf {
        let stem = target.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}",
            stem.to_string_lossy()
        );

        directory
            .or_else(|| target.parent())
            .map_or_else(|| PathBuf::from(&output_name), |parent| parent.join(&output_name))
    }

    fn sample_pool(&self, assembler: &MosaicAssembler, source: &Raster) -> Result<TilePool> {
        let mut rng = StdRng::seed_from_u64(self.cli.seed);
        let mut progress = self.progress_bar("source");
        let pool = assembler
            .config()
            .sampler()?
            .sample_with_progress(source, &mut rng, &mut progress);
        progress.finish();
        pool
    }

    fn process_job(&self, assembler: &MosaicAssembler, pool: &TilePool, job: &Job) -> Result<()> {
        let start_time = Instant::now();
        tracing::info!(target_image = %job.target.display(), "building mosaic");

        let target = load_raster(&job.target)?;
        let name = job
            .target
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let mut progress = self.progress_bar(&name);
        let mosaic = assembler.assemble_with_pool(&target, pool, &mut progress);
        progress.finish();
        let mosaic = mosaic?;

        export_raster(&mosaic, &job.output)?;
        tracing::info!(
            output = %job.output.display(),
            width = mosaic.width(),
            height = mosaic.height(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "mosaic written"
        );
        Ok(())
    }

    fn progress_bar(&self, label: &str) -> TerminalProgress {
        if self.cli.should_show_progress() {
            TerminalProgress::new(label)
        } else {
            TerminalProgress::hidden()
        }
    }

    fn should_process(&self, job: &Job) -> bool {
        if !self.cli.skip_existing() || !job.output.exists() {
            return true;
        }
        tracing::warn!(target_image = %job.target.display(), "skipping, output exists");
        false
    }

    // Previous outputs and the source itself never become targets
    fn is_excluded(&self, path: &Path) -> bool {
        let is_output = path
            .file_stem()
            .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX));
        is_output || same_file(path, &self.cli.source)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
