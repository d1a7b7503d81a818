//! Photomosaic construction from randomly sampled image tiles
//!
//! A target image is recreated as a grid of square tiles cut from a source
//! image. Each grid cell receives the sampled tile whose average color is
//! closest to the cell's color in the downsampled target.

#![forbid(unsafe_code)]

/// Tile matching, mosaic assembly and cancellation
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Color averaging and distance metrics
pub mod math;
/// Rasters, grid geometry and tile sampling
pub mod spatial;

pub use algorithm::assembly::{MosaicAssembler, MosaicBuild, MosaicConfig, build_mosaic};
pub use algorithm::matching::{ColorMatcher, MatchMode, TileMatcher};
pub use io::error::{MosaicError, Result, Stage};
pub use io::progress::{Phase, ProgressReporter};
