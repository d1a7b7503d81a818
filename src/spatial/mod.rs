//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - Owned RGB rasters and resampling
//! - Output grid geometry
//! - Tile data structures and sampling

/// Output grid geometry
pub mod grid;
/// Owned RGB rasters
pub mod raster;
/// Tile sampling and pools
pub mod tiles;

pub use grid::GridSpec;
pub use raster::Raster;
pub use tiles::{Tile, TilePool, TileSampler};
