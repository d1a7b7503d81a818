//! Nearest-color tile lookup
//!
//! Matching is a linear scan in pool order with a strict `<` comparison, so
//! among tiles at equal distance the earliest one wins. Cost is linear in
//! the pool size per lookup; [`TileMatcher`] is the seam for an indexed
//! implementation.

use crate::io::error::{MosaicError, Result, Stage, invalid_configuration};
use crate::math::color::{Color, euclidean_distance, weighted_distance};
use crate::spatial::tiles::{Tile, TilePool};
use std::fmt;
use std::str::FromStr;

/// Color distance metric used to compare a cell color with tile averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Plain Euclidean distance over RGB
    #[default]
    Average,
    /// Channel-weighted Euclidean distance favouring green
    Weighted,
}

impl MatchMode {
    /// Distance between two colors under this metric
    pub fn distance(self, a: Color, b: Color) -> f64 {
        match self {
            Self::Average => euclidean_distance(a, b),
            Self::Weighted => weighted_distance(a, b),
        }
    }

    /// Name accepted by [`MatchMode::from_str`]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Weighted => "weighted",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatchMode {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" => Ok(Self::Average),
            "weighted" => Ok(Self::Weighted),
            _ => Err(invalid_configuration(
                "match_mode",
                &s,
                &"expected 'average' or 'weighted'",
            )),
        }
    }
}

/// Picks the tile whose average color best matches a target color
pub trait TileMatcher {
    /// Index of the best matching tile in `pool`
    ///
    /// # Errors
    ///
    /// Returns `EmptyTilePool` if the pool has no tiles
    fn best_match_index(&self, target: Color, pool: &TilePool) -> Result<usize>;

    /// Best matching tile in `pool`
    ///
    /// # Errors
    ///
    /// Returns `EmptyTilePool` if the pool has no tiles
    fn best_match<'p>(&self, target: Color, pool: &'p TilePool) -> Result<&'p Tile> {
        let index = self.best_match_index(target, pool)?;
        pool.get(index).ok_or(MosaicError::EmptyTilePool {
            stage: Stage::Matching,
        })
    }
}

/// Linear-scan matcher over the whole pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorMatcher {
    mode: MatchMode,
}

impl ColorMatcher {
    /// Create a matcher using `mode` as its metric
    pub const fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    /// Metric in use
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }
}

impl TileMatcher for ColorMatcher {
    fn best_match_index(&self, target: Color, pool: &TilePool) -> Result<usize> {
        let mut tiles = pool.iter().enumerate();
        let (_, first) = tiles.next().ok_or(MosaicError::EmptyTilePool {
            stage: Stage::Matching,
        })?;

        let mut best_index = 0;
        let mut best_distance = self.mode.distance(target, first.average());

        for (index, tile) in tiles {
            let distance = self.mode.distance(target, tile.average());
            if distance < best_distance {
                best_distance = distance;
                best_index = index;
            }
        }

        Ok(best_index)
    }
}
