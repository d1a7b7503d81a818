//! Mosaic construction: tile matching, assembly and cancellation

/// Sampling, matching and compositing pipeline
pub mod assembly;
/// Cooperative cancellation token
pub mod cancellation;
/// Nearest-color tile lookup
pub mod matching;
