//! Mathematical utilities for color comparison

/// Color averaging and distance metrics
pub mod color;
