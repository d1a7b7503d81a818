//! Input/output: command line, image files, progress, logging and errors

/// Command-line interface and batch processing
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Image decoding and encoding
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Progress reporting
pub mod progress;
