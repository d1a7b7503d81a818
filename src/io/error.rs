//! Error types for mosaic construction and the surrounding file handling

use crate::io::progress::Phase;
use std::fmt;
use std::path::PathBuf;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Parameter validation before any work starts
    Configuration,
    /// Reading and decoding input images
    Decode,
    /// Drawing tiles from the source image
    Sampling,
    /// Choosing a tile for a grid cell
    Matching,
    /// Compositing tiles into the output image
    Assembly,
    /// Delivering progress notifications
    Progress,
    /// Encoding and writing the result
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Decode => "decode",
            Self::Sampling => "sampling",
            Self::Matching => "matching",
            Self::Assembly => "assembly",
            Self::Progress => "progress",
            Self::Export => "export",
        };
        f.write_str(name)
    }
}

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// A size or count parameter is out of range
    InvalidConfiguration {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Matching was attempted against a pool without tiles
    EmptyTilePool {
        /// Stage that found the pool empty
        stage: Stage,
    },

    /// Failed to read or decode an input image
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Failed to encode or write the result image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Input path is missing or of an unsupported kind
    InvalidInput {
        /// Offending path
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// The run was cancelled through its cancellation token
    Cancelled {
        /// Stage that observed the cancellation
        stage: Stage,
        /// Work units completed before cancellation
        processed: usize,
        /// Work units the stage had in total
        total: usize,
    },

    /// A progress reporter refused a notification
    ProgressReport {
        /// Phase that was being reported
        phase: Phase,
        /// Reporter-supplied explanation
        reason: String,
    },

    /// Numerical computation produced an invalid result
    Computation {
        /// Stage the computation belongs to
        stage: Stage,
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl MosaicError {
    /// Stage of the pipeline this error belongs to
    pub const fn stage(&self) -> Stage {
        match self {
            Self::InvalidConfiguration { .. } => Stage::Configuration,
            Self::EmptyTilePool { stage }
            | Self::Cancelled { stage, .. }
            | Self::Computation { stage, .. } => *stage,
            Self::ImageLoad { .. } | Self::InvalidInput { .. } => Stage::Decode,
            Self::ImageExport { .. } | Self::FileSystem { .. } => Stage::Export,
            Self::ProgressReport { .. } => Stage::Progress,
        }
    }
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration {
                parameter,
                value,
                reason,
            } => {
                write!(
                    f,
                    "Invalid configuration '{parameter}' = '{value}': {reason}"
                )
            }
            Self::EmptyTilePool { stage } => {
                write!(f, "Tile pool is empty during {stage}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidInput { path, reason } => {
                write!(f, "Invalid input '{}': {reason}", path.display())
            }
            Self::Cancelled {
                stage,
                processed,
                total,
            } => {
                write!(f, "Cancelled during {stage} after {processed} of {total} steps")
            }
            Self::ProgressReport { phase, reason } => {
                write!(f, "Progress reporting failed while {phase}: {reason}")
            }
            Self::Computation {
                operation,
                reason,
                ..
            } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Create an invalid configuration error
pub fn invalid_configuration(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidConfiguration {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error raised during `stage`
pub fn computation_error(
    stage: Stage,
    operation: &'static str,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::Computation {
        stage,
        operation,
        reason: reason.to_string(),
    }
}

/// Create an invalid input error for a path
pub fn invalid_input(path: impl Into<PathBuf>, reason: &impl ToString) -> MosaicError {
    MosaicError::InvalidInput {
        path: path.into(),
        reason: reason.to_string(),
    }
}

/// Create a progress reporting error
pub fn progress_error(phase: Phase, reason: &impl ToString) -> MosaicError {
    MosaicError::ProgressReport {
        phase,
        reason: reason.to_string(),
    }
}
