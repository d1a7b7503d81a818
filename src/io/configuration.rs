//! Mosaic constants and runtime configuration defaults

// Defaults mirror the values the interactive tool starts with
/// Default side length of a square tile in pixels
pub const DEFAULT_TILE_SIZE: u32 = 20;
/// Default requested output width in pixels
pub const DEFAULT_OUTPUT_WIDTH: u32 = 800;
/// Default number of tiles sampled from the source
pub const DEFAULT_TILE_COUNT: usize = 1000;
/// Fixed seed for reproducible sampling
pub const DEFAULT_SEED: u64 = 42;

/// Number of processed cells (or sampled tiles) between progress notifications
pub const PROGRESS_INTERVAL: usize = 100;

// Sources too small for one tile are upscaled to this many tiles per side
/// Multiplier applied to the tile size when upscaling an undersized source
pub const FALLBACK_SCALE: u32 = 10;

// Safety limits to prevent excessive memory allocation
/// Maximum allowed grid dimension in cells
pub const MAX_GRID_DIMENSION: u32 = 10_000;
/// Maximum tile side length in pixels
pub const MAX_TILE_SIZE: u32 = 1_000;
/// Maximum pixel count of any raster the pipeline allocates
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;
/// Maximum total pixel count of a sampled tile pool
pub const MAX_POOL_PIXELS: u64 = 250_000_000;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 50;
/// Number of discrete steps a progress bar resolves a fraction into
pub const PROGRESS_RESOLUTION: u64 = 1000;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Extension used for generated output files
pub const OUTPUT_EXTENSION: &str = "png";
/// Image extensions accepted as targets and sources
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];
