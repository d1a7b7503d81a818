//! CLI entry point for the photomosaic builder

use clap::Parser;
use photomosaic::io::cli::{Cli, FileProcessor};
use photomosaic::io::logging::init_logging;

fn main() -> photomosaic::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let processor = FileProcessor::new(cli);
    processor.process()
}
