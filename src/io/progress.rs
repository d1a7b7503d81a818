//! Progress notification for long running mosaic builds
//!
//! Reporters receive a completion fraction in `[0, 1]` together with the
//! phase being worked on. An error returned by a reporter aborts the build.

use crate::io::configuration::{PROGRESS_BAR_WIDTH, PROGRESS_RESOLUTION};
use crate::io::error::{Result, progress_error};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::sync::LazyLock;

/// Pipeline phase named in progress notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Sampling tiles from the source image
    ExtractingTiles,
    /// Matching and placing tiles into the output
    BuildingMosaic,
}

impl Phase {
    /// Human readable label shown to users
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExtractingTiles => "extracting tiles",
            Self::BuildingMosaic => "building mosaic",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One-way sink for progress notifications
pub trait ProgressReporter {
    /// Receive the completion fraction of `phase`
    ///
    /// # Errors
    ///
    /// Any error is treated as fatal by the caller and aborts the build
    fn report(&mut self, fraction: f64, phase: Phase) -> Result<()>;
}

impl<F> ProgressReporter for F
where
    F: FnMut(f64, Phase) -> Result<()>,
{
    fn report(&mut self, fraction: f64, phase: Phase) -> Result<()> {
        self(fraction, phase)
    }
}

/// Reporter that discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&mut self, _fraction: f64, _phase: Phase) -> Result<()> {
        Ok(())
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} {{msg:<16}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{percent:>3}}%"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Terminal progress bar for one mosaic build
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    /// Create a visible bar prefixed with `label`
    pub fn new(label: impl Into<String>) -> Self {
        let bar = ProgressBar::new(PROGRESS_RESOLUTION);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(label.into());
        Self { bar }
    }

    /// Create a bar that tracks progress without drawing anything
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Current bar position in units of `PROGRESS_RESOLUTION`
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for TerminalProgress {
    fn report(&mut self, fraction: f64, phase: Phase) -> Result<()> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(progress_error(
                phase,
                &format!("fraction {fraction} outside [0, 1]"),
            ));
        }

        self.bar.set_message(phase.label());
        self.bar
            .set_position((fraction * PROGRESS_RESOLUTION as f64).round() as u64);
        Ok(())
    }
}
