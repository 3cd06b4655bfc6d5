//! Progress display for a single generation

use crate::algorithm::model::Outcome;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} cells {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Collapsed-cell progress bar for one generation attempt
///
/// Hidden bars accept every call and draw nothing, so callers never branch on
/// quiet mode.
pub struct GenerationProgress {
    bar: ProgressBar,
}

impl GenerationProgress {
    /// Visible bar over `cells` cells, labelled with `label`
    pub fn new(cells: usize, label: &str) -> Self {
        let bar = ProgressBar::new(cells as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(label.to_string());
        Self { bar }
    }

    /// Bar that never draws
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Report the number of collapsed cells and the attempt in progress
    pub fn update(&self, collapsed: usize, attempt: usize) {
        self.bar.set_position(collapsed as u64);
        self.bar.set_message(format!("(attempt {attempt})"));
    }

    /// Restart the bar for a new attempt
    pub fn reset(&self) {
        self.bar.set_position(0);
    }

    /// Stop the bar and leave the outcome on screen
    pub fn finish(&self, outcome: Outcome) {
        let message = match outcome {
            Outcome::Success => "success",
            Outcome::Contradiction => "contradiction",
            Outcome::Incomplete => "stopped",
        };
        self.bar.abandon_with_message(message);
    }

    /// Current position of the bar
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Length of the bar in cells
    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}
