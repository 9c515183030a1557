//! Terminal progress display while a sequence renders

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use crate::sequence::FrameObserver;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static FRAME_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} frames {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar counting rendered frames of one animation
pub struct FrameProgress {
    bar: ProgressBar,
}

impl FrameProgress {
    /// Visible progress bar for `total` frames labelled with `label`
    pub fn new(label: &str, total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(FRAME_STYLE.clone());
        bar.set_prefix(label.to_string());
        Self { bar }
    }

    /// Progress tracker that never draws, for quiet runs and tests
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::hidden());
        Self { bar }
    }

    /// Frames rendered so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Show a status message next to the bar
    pub fn set_stage(&self, stage: &'static str) {
        self.bar.set_message(stage);
    }

    /// Stop the bar, leaving a completion message behind
    pub fn finish(&self, message: String) {
        self.bar.finish_with_message(message);
    }

    /// Stop the bar where it is, leaving the partial count on screen
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl FrameObserver for FrameProgress {
    fn frame_rendered(&self, _index: usize) {
        self.bar.inc(1);
    }
}
