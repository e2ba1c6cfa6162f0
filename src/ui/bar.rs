//! Shared completion bar for a known number of items.
//!
//! Every event prints its status line and redraws the bar underneath it, so
//! finished lines scroll up while the bar stays at the bottom.

use crate::pipeline::{FileOutcomes, StatusReceiver};

use super::format::{status_line, RenderStyle};
use super::terminal::{Screen, Terminal, DEFAULT_WIDTH};

const MIN_BAR_WIDTH: usize = 10;

/// Fixed geometry of the bar line ` [====    ] 03/10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarLayout {
    pub nitems: usize,
    pub line_width: usize,
    pub bar_width: usize,
    digits: usize,
}

impl BarLayout {
    /// `terminal_width` of `None` falls back to the default width.
    pub fn new(nitems: usize, terminal_width: Option<usize>, max_width: usize) -> Self {
        let digits = nitems.to_string().len();
        // leave the last column free so the cursor never wraps
        let line_width = terminal_width
            .unwrap_or(DEFAULT_WIDTH)
            .saturating_sub(1)
            .min(max_width);
        // " [" + "] " + "n/total"
        let overhead = 5 + digits * 2;
        let bar_width = line_width.saturating_sub(overhead).max(MIN_BAR_WIDTH);
        Self {
            nitems,
            line_width,
            bar_width,
            digits,
        }
    }

    /// Filled segments: floor(completed * bar_width / nitems), capped at the bar.
    pub fn segments(&self, completed: usize) -> usize {
        if self.nitems == 0 {
            return 0;
        }
        (completed.saturating_mul(self.bar_width) / self.nitems).min(self.bar_width)
    }

    pub fn bar_line(&self, completed: usize) -> String {
        let filled = self.segments(completed);
        format!(
            " [{}{}] {:0w$}/{:0w$}",
            "=".repeat(filled),
            " ".repeat(self.bar_width - filled),
            completed,
            self.nitems,
            w = self.digits
        )
    }
}

/// Render with a bar when `nitems > 0`, otherwise as the plain log.
pub async fn render(
    receiver: StatusReceiver,
    nitems: usize,
    term: &mut dyn Terminal,
    style: RenderStyle,
) -> FileOutcomes {
    if nitems == 0 {
        return super::plain::render(receiver, term, style).await;
    }
    render_bar(receiver, nitems, term, style).await
}

async fn render_bar(
    mut receiver: StatusReceiver,
    nitems: usize,
    term: &mut dyn Terminal,
    style: RenderStyle,
) -> FileOutcomes {
    let mut screen = Screen::new(term);
    let layout = BarLayout::new(nitems, screen.width(), style.max_width);
    let mut outcomes = FileOutcomes::new();
    // Counts 100% events, not unique files. A file that reports completion
    // twice advances the bar twice.
    let mut completed = 0usize;
    let mut drawn = false;

    while let Some(event) = receiver.recv().await {
        if event.is_success() {
            completed += 1;
        }
        outcomes.record(&event);

        let status = status_line(&event, style.color);
        let bar = layout.bar_line(completed);
        screen.draw(|t| {
            t.clear_line(layout.line_width)?;
            t.write_str(&status)?;
            t.write_str(&format!("\n{bar}\r"))
        });
        drawn = true;
    }

    if drawn {
        screen.draw(|t| t.write_str("\n"));
    }

    outcomes
}
