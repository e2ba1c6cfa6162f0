//! Stateless line formatting shared by the terminal renderers.

use console::{measure_text_width, style};

use crate::common::StatusEvent;

/// Rendering options resolved once per pipeline pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderStyle {
    pub color: bool,
    pub max_width: usize,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            color: false,
            max_width: super::terminal::DEFAULT_WIDTH,
        }
    }
}

pub fn ok_label(color: bool) -> String {
    if color {
        style("OK").green().force_styling(true).to_string()
    } else {
        "OK".to_string()
    }
}

pub fn failed_label(color: bool) -> String {
    if color {
        style("failed").red().force_styling(true).to_string()
    } else {
        "failed".to_string()
    }
}

/// Prefix for the fatal message printed by `main`.
pub fn error_label(color: bool) -> String {
    if color {
        style("[error]").red().force_styling(true).to_string()
    } else {
        "[error]".to_string()
    }
}

/// ` <state> <file> <OK | error | progress rate> `, skipping empty parts.
pub fn status_line(event: &StatusEvent, color: bool) -> String {
    let mut line = String::from(" ");
    let mut push = |part: &str| {
        if !part.is_empty() {
            line.push_str(part);
            line.push(' ');
        }
    };

    push(&event.state);
    push(&event.file_name);
    match &event.err {
        Some(err) => push(err),
        None if event.is_success() => push(&ok_label(color)),
        None => {
            push(&event.progress);
            push(&event.rate);
        }
    }
    line
}

/// Printed columns, ignoring ANSI styling.
pub fn visible_width(text: &str) -> usize {
    measure_text_width(text)
}
