//! Line-per-(file, state) progress log.
//!
//! Each file/state pair owns one terminal line that is rewritten in place
//! until the pair changes, then the line is finished with a newline.

use crate::pipeline::{FileOutcomes, StatusReceiver};

use super::format::{status_line, visible_width, RenderStyle};
use super::terminal::{Screen, Terminal};

pub async fn render(
    mut receiver: StatusReceiver,
    term: &mut dyn Terminal,
    style: RenderStyle,
) -> FileOutcomes {
    let mut screen = Screen::new(term);
    let mut outcomes = FileOutcomes::new();
    let mut current_file = String::new();
    let mut current_state = String::new();
    let mut last_printed = String::new();

    while let Some(event) = receiver.recv().await {
        if event.file_name != current_file || event.state != current_state {
            if !last_printed.is_empty() {
                screen.draw(|t| t.write_str("\n"));
            }
            last_printed.clear();
            current_file.clone_from(&event.file_name);
            current_state.clone_from(&event.state);
        }

        let line = status_line(&event, style.color);
        if line != last_printed {
            let previous = visible_width(&last_printed);
            screen.draw(|t| {
                t.clear_line(previous)?;
                t.write_str(&line)?;
                t.write_str("\r")
            });
            last_printed = line;
        }

        outcomes.record(&event);
    }

    if !last_printed.is_empty() {
        screen.draw(|t| t.write_str("\n"));
    }

    outcomes
}
