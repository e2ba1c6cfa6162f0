//! Newline-delimited JSON, one record per event, in producer order.

use crate::pipeline::{FileOutcomes, StatusReceiver};

use super::terminal::{Screen, Terminal};

pub async fn render(mut receiver: StatusReceiver, term: &mut dyn Terminal) -> FileOutcomes {
    let mut screen = Screen::new(term);
    let mut outcomes = FileOutcomes::new();

    while let Some(event) = receiver.recv().await {
        match serde_json::to_string(&event) {
            Ok(record) => screen.draw(|t| t.write_line(&record)),
            Err(err) => tracing::warn!(file = %event.file_name, "Failed to encode status event: {}", err),
        }
        outcomes.record(&event);
    }

    outcomes
}
