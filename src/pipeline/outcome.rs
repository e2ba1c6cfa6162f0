//! Per-file terminal outcomes and the command verdict.

use std::collections::BTreeMap;

use crate::common::{AppError, StatusEvent};

/// fileName -> success, where the last event seen for a file decides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileOutcomes {
    files: BTreeMap<String, bool>,
}

impl FileOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the file's outcome with what this event says.
    ///
    /// A file only counts as successful if this event is a clean `100%`.
    /// An in-flight update after a completion resets it to not completed.
    pub fn record(&mut self, event: &StatusEvent) {
        self.files
            .insert(event.file_name.clone(), event.is_success());
    }

    pub fn get(&self, file_name: &str) -> Option<bool> {
        self.files.get(file_name).copied()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Unique files whose terminal outcome is not success.
    pub fn failures(&self) -> usize {
        self.files.values().filter(|ok| !**ok).count()
    }

    pub fn failed_files(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(name, _)| name.as_str())
    }

    /// Success when nothing failed, otherwise a summary error with the count.
    pub fn verdict(&self) -> Result<(), AppError> {
        match self.failures() {
            0 => Ok(()),
            count => Err(AppError::OperationsFailed { count }),
        }
    }
}

impl<'a> Extend<&'a StatusEvent> for FileOutcomes {
    fn extend<T: IntoIterator<Item = &'a StatusEvent>>(&mut self, iter: T) {
        for event in iter {
            self.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_event_per_file_wins() {
        let events = [
            StatusEvent::progress("f1", "Downloading", "45%", ""),
            StatusEvent::complete("f1", "Downloading"),
            StatusEvent::failed("f2", "Downloading", "timeout"),
        ];
        let mut outcomes = FileOutcomes::new();
        outcomes.extend(events.iter());

        assert_eq!(outcomes.get("f1"), Some(true));
        assert_eq!(outcomes.get("f2"), Some(false));
        assert_eq!(outcomes.failures(), 1);
        assert_eq!(
            outcomes.verdict(),
            Err(AppError::OperationsFailed { count: 1 })
        );
    }

    #[test]
    fn later_error_overrides_earlier_success() {
        let mut outcomes = FileOutcomes::new();
        outcomes.record(&StatusEvent::complete("a", "Locking"));
        outcomes.record(&StatusEvent::failed("a", "Uploading", "rejected"));

        assert_eq!(outcomes.get("a"), Some(false));
    }

    #[test]
    fn later_success_overrides_earlier_error() {
        let mut outcomes = FileOutcomes::new();
        outcomes.record(&StatusEvent::failed("a", "Downloading", "retrying"));
        outcomes.record(&StatusEvent::complete("a", "Downloading"));

        assert_eq!(outcomes.get("a"), Some(true));
        assert!(outcomes.verdict().is_ok());
    }

    #[test]
    fn never_completed_counts_as_failure() {
        let mut outcomes = FileOutcomes::new();
        outcomes.record(&StatusEvent::progress("stuck", "Uploading", "80%", "2 MiB/s"));

        assert_eq!(outcomes.get("stuck"), Some(false));
        assert_eq!(outcomes.failed_files().collect::<Vec<_>>(), vec!["stuck"]);
    }

    #[test]
    fn empty_outcomes_succeed() {
        let outcomes = FileOutcomes::new();
        assert!(outcomes.is_empty());
        assert_eq!(outcomes.verdict(), Ok(()));
    }

    #[test]
    fn failures_count_unique_files() {
        let mut outcomes = FileOutcomes::new();
        for _ in 0..3 {
            outcomes.record(&StatusEvent::failed("a", "Locking", "denied"));
        }
        outcomes.record(&StatusEvent::failed("b", "Locking", "denied"));

        assert_eq!(
            outcomes.verdict(),
            Err(AppError::OperationsFailed { count: 2 })
        );
    }
}
