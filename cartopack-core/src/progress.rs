//! Progress reporting for long-running stages.

use log::{debug, error, info, warn};

/// Sink for stage progress and diagnostics.
pub trait Progress {
    /// Start a new named action.
    fn set_action(&mut self, action: &str);
    /// Report `current` of `total` units done within the current action.
    fn set_progress(&mut self, current: u64, total: u64);
    /// Informational message.
    fn info(&mut self, message: &str);
    /// Recoverable problem.
    fn warning(&mut self, message: &str);
    /// Failure that aborts the stage.
    fn error(&mut self, message: &str);
}

/// [`Progress`] implementation forwarding to the `log` facade.
///
/// Progress lines are logged at debug level, at most once per whole percent.
#[derive(Debug, Default)]
pub struct LogProgress {
    action: String,
    last_percent: Option<u64>,
}

impl LogProgress {
    /// A sink with no current action.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The action most recently set.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl Progress for LogProgress {
    fn set_action(&mut self, action: &str) {
        action.clone_into(&mut self.action);
        self.last_percent = None;
        info!("{action}");
    }

    fn set_progress(&mut self, current: u64, total: u64) {
        let Some(percent) = current.saturating_mul(100).checked_div(total) else {
            return;
        };
        if self.last_percent == Some(percent) {
            return;
        }
        self.last_percent = Some(percent);
        debug!("{}: {percent}% ({current}/{total})", self.action);
    }

    fn info(&mut self, message: &str) {
        info!("{message}");
    }

    fn warning(&mut self, message: &str) {
        warn!("{message}");
    }

    fn error(&mut self, message: &str) {
        error!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_totals_are_ignored() {
        let mut progress = LogProgress::new();
        progress.set_action("Scanning");
        progress.set_progress(0, 0);
        assert_eq!(progress.last_percent, None);
    }

    #[test]
    fn percent_is_tracked_per_action() {
        let mut progress = LogProgress::new();
        progress.set_action("Scanning");
        progress.set_progress(1, 3);
        assert_eq!(progress.last_percent, Some(33));
        progress.set_action("Copying");
        assert_eq!(progress.action(), "Copying");
        assert_eq!(progress.last_percent, None);
    }
}
