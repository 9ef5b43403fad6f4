use crate::report::RunSummary;
use crate::ui::output::format_duration;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} files {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.set_message("Parsing files...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(message.to_string());
        pb
    }

    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }

    pub fn clear(&self) {
        if self.enabled {
            self.multi_progress.clear().ok();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_file_progress(pb: &ProgressBar, summary: &RunSummary) {
    pb.set_position(summary.files_processed() as u64);

    if let Some(ref current_file) = summary.current_file {
        let eta = if summary.files_processed() > 0 {
            let estimated_remaining = summary.estimated_remaining();
            if estimated_remaining.as_secs() > 0 {
                format!(" (ETA: {})", format_duration(estimated_remaining))
            } else {
                String::new()
            }
        } else {
            String::new()
        };

        pb.set_message(format!("{}{}", current_file, eta));
    } else {
        pb.set_message("Parsing files...");
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, summary: &RunSummary) {
    let message = format!(
        "{} parsed, {} failed, {} keywords (completed in {})",
        summary.files_succeeded,
        summary.files_failed,
        summary.total_matches,
        format_duration(summary.elapsed())
    );
    pb.finish_with_message(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::FileOutcome;

    #[test]
    fn test_disabled_manager_hands_out_hidden_bars() {
        let manager = ProgressManager::new(false);
        assert!(!manager.is_enabled());

        let pb = manager.create_file_progress(10);
        assert!(pb.is_hidden());

        let spinner = manager.create_spinner("Scanning");
        assert!(spinner.is_hidden());
    }

    #[test]
    fn test_suspend_runs_closure() {
        let manager = ProgressManager::new(false);
        let value = manager.suspend(|| 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_update_file_progress_tracks_position() {
        let pb = ProgressBar::hidden();
        pb.set_length(3);

        let mut summary = RunSummary::new(3);
        summary.start_file("a.pdf");
        summary.record(&FileOutcome::NoMatch);
        summary.start_file("b.pdf");
        update_file_progress(&pb, &summary);

        assert_eq!(pb.position(), 1);
        assert!(pb.message().starts_with("b.pdf"));
    }

    #[test]
    fn test_finish_progress_with_summary() {
        let pb = ProgressBar::hidden();
        let mut summary = RunSummary::new(1);
        summary.record(&FileOutcome::Matched { total: 3 });

        finish_progress_with_summary(&pb, &summary);
        assert!(pb.is_finished());
        assert!(pb.message().contains("3 keywords"));
    }
}
