use std::time::{Duration, Instant};

/// How one file ended up. Every file gets exactly one outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Matched { total: usize },
    NoMatch,
    Failed { reason: String },
}

impl FileOutcome {
    pub fn matches(&self) -> usize {
        match self {
            FileOutcome::Matched { total } => *total,
            _ => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// Run-level counters, updated once per file by the batch loop.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub files_discovered: usize,
    pub files_succeeded: usize,
    pub files_failed: usize,
    pub total_matches: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl RunSummary {
    pub fn new(files_discovered: usize) -> Self {
        Self {
            files_discovered,
            files_succeeded: 0,
            files_failed: 0,
            total_matches: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn start_file<S: Into<String>>(&mut self, name: S) {
        self.current_file = Some(name.into());
    }

    pub fn record(&mut self, outcome: &FileOutcome) {
        if outcome.is_failure() {
            self.files_failed += 1;
        } else {
            self.files_succeeded += 1;
            self.total_matches += outcome.matches();
        }
    }

    pub fn files_processed(&self) -> usize {
        self.files_succeeded + self.files_failed
    }

    pub fn is_complete(&self) -> bool {
        self.files_processed() == self.files_discovered
    }

    pub fn has_failures(&self) -> bool {
        self.files_failed > 0
    }

    pub fn percentage(&self) -> f64 {
        if self.files_discovered == 0 {
            0.0
        } else {
            (self.files_processed() as f64 / self.files_discovered as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        let processed = self.files_processed();
        if processed == 0 {
            return Duration::from_secs(0);
        }

        let rate = processed as f64 / self.elapsed().as_secs_f64();
        let remaining_files = self.files_discovered.saturating_sub(processed);

        if rate > 0.0 && rate.is_finite() {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}
