use crate::error::{ScanError, UserFriendlyError};
use crate::report::{FileOutcome, RunSummary};
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Plain,
}

impl OutputMode {
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        }
    }
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static PAGE: Emoji = Emoji("📄 ", "- ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            OutputMode::Plain => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    // Per-file progress lines
    pub fn file_opening(&self, path: &str) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human if self.use_colors => {
                println!("{}Opening: {}", PAGE, style(path).dim());
            }
            _ => println!("Opening: {}", path),
        }
    }

    pub fn file_outcome(&self, path: &str, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Matched { total } => {
                if self.should_show_message(0) {
                    let line = format!("{} contains {} keywords", path, total);
                    if self.use_colors {
                        println!("  {}", style(line).green());
                    } else {
                        println!("{}", line);
                    }
                }
            }
            FileOutcome::NoMatch => {
                if self.should_show_message(0) {
                    let line = format!("{} contains no keywords", path);
                    if self.use_colors {
                        println!("  {}", style(line).dim());
                    } else {
                        println!("{}", line);
                    }
                }
            }
            FileOutcome::Failed { reason } => {
                self.error(&format!(
                    "Error occurred in {}, writing to error file",
                    path
                ));
                self.debug(reason);
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &ScanError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    /// Printed after every run with a valid configuration, even in quiet mode.
    pub fn print_run_summary(&self, summary: &RunSummary) {
        match self.mode {
            OutputMode::Human => self.print_human_summary(summary),
            OutputMode::Plain => print!("{}", format_plain_summary(summary)),
        }
    }

    // Specialized output methods
    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            println!("{}", style("─".repeat(60)).dim());
        } else {
            println!("{}", "-".repeat(60));
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_human_summary(&self, summary: &RunSummary) {
        if !self.use_colors {
            print!("{}", format_plain_summary(summary));
            if self.should_show_message(1) {
                println!("Time taken: {}", format_duration(summary.elapsed()));
            }
            return;
        }

        let value = |n: usize| style(n).cyan().bold().to_string();

        println!();
        println!("{}", style("====== END OF SCRIPT SUMMARY ======").bold());
        println!("Files parsed: {}", value(summary.files_discovered));
        println!("Successfully parsed: {}", value(summary.files_succeeded));
        if summary.files_failed > 0 {
            println!(
                "Failed to parse: {}",
                style(summary.files_failed).red().bold()
            );
        } else {
            println!("Failed to parse: {}", value(summary.files_failed));
        }
        println!("Total number of keywords found: {}", value(summary.total_matches));
        if self.should_show_message(1) {
            println!(
                "Time taken: {}",
                style(format_duration(summary.elapsed())).cyan()
            );
        }
        println!("{}", style("=============== END ===============").bold());
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

pub fn format_plain_summary(summary: &RunSummary) -> String {
    format!(
        "====== END OF SCRIPT SUMMARY ======\n\
         Files parsed: {}\n\
         Successfully parsed: {}\n\
         Failed to parse: {}\n\
         Total number of keywords found: {}\n\
         =============== END ===============\n",
        summary.files_discovered,
        summary.files_succeeded,
        summary.files_failed,
        summary.total_matches
    )
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

// Progress-aware output wrapper
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn file_opening(&self, path: &str) {
        self.suspend_and_print(|f| f.file_opening(path));
    }

    pub fn file_outcome(&self, path: &str, outcome: &FileOutcome) {
        self.suspend_and_print(|f| f.file_outcome(path, outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_parsing() {
        assert_eq!(OutputMode::from_string("human"), OutputMode::Human);
        assert_eq!(OutputMode::from_string("PLAIN"), OutputMode::Plain);
        assert_eq!(OutputMode::from_string("invalid"), OutputMode::Human);
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = OutputFormatter::new(OutputMode::Human, 1, false);
        assert_eq!(formatter.mode(), OutputMode::Human);
        assert_eq!(formatter.verbose_level, 1);
        assert!(!formatter.quiet);

        let plain = OutputFormatter::new(OutputMode::Plain, 0, false);
        assert!(!plain.use_colors);
    }

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(formatter.quiet);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_plain_summary_format() {
        let mut summary = RunSummary::new(3);
        summary.record(&FileOutcome::Matched { total: 5 });
        summary.record(&FileOutcome::NoMatch);
        summary.record(&FileOutcome::Failed {
            reason: "bad".to_string(),
        });

        let text = format_plain_summary(&summary);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "====== END OF SCRIPT SUMMARY ======",
                "Files parsed: 3",
                "Successfully parsed: 2",
                "Failed to parse: 1",
                "Total number of keywords found: 5",
                "=============== END ===============",
            ]
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_millis(0)), "0ms");
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(2));
        assert!(!formatter.should_show_message(3));

        let quiet_formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert!(!quiet_formatter.should_show_message(0));
    }
}
