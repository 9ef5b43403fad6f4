pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod report;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, OutputConfig, ScanConfig};
pub use error::{Result, ScanError, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    BatchEvent, BatchProcessor, ExtractionError, FileReport, KeywordCount, KeywordCounter,
    PdfTextExtractor, TextExtractor,
};
pub use report::{FileOutcome, ReportSinks, RunSummary};
pub use scanner::{FileScanner, GlobPattern, ScanFile, ScanStatistics};
pub use ui::{OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use std::path::Path;
use tracing::info;

/// Main library interface: one configured keyword-counting run.
pub struct PdfKeywords {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl PdfKeywords {
    /// Create a new instance from an already validated configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create an instance from CLI arguments; fails on any configuration error
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Ok(Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Resolve the configured pattern into the fixed, sorted file list
    pub fn discover_files(&self) -> Result<Vec<ScanFile>> {
        let scanner = FileScanner::new(&self.config.scan)?;

        let spinner = self.progress_manager.create_spinner("Scanning for files...");
        let files = scanner.scan();
        spinner.finish_and_clear();
        let files = files?;

        let stats = scanner.get_statistics(&files);
        self.output_formatter.debug(&stats.display_summary());

        Ok(files)
    }

    /// Run over all matched files with the PDF text extractor
    pub fn run(&self) -> Result<RunSummary> {
        self.run_with_extractor(PdfTextExtractor::new())
    }

    /// Run over all matched files with the given extractor.
    ///
    /// Keywords and the pattern are checked before any file is opened. The
    /// summary is printed once every file has been processed.
    pub fn run_with_extractor<E: TextExtractor>(&self, extractor: E) -> Result<RunSummary> {
        let counter = KeywordCounter::new(&self.config.scan.keywords)?;
        GlobPattern::new(&self.config.scan.pattern)?;

        self.output_formatter
            .start_operation(&format!("Scanning {}", self.config.scan.pattern));
        let files = self.discover_files()?;

        if files.is_empty() {
            self.output_formatter.warning(&format!(
                "No files match pattern: {}",
                self.config.scan.pattern
            ));
        } else {
            self.output_formatter
                .info(&format!("Found {} files to parse", files.len()));
        }

        let processor = BatchProcessor::new(extractor, counter, ReportSinks::new(&self.config.output));
        let summary = self.process_with_progress(&processor, &files)?;

        self.output_formatter.print_run_summary(&summary);
        info!(
            pattern = self.config.scan.pattern.as_str(),
            files = summary.files_discovered,
            "keyword scan complete"
        );

        Ok(summary)
    }

    fn process_with_progress<E: TextExtractor>(
        &self,
        processor: &BatchProcessor<E>,
        files: &[ScanFile],
    ) -> Result<RunSummary> {
        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);
        let output = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));

        let observer = |event: BatchEvent<'_>, summary: &RunSummary| {
            match event {
                BatchEvent::Started(file) => output.file_opening(&file.display_path()),
                BatchEvent::Finished(file, outcome) => {
                    output.file_outcome(&file.display_path(), outcome)
                }
            }
            ui::progress::update_file_progress(&file_progress, summary);
        };

        match processor.process_files(files, Some(&observer)) {
            Ok(summary) => {
                ui::progress::finish_progress_with_summary(&file_progress, &summary);
                self.progress_manager.clear();
                Ok(summary)
            }
            Err(e) => {
                file_progress.abandon();
                self.progress_manager.clear();
                Err(e)
            }
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ScanError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Get build information
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        target: std::env::consts::ARCH.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pdfkeywords {} ({}) built on {} for {}",
            self.version, self.git_hash, self.build_date, self.target
        )
    }
}
