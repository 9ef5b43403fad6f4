use crate::config::{load_keywords_file, CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdfkeywords")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Count keyword occurrences across a set of PDF files")]
#[command(
    long_about = "pdfkeywords extracts the text of every PDF matched by a path pattern, \
                  counts whole-word occurrences of each keyword and appends the results \
                  to match, no-match and error report files."
)]
#[command(before_help = "📄 pdfkeywords - PDF Keyword Counter")]
#[command(after_help = "EXAMPLES:\n  \
    pdfkeywords \"papers/**/*.pdf\" --keywords Rust,C++\n  \
    pdfkeywords \"./*.pdf\" --keywords-file keywords.txt --match-file reports/hits.txt\n  \
    pdfkeywords --config pdfkeywords.toml --dry-run\n  \
    pdfkeywords --generate-config\n\n\
    Quote the pattern so the shell does not expand it.")]
pub struct Cli {
    /// Path pattern selecting the PDF files (supports *, ?, [abc] and **)
    pub pattern: Option<String>,

    /// Keywords to count (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub keywords: Option<Vec<String>>,

    /// File with one keyword per line
    #[arg(long, help = "Read keywords from a file (one per line, # starts a comment)")]
    pub keywords_file: Option<PathBuf>,

    /// Report file for files containing keywords
    #[arg(long)]
    pub match_file: Option<PathBuf>,

    /// Report file for files without keywords
    #[arg(long)]
    pub no_match_file: Option<PathBuf>,

    /// Report file for files that could not be parsed
    #[arg(long)]
    pub error_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for console messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors and the final summary)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Descend into hidden files and directories
    #[arg(long)]
    pub include_hidden: bool,

    /// Follow symbolic links while walking directories
    #[arg(long)]
    pub follow_links: bool,

    /// Dry run (list the files that would be parsed without parsing them)
    #[arg(long, help = "Show which files would be parsed without writing any report")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// Plain text output
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides()?;
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    /// `--keywords` and `--keywords-file` combine, command-line keywords first.
    pub fn create_cli_overrides(&self) -> Result<CliOverrides> {
        let mut keywords = self.keywords.as_ref().map(|list| {
            list.iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect::<Vec<_>>()
        });

        if let Some(ref path) = self.keywords_file {
            let from_file = load_keywords_file(path)?;
            keywords.get_or_insert_with(Vec::new).extend(from_file);
        }

        Ok(CliOverrides::new()
            .with_pattern(self.pattern.clone())
            .with_keywords(keywords)
            .with_match_file(self.match_file.clone())
            .with_no_match_file(self.no_match_file.clone())
            .with_error_file(self.error_file.clone())
            .with_include_hidden(self.include_hidden)
            .with_follow_links(self.follow_links))
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_format.into()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
