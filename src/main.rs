use clap::Parser;
use pdfkeywords::{Cli, OutputFormatter, PdfKeywords, ScanError, UserFriendlyError};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match PdfKeywords::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&cli, &e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&app);
    }

    match app.run() {
        Ok(summary) => {
            if summary.has_failures() {
                4
            } else {
                0
            }
        }
        Err(e) => {
            app.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &ScanError) -> i32 {
    match error {
        ScanError::InvalidPattern { .. } => 3,
        e if e.is_configuration_error() => 2,
        _ => 1,
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `-v`.
fn setup_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(console::Term::stderr().features().colors_supported())
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "pdfkeywords.toml".to_string());

    match PdfKeywords::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  pdfkeywords --config {}", config_path);
            println!("\nEdit the pattern and keywords to match your documents.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(app: &PdfKeywords) -> i32 {
    let formatter = app.output_formatter();
    let config = app.config();

    formatter.warning("DRY RUN MODE - No files will be parsed and no reports written");
    formatter.print_separator();

    println!("  Pattern: {}", config.scan.pattern);
    println!("  Keywords: {}", config.scan.keywords.join(", "));
    println!("  Match report: {}", config.output.match_file.display());
    println!("  No-match report: {}", config.output.no_match_file.display());
    println!("  Error report: {}", config.output.error_file.display());
    println!("  Include hidden: {}", config.scan.include_hidden);
    println!("  Follow links: {}", config.scan.follow_links);

    formatter.print_separator();

    let files = match app.discover_files() {
        Ok(files) => files,
        Err(e) => {
            app.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    println!("Files that would be parsed ({}):", files.len());
    for file in &files {
        println!("  {} ({})", file.display_path(), file.format_size());
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to count keywords");

    0
}

fn print_startup_error(cli: &Cli, error: &ScanError) {
    let formatter = OutputFormatter::new(cli.output_mode(), 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfkeywords::{Config, OutputMode};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "pdfkeywords",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[scan]"));
    }

    #[test]
    fn test_dry_run_creates_no_reports() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.pdf"), "").unwrap();

        let mut config = Config::default();
        config.scan.pattern = format!("{}/*.pdf", temp_dir.path().display());
        config.scan.keywords = vec!["Rust".to_string()];
        config.output.match_file = temp_dir.path().join("m.txt");
        config.output.no_match_file = temp_dir.path().join("n.txt");
        config.output.error_file = temp_dir.path().join("e.txt");

        let app = PdfKeywords::new(config, OutputMode::Plain, 0, true);
        assert_eq!(handle_dry_run(&app), 0);
        for name in ["m.txt", "n.txt", "e.txt"] {
            assert!(!temp_dir.path().join(name).exists(), "{} was created", name);
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&ScanError::EmptyKeywords), 2);
        assert_eq!(exit_code_for(&ScanError::EmptyPattern), 2);
        assert_eq!(
            exit_code_for(&ScanError::InvalidPattern {
                pattern: "a/**b".to_string(),
                message: "bad".to_string(),
            }),
            3
        );
        assert_eq!(
            exit_code_for(&ScanError::ReportWrite {
                path: "m.txt".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            }),
            1
        );
    }
}
