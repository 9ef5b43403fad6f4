use crate::config::OutputConfig;
use crate::error::{Result, ScanError};
use crate::extractor::{ExtractionError, FileReport};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The three append-only report files of a run.
///
/// Every record opens its file, writes one complete entry and closes it
/// again, so entries written before a crash stay intact.
#[derive(Debug, Clone)]
pub struct ReportSinks {
    match_file: PathBuf,
    no_match_file: PathBuf,
    error_file: PathBuf,
}

impl ReportSinks {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            match_file: config.match_file.clone(),
            no_match_file: config.no_match_file.clone(),
            error_file: config.error_file.clone(),
        }
    }

    pub fn match_file(&self) -> &Path {
        &self.match_file
    }

    pub fn no_match_file(&self) -> &Path {
        &self.no_match_file
    }

    pub fn error_file(&self) -> &Path {
        &self.error_file
    }

    pub fn record_match(&self, file: &Path, report: &FileReport) -> Result<()> {
        append(&self.match_file, &format_match_block(file, report))
    }

    pub fn record_no_match(&self, file: &Path) -> Result<()> {
        append(
            &self.no_match_file,
            &format!("FILE: {} contains no keywords\n", file.display()),
        )
    }

    pub fn record_error(&self, file: &Path, error: &ExtractionError) -> Result<()> {
        append(
            &self.error_file,
            &format!("Error occurred in {}: {}\n", file.display(), single_line(&error.to_string())),
        )
    }
}

pub fn format_match_block(file: &Path, report: &FileReport) -> String {
    let mut block = String::from("===== START =====\n");
    block.push_str(&format!("FILE: {}\n", file.display()));

    for entry in report.matched() {
        block.push_str(&format!("'{}' appears {} times\n", entry.keyword, entry.count));
    }

    block.push_str("====== END ======\n\n");
    block
}

fn append(sink: &Path, content: &str) -> Result<()> {
    let to_report_error = |source: std::io::Error| ScanError::ReportWrite {
        path: sink.display().to_string(),
        source,
    };

    if let Some(parent) = sink.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(to_report_error)?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(sink)
        .map_err(to_report_error)?;

    file.write_all(content.as_bytes()).map_err(to_report_error)?;
    file.flush().map_err(to_report_error)?;

    debug!(sink = %sink.display(), bytes = content.len(), "report entry appended");
    Ok(())
}

/// Keeps one error per line in the error report.
fn single_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::KeywordCounter;
    use tempfile::TempDir;

    fn sinks_in(dir: &Path) -> ReportSinks {
        ReportSinks::new(&OutputConfig {
            match_file: dir.join("pdf_match.txt"),
            no_match_file: dir.join("pdf_no_match.txt"),
            error_file: dir.join("errors.txt"),
        })
    }

    fn report_for(text: &str) -> FileReport {
        let keywords = vec!["cat".to_string(), "dog".to_string(), "C++".to_string()];
        KeywordCounter::new(&keywords).unwrap().count(text)
    }

    #[test]
    fn test_match_block_format() {
        let report = report_for("cat C++ cat");
        let block = format_match_block(Path::new("docs/a.pdf"), &report);

        assert_eq!(
            block,
            "===== START =====\n\
             FILE: docs/a.pdf\n\
             'cat' appears 2 times\n\
             'C++' appears 1 times\n\
             ====== END ======\n\n"
        );
    }

    #[test]
    fn test_records_go_to_separate_files() {
        let temp_dir = TempDir::new().unwrap();
        let sinks = sinks_in(temp_dir.path());

        sinks
            .record_match(Path::new("a.pdf"), &report_for("dog"))
            .unwrap();
        sinks.record_no_match(Path::new("b.pdf")).unwrap();
        sinks
            .record_error(
                Path::new("c.pdf"),
                &ExtractionError::Parse("invalid file header".to_string()),
            )
            .unwrap();

        let matched = fs::read_to_string(sinks.match_file()).unwrap();
        assert!(matched.contains("FILE: a.pdf\n'dog' appears 1 times\n"));

        let no_match = fs::read_to_string(sinks.no_match_file()).unwrap();
        assert_eq!(no_match, "FILE: b.pdf contains no keywords\n");

        let errors = fs::read_to_string(sinks.error_file()).unwrap();
        assert_eq!(errors, "Error occurred in c.pdf: invalid file header\n");
    }

    #[test]
    fn test_append_is_additive() {
        let temp_dir = TempDir::new().unwrap();
        let sinks = sinks_in(temp_dir.path());

        sinks.record_no_match(Path::new("b.pdf")).unwrap();
        sinks.record_no_match(Path::new("b.pdf")).unwrap();

        let no_match = fs::read_to_string(sinks.no_match_file()).unwrap();
        assert_eq!(no_match.lines().count(), 2);
        assert!(no_match.lines().all(|l| l == "FILE: b.pdf contains no keywords"));
    }

    #[test]
    fn test_missing_parent_directory_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let sinks = sinks_in(&temp_dir.path().join("reports/run1"));

        sinks.record_no_match(Path::new("x.pdf")).unwrap();
        assert!(sinks.no_match_file().exists());
    }

    #[test]
    fn test_multiline_errors_are_flattened() {
        let temp_dir = TempDir::new().unwrap();
        let sinks = sinks_in(temp_dir.path());

        sinks
            .record_error(
                Path::new("c.pdf"),
                &ExtractionError::Parse("bad xref\n  at offset 12".to_string()),
            )
            .unwrap();

        let errors = fs::read_to_string(sinks.error_file()).unwrap();
        assert_eq!(errors.lines().count(), 1);
        assert!(errors.contains("bad xref at offset 12"));
    }

    #[test]
    fn test_unwritable_sink_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let sinks = ReportSinks::new(&OutputConfig {
            match_file: temp_dir.path().join("m.txt"),
            no_match_file: temp_dir.path().to_path_buf(),
            error_file: temp_dir.path().join("e.txt"),
        });

        let result = sinks.record_no_match(Path::new("x.pdf"));
        assert!(matches!(result, Err(ScanError::ReportWrite { .. })));
    }
}
