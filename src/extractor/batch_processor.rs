use crate::error::Result;
use crate::extractor::keyword_counter::KeywordCounter;
use crate::extractor::text_extractor::TextExtractor;
use crate::report::{FileOutcome, ReportSinks, RunSummary};
use crate::scanner::ScanFile;
use tracing::{debug, info};

/// What the batch loop reports to its observer, before and after each file.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Started(&'a ScanFile),
    Finished(&'a ScanFile, &'a FileOutcome),
}

pub struct BatchProcessor<E> {
    extractor: E,
    counter: KeywordCounter,
    sinks: ReportSinks,
}

impl<E: TextExtractor> BatchProcessor<E> {
    pub fn new(extractor: E, counter: KeywordCounter, sinks: ReportSinks) -> Self {
        Self {
            extractor,
            counter,
            sinks,
        }
    }

    pub fn sinks(&self) -> &ReportSinks {
        &self.sinks
    }

    /// Processes files strictly one after another. Extraction failures are
    /// recorded and skipped; only a failed report write stops the run.
    pub fn process_files(
        &self,
        files: &[ScanFile],
        observer: Option<&dyn Fn(BatchEvent<'_>, &RunSummary)>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::new(files.len());

        for file in files {
            summary.start_file(file.display_path());
            if let Some(observer) = observer {
                observer(BatchEvent::Started(file), &summary);
            }

            let outcome = self.process_file(file)?;
            summary.record(&outcome);

            if let Some(observer) = observer {
                observer(BatchEvent::Finished(file, &outcome), &summary);
            }
        }

        info!(
            discovered = summary.files_discovered,
            succeeded = summary.files_succeeded,
            failed = summary.files_failed,
            matches = summary.total_matches,
            "run finished"
        );

        Ok(summary)
    }

    pub fn process_file(&self, file: &ScanFile) -> Result<FileOutcome> {
        debug!(file = %file.path.display(), "extracting text");

        let text = match self.extractor.extract(&file.path) {
            Ok(text) => text,
            Err(err) => {
                info!(file = %file.path.display(), error = %err, "extraction failed");
                self.sinks.record_error(&file.path, &err)?;
                return Ok(FileOutcome::Failed {
                    reason: err.to_string(),
                });
            }
        };

        let report = self.counter.count(&text);
        let total = report.total();

        if total > 0 {
            self.sinks.record_match(&file.path, &report)?;
            Ok(FileOutcome::Matched { total })
        } else {
            self.sinks.record_no_match(&file.path)?;
            Ok(FileOutcome::NoMatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use crate::error::ScanError;
    use crate::extractor::text_extractor::ExtractionError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Serves canned text per path; paths without text fail like a corrupt PDF.
    struct FakeExtractor {
        texts: HashMap<PathBuf, String>,
        opened: RefCell<Vec<PathBuf>>,
    }

    impl FakeExtractor {
        fn new(texts: &[(&str, &str)]) -> Self {
            Self {
                texts: texts
                    .iter()
                    .map(|(path, text)| (PathBuf::from(path), text.to_string()))
                    .collect(),
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextExtractor for FakeExtractor {
        fn extract(&self, path: &Path) -> std::result::Result<String, ExtractionError> {
            self.opened.borrow_mut().push(path.to_path_buf());
            self.texts
                .get(path)
                .cloned()
                .ok_or_else(|| ExtractionError::Parse("invalid file header".to_string()))
        }
    }

    fn files(names: &[&str]) -> Vec<ScanFile> {
        names
            .iter()
            .map(|name| ScanFile::new(PathBuf::from(name), 0))
            .collect()
    }

    fn processor(dir: &Path, extractor: FakeExtractor) -> BatchProcessor<FakeExtractor> {
        let keywords = vec!["cat".to_string(), "C++".to_string()];
        let sinks = ReportSinks::new(&OutputConfig {
            match_file: dir.join("pdf_match.txt"),
            no_match_file: dir.join("pdf_no_match.txt"),
            error_file: dir.join("errors.txt"),
        });
        BatchProcessor::new(extractor, KeywordCounter::new(&keywords).unwrap(), sinks)
    }

    #[test]
    fn test_corrupt_file_does_not_stop_the_batch() {
        let temp_dir = TempDir::new().unwrap();
        let extractor = FakeExtractor::new(&[
            ("one.pdf", "the cat sat on the cat"),
            ("three.pdf", "nothing to see here"),
        ]);
        let processor = processor(temp_dir.path(), extractor);

        let summary = processor
            .process_files(&files(&["one.pdf", "two.pdf", "three.pdf"]), None)
            .unwrap();

        assert_eq!(summary.files_discovered, 3);
        assert_eq!(summary.files_succeeded, 2);
        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.total_matches, 2);
        assert!(summary.is_complete());

        let matched = fs::read_to_string(temp_dir.path().join("pdf_match.txt")).unwrap();
        assert!(matched.contains("FILE: one.pdf\n'cat' appears 2 times\n"));
        assert!(!matched.contains("C++"));

        let no_match = fs::read_to_string(temp_dir.path().join("pdf_no_match.txt")).unwrap();
        assert_eq!(no_match, "FILE: three.pdf contains no keywords\n");

        let errors = fs::read_to_string(temp_dir.path().join("errors.txt")).unwrap();
        assert_eq!(errors, "Error occurred in two.pdf: invalid file header\n");
    }

    #[test]
    fn test_files_are_processed_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let extractor = FakeExtractor::new(&[("a.pdf", "cat"), ("b.pdf", "C++")]);
        let processor = processor(temp_dir.path(), extractor);

        processor
            .process_files(&files(&["b.pdf", "a.pdf"]), None)
            .unwrap();

        let opened = processor.extractor.opened.borrow();
        assert_eq!(*opened, vec![PathBuf::from("b.pdf"), PathBuf::from("a.pdf")]);
    }

    #[test]
    fn test_observer_sees_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let extractor = FakeExtractor::new(&[("a.pdf", "C++ and C#")]);
        let processor = processor(temp_dir.path(), extractor);
        let events = RefCell::new(Vec::new());

        let observer = |event: BatchEvent<'_>, summary: &RunSummary| {
            let entry = match event {
                BatchEvent::Started(file) => format!("start {}", file.display_path()),
                BatchEvent::Finished(file, outcome) => format!(
                    "done {} {:?} {}",
                    file.display_path(),
                    outcome,
                    summary.files_processed()
                ),
            };
            events.borrow_mut().push(entry);
        };

        processor
            .process_files(&files(&["a.pdf", "b.pdf"]), Some(&observer))
            .unwrap();

        let events = events.into_inner();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], "start a.pdf");
        assert_eq!(events[1], "done a.pdf Matched { total: 1 } 1");
        assert_eq!(events[2], "start b.pdf");
        assert!(events[3].starts_with("done b.pdf Failed"));
    }

    #[test]
    fn test_empty_batch() {
        let temp_dir = TempDir::new().unwrap();
        let processor = processor(temp_dir.path(), FakeExtractor::new(&[]));

        let summary = processor.process_files(&[], None).unwrap();
        assert_eq!(summary.files_discovered, 0);
        assert!(summary.is_complete());
        assert!(!temp_dir.path().join("errors.txt").exists());
    }

    #[test]
    fn test_report_write_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let keywords = vec!["cat".to_string()];
        let sinks = ReportSinks::new(&OutputConfig {
            match_file: temp_dir.path().to_path_buf(),
            no_match_file: temp_dir.path().join("n.txt"),
            error_file: temp_dir.path().join("e.txt"),
        });
        let processor = BatchProcessor::new(
            FakeExtractor::new(&[("a.pdf", "cat")]),
            KeywordCounter::new(&keywords).unwrap(),
            sinks,
        );

        let result = processor.process_files(&files(&["a.pdf"]), None);
        assert!(matches!(result, Err(ScanError::ReportWrite { .. })));
    }

    #[test]
    fn test_running_twice_appends() {
        let temp_dir = TempDir::new().unwrap();
        let batch = files(&["a.pdf", "b.pdf", "c.pdf"]);

        for _ in 0..2 {
            let extractor = FakeExtractor::new(&[("a.pdf", "cat"), ("b.pdf", "dog")]);
            processor(temp_dir.path(), extractor)
                .process_files(&batch, None)
                .unwrap();
        }

        let matched = fs::read_to_string(temp_dir.path().join("pdf_match.txt")).unwrap();
        assert_eq!(matched.matches("===== START =====").count(), 2);
        assert_eq!(matched.matches("====== END ======").count(), 2);

        let no_match = fs::read_to_string(temp_dir.path().join("pdf_no_match.txt")).unwrap();
        assert_eq!(no_match.lines().count(), 2);

        let errors = fs::read_to_string(temp_dir.path().join("errors.txt")).unwrap();
        assert_eq!(errors.lines().count(), 2);
    }
}
