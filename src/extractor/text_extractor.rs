use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Why a single file could not be turned into text. Never aborts a run.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("{0}")]
    Parse(String),

    #[error("PDF parser crashed: {0}")]
    Panicked(String),
}

/// Turns one file into plain text.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

impl<F> TextExtractor for F
where
    F: Fn(&Path) -> Result<String, ExtractionError>,
{
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        self(path)
    }
}

/// Extracts the text of every page, in document order, with `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path)?;

        if bytes.is_empty() {
            return Err(ExtractionError::Parse("file is empty".to_string()));
        }

        // pdf-extract panics on some malformed documents.
        let result = catch_quietly(|| pdf_extract::extract_text_from_mem(&bytes));

        match result {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(err)) => Err(ExtractionError::Parse(err.to_string())),
            Err(payload) => Err(ExtractionError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

static PANIC_HOOK_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f`, turning a panic into `Err` without the default hook's stderr report.
fn catch_quietly<T>(f: impl FnOnce() -> T) -> std::thread::Result<T> {
    let _guard = PANIC_HOOK_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);

    result
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
