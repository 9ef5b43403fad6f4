pub mod batch_processor;
pub mod keyword_counter;
pub mod text_extractor;

pub use batch_processor::{BatchEvent, BatchProcessor};
pub use keyword_counter::{FileReport, KeywordCount, KeywordCounter};
pub use text_extractor::{ExtractionError, PdfTextExtractor, TextExtractor};
