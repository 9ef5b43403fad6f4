pub mod file_scanner;
pub mod glob_pattern;

pub use file_scanner::{FileScanner, ScanFile, ScanStatistics};
pub use glob_pattern::GlobPattern;
