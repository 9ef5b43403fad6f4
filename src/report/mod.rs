pub mod run_summary;
pub mod sink_writer;

pub use run_summary::{FileOutcome, RunSummary};
pub use sink_writer::{format_match_block, ReportSinks};
