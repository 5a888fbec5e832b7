//! Log ingestion for the mongod structured (JSON lines) log.

pub mod parse;
pub mod record;

pub use parse::{Analysis, analyze_log_file};
pub use record::LogRecord;
