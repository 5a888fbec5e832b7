use crate::Result;
use crate::diagnostics;
use crate::log::record::LogRecord;
use crate::model::Aggregator;
use crate::signature::extract_signature;
use crate::window::{TimeWindow, WindowVerdict};

use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Line accounting for one analysis pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Every line read, blank and malformed ones included.
    pub lines_processed: u64,
    /// Lines that were not a JSON object.
    pub malformed_lines: u64,
    /// Records older than the window cutoff.
    pub filtered_by_time: u64,
    /// Records dropped by an active window for lacking a readable timestamp.
    pub missing_timestamp: u64,
    /// Records that produced a signature and were aggregated.
    pub slow_query_entries: u64,
}

impl AnalysisStats {
    fn absorb(&mut self, other: AnalysisStats) {
        self.lines_processed += other.lines_processed;
        self.malformed_lines += other.malformed_lines;
        self.filtered_by_time += other.filtered_by_time;
        self.missing_timestamp += other.missing_timestamp;
        self.slow_query_entries += other.slow_query_entries;
    }
}

/// Result of one analysis pass.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub aggregate: Aggregator,
    pub stats: AnalysisStats,
}

impl Analysis {
    /// Combine the analysis of another source (e.g. a rotated log file).
    pub fn absorb(&mut self, other: Analysis) {
        self.aggregate.absorb(other.aggregate);
        self.stats.absorb(other.stats);
    }

    /// Filter, extract and aggregate one raw line. Never fails: lines that
    /// cannot be used only bump a counter.
    fn ingest_line(&mut self, line: &[u8], lno: u64, window: &TimeWindow) {
        self.stats.lines_processed += 1;

        let record = match LogRecord::from_slice(line) {
            Ok(record) => record,
            Err(err) => {
                self.stats.malformed_lines += 1;
                tracing::debug!(line = lno, "skipping undecodable line: {err}");
                return;
            }
        };

        match window.check(&record) {
            WindowVerdict::Inside => {}
            WindowVerdict::TooOld => {
                self.stats.filtered_by_time += 1;
                return;
            }
            WindowVerdict::NoTimestamp => {
                self.stats.missing_timestamp += 1;
                tracing::debug!(line = lno, "skipping record without a readable timestamp");
                return;
            }
        }

        if let Some(sig) = extract_signature(&record) {
            self.stats.slow_query_entries += 1;
            self.aggregate.merge(sig.key, sig.duration_ms);
        }
    }
}

/// Stream a mongod JSON log file through the window filter, the signature
/// extractor and the aggregator.
///
/// Only failing to open or read the file is an error; bad lines are skipped.
pub fn analyze_log_file(path: &str, window: &TimeWindow) -> Result<Analysis> {
    let file = File::open(path)
        .with_context(|| diagnostics::error_message(format!("open log file {}", path)))?;

    analyze_reader(BufReader::new(file), window)
        .with_context(|| diagnostics::error_message(format!("read log file {}", path)))
}

/// Same as [`analyze_log_file`] over any buffered source.
pub fn analyze_reader<R: BufRead>(mut reader: R, window: &TimeWindow) -> Result<Analysis> {
    let mut analysis = Analysis::default();

    // Raw bytes: a line with invalid UTF-8 is skipped like any other bad line.
    let mut line = Vec::new();
    let mut lno = 0u64;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        lno += 1;
        analysis.ingest_line(&line, lno, window);
    }

    Ok(analysis)
}
