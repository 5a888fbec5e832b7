use crate::model::Aggregator;
use crate::signature::OperationKind;

/// One line of the slow find report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub namespace: String,
    pub kind: OperationKind,
    /// Suggested index, as a JSON object string.
    pub signature: String,
    pub count: u64,
    pub avg_duration_ms: f64,
}

/// Build the report rows: find shapes seen at least `threshold` times,
/// slowest average first.
///
/// An empty result means "nothing to report"; callers tell "no input" apart
/// by checking `aggregate.is_empty()`.
pub fn build_report(aggregate: &Aggregator, threshold: u64) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = aggregate
        .iter()
        .filter(|(key, record)| key.kind.is_find() && record.count >= threshold)
        .map(|(key, record)| ReportRow {
            namespace: key.namespace.clone(),
            kind: key.kind.clone(),
            signature: key.signature.clone(),
            count: record.count,
            avg_duration_ms: record.average_duration_ms(),
        })
        .collect();

    // Stable sort: ties keep key order.
    rows.sort_by(|a, b| b.avg_duration_ms.total_cmp(&a.avg_duration_ms));
    rows
}
