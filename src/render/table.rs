use crate::model::ReportRow;

const COUNT_WIDTH: usize = 5;
const AVG_WIDTH: usize = 17;
const NAMESPACE_WIDTH: usize = 30;
const OPERATION_WIDTH: usize = 15;
/// Lower bound for the suggested-index column; it grows to the longest signature.
const MIN_INDEX_WIDTH: usize = 50;

/// Render report rows as a bordered fixed-width text table.
///
/// ```text
/// +-------+-------------------+-----...-+-----------------+------...-+
/// | Count | Avg Duration (ms) | Namespace | Operation     | Suggested Index |
/// +-------+-------------------+-----...-+-----------------+------...-+
/// | 2     | 100.00            | db.users  | find          | {"age": 1}      |
/// +-------+-------------------+-----...-+-----------------+------...-+
/// ```
///
/// Count, namespace and operation widths are minimums: longer values push
/// the row out rather than being cut.
pub fn render_table(rows: &[ReportRow]) -> String {
    let index_width = rows
        .iter()
        .map(|r| r.signature.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_INDEX_WIDTH);

    let separator = format!(
        "+{}+{}+{}+{}+{}+",
        "-".repeat(COUNT_WIDTH + 2),
        "-".repeat(AVG_WIDTH + 2),
        "-".repeat(NAMESPACE_WIDTH + 2),
        "-".repeat(OPERATION_WIDTH + 2),
        "-".repeat(index_width + 2),
    );

    let header = format!(
        "| {:<cw$} | {:<aw$} | {:<nw$} | {:<ow$} | {:<iw$} |",
        "Count",
        "Avg Duration (ms)",
        "Namespace",
        "Operation",
        "Suggested Index",
        cw = COUNT_WIDTH,
        aw = AVG_WIDTH,
        nw = NAMESPACE_WIDTH,
        ow = OPERATION_WIDTH,
        iw = index_width,
    );

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(separator.clone());
    out.push(header);
    out.push(separator.clone());
    for row in rows {
        out.push(format!(
            "| {:<cw$} | {:<aw$.2} | {:<nw$} | {:<ow$} | {:<iw$} |",
            row.count,
            row.avg_duration_ms,
            row.namespace,
            row.kind,
            row.signature,
            cw = COUNT_WIDTH,
            aw = AVG_WIDTH,
            nw = NAMESPACE_WIDTH,
            ow = OPERATION_WIDTH,
            iw = index_width,
        ));
    }
    out.push(separator);

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::OperationKind;
    use pretty_assertions::assert_eq;

    fn row(ns: &str, sig: &str, count: u64, avg: f64) -> ReportRow {
        ReportRow {
            namespace: ns.to_string(),
            kind: OperationKind::Find,
            signature: sig.to_string(),
            count,
            avg_duration_ms: avg,
        }
    }

    #[test]
    fn renders_bordered_table() {
        let table = render_table(&[row("db.users", r#"{"age": 1}"#, 2, 100.0)]);
        let sep = format!(
            "+-------+-------------------+{}+-----------------+{}+",
            "-".repeat(32),
            "-".repeat(52)
        );
        let expected = [
            sep.clone(),
            format!(
                "| Count | Avg Duration (ms) | {:<30} | Operation       | {:<50} |",
                "Namespace", "Suggested Index"
            ),
            sep.clone(),
            format!(
                "| 2     | 100.00            | {:<30} | find            | {:<50} |",
                "db.users", r#"{"age": 1}"#
            ),
            sep,
        ]
        .join("\n");
        assert_eq!(table, expected);
    }

    #[test]
    fn index_column_grows_with_longest_signature() {
        let long_sig = format!(r#"{{"{}": 1}}"#, "f".repeat(70));
        let table = render_table(&[row("db.a", "{}", 1, 1.0), row("db.a", &long_sig, 1, 0.5)]);

        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
        assert!(table.lines().nth(4).is_some_and(|l| l.contains(&long_sig)));
        assert_eq!(
            table.lines().next().map(|l| l.ends_with(&format!("+{}+", "-".repeat(long_sig.len() + 2)))),
            Some(true)
        );
    }

    #[test]
    fn averages_use_two_decimals() {
        let table = render_table(&[row("db.a", "{}", 3, 33.333333)]);
        assert!(table.contains("| 33.33             |"));
    }
}
