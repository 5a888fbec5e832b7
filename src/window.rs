//! Time window filter for `--last-minutes`.

use crate::log::LogRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

/// How a record relates to the configured window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowVerdict {
    Inside,
    /// Timestamp strictly earlier than the cutoff.
    TooOld,
    /// A window is active but the record's timestamp is absent or unparseable.
    NoTimestamp,
}

/// Inclusive lower bound on record timestamps; unbounded when no window is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    cutoff: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Window covering the last `minutes` before `now`, or everything when `None`.
    pub fn last_minutes(minutes: Option<u64>, now: DateTime<Utc>) -> Self {
        let Some(minutes) = minutes else {
            return Self::unbounded();
        };
        // Spans beyond chrono's range reach back to the earliest instant.
        let cutoff = i64::try_from(minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::since(cutoff)
    }

    pub fn since(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff: Some(cutoff),
        }
    }

    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    pub fn check(&self, record: &LogRecord) -> WindowVerdict {
        let Some(cutoff) = self.cutoff else {
            return WindowVerdict::Inside;
        };
        match record.timestamp().and_then(parse_timestamp) {
            None => WindowVerdict::NoTimestamp,
            Some(ts) if ts < cutoff => WindowVerdict::TooOld,
            Some(_) => WindowVerdict::Inside,
        }
    }
}

/// Parse an ISO-8601 instant. Text without a zone offset is taken as UTC.
///
/// Accepts `Z`, `+HH:MM` and `+HHMM` offsets, `T` or space between date and
/// time, optional fractional seconds, and bare dates (midnight).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }

    const ZONED: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
    for fmt in ZONED {
        if let Ok(ts) = DateTime::parse_from_str(text, fmt) {
            return Some(ts.with_timezone(&Utc));
        }
    }

    const NAIVE: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(ts.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn utc(text: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(text)
            .expect("bad test instant")
            .with_timezone(&Utc)
    }

    fn stamped(date: serde_json::Value) -> LogRecord {
        LogRecord {
            time: json!({ "$date": date }),
            attr: serde_json::Value::Null,
        }
    }

    #[test]
    fn parses_common_mongod_forms() {
        let expected = utc("2024-05-01T10:00:00.5Z");
        for text in [
            "2024-05-01T10:00:00.500Z",
            "2024-05-01T10:00:00.500+00:00",
            "2024-05-01T12:00:00.500+02:00",
            "2024-05-01T12:00:00.500+0200",
            "2024-05-01T10:00:00.500",
            "2024-05-01 10:00:00.500",
        ] {
            assert_eq!(parse_timestamp(text), Some(expected), "{text}");
        }
        assert_eq!(
            parse_timestamp("2024-05-01T10:00:00"),
            Some(utc("2024-05-01T10:00:00Z"))
        );
        assert_eq!(parse_timestamp("2024-05-01"), Some(utc("2024-05-01T00:00:00Z")));
    }

    #[test]
    fn rejects_garbage() {
        for text in ["", "yesterday", "2024-13-01T00:00:00Z", "1714557600"] {
            assert_eq!(parse_timestamp(text), None, "{text}");
        }
    }

    #[test]
    fn cutoff_is_inclusive() {
        let cutoff = utc("2024-05-01T10:00:00Z");
        let window = TimeWindow::since(cutoff);

        assert_eq!(
            window.check(&stamped(json!("2024-05-01T10:00:00.000Z"))),
            WindowVerdict::Inside
        );
        assert_eq!(
            window.check(&stamped(json!("2024-05-01T09:59:59.999999Z"))),
            WindowVerdict::TooOld
        );
        assert_eq!(
            window.check(&stamped(json!("2024-05-01T10:00:00.000001Z"))),
            WindowVerdict::Inside
        );
    }

    #[test]
    fn last_minutes_subtracts_from_now() {
        let now = utc("2024-05-01T10:30:00Z");
        assert_eq!(
            TimeWindow::last_minutes(Some(30), now).cutoff(),
            Some(utc("2024-05-01T10:00:00Z"))
        );
        assert_eq!(TimeWindow::last_minutes(None, now).cutoff(), None);
        assert_eq!(
            TimeWindow::last_minutes(Some(u64::MAX), now).cutoff(),
            Some(DateTime::<Utc>::MIN_UTC)
        );
    }

    #[test]
    fn missing_or_bad_timestamps_are_excluded_only_with_a_window() {
        let window = TimeWindow::since(utc("2024-05-01T10:00:00Z"));
        assert_eq!(window.check(&LogRecord::default()), WindowVerdict::NoTimestamp);
        assert_eq!(window.check(&stamped(json!("soon"))), WindowVerdict::NoTimestamp);
        assert_eq!(window.check(&stamped(json!(12))), WindowVerdict::NoTimestamp);

        let open = TimeWindow::unbounded();
        assert_eq!(open.check(&LogRecord::default()), WindowVerdict::Inside);
        assert_eq!(open.check(&stamped(json!("soon"))), WindowVerdict::Inside);
    }
}
