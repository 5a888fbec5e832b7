use serde::Deserialize;
use serde::de::Error as _;
use serde_json::Value;

/// One decoded line of the mongod structured log.
///
/// Only the envelope is typed; `attr` stays a raw value because its command
/// document is arbitrarily nested and its fields vary by operation.
///
/// Example:
/// {"t":{"$date":"2024-05-01T10:00:00.123+00:00"},"c":"COMMAND","msg":"Slow query",
///  "attr":{"ns":"db.users","durationMillis":120,"command":{"find":"users","filter":{...}}}}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogRecord {
    #[serde(default, rename = "t")]
    pub time: Value,

    #[serde(default)]
    pub attr: Value,
}

impl LogRecord {
    /// Decode one raw line. Anything other than a JSON object is an error.
    pub fn from_slice(line: &[u8]) -> serde_json::Result<Self> {
        // Go through Value first: derived struct impls also accept arrays.
        match serde_json::from_slice(line)? {
            object @ Value::Object(_) => serde_json::from_value(object),
            _ => Err(serde_json::Error::custom("log line is not a JSON object")),
        }
    }

    /// The `t.$date` text, when present and a string.
    pub fn timestamp(&self) -> Option<&str> {
        self.time.get("$date").and_then(Value::as_str)
    }
}
