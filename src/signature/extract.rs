//! Signature extraction: one log record in, one grouping key out.
//!
//! `find` commands are keyed by a suggested index built from their filter and
//! sort fields. Every other kind is keyed by the normalized shape of an
//! operation-specific detail document, so literal argument values never split
//! a query shape into separate rows.

use crate::log::LogRecord;
use crate::model::SignatureKey;
use crate::signature::json::to_signature_string;
use crate::signature::kind::OperationKind;
use crate::signature::normalize::{PLACEHOLDER, normalize};

use serde_json::{Map, Value, json};

pub const UNKNOWN_NAMESPACE: &str = "unknown_namespace";

/// Sentinel suggested index for a find with neither filter nor sort fields.
pub const NO_INDEX_FIELDS_NOTE: &str = "no_specific_fields_in_filter_or_sort";

/// A record reduced to its grouping key plus the latency to accumulate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub key: SignatureKey,
    pub duration_ms: u64,
}

/// Extract the signature of a slow-operation record.
///
/// Returns `None` when the record has no usable `durationMillis` or when any
/// field it needs has an unexpected type. Never fails otherwise.
pub fn extract_signature(record: &LogRecord) -> Option<Signature> {
    // No attr means no duration either.
    let attr = record.attr.as_object()?;

    let namespace = match attr.get("ns") {
        None | Some(Value::Null) => UNKNOWN_NAMESPACE.to_string(),
        Some(Value::String(ns)) => ns.clone(),
        Some(_) => return None,
    };

    let duration_ms = duration_millis(attr.get("durationMillis")?)?;

    let empty = Map::new();
    let command = match attr.get("command") {
        None => &empty,
        Some(Value::Object(command)) => command,
        Some(_) => return None,
    };

    let kind = OperationKind::classify(command);
    let signature = match &kind {
        OperationKind::Find => to_signature_string(&Value::Object(suggested_index(command))),
        other => to_signature_string(&normalize(&operation_detail(other, command)?)),
    }
    .ok()?;

    Some(Signature {
        key: SignatureKey {
            namespace,
            kind,
            signature,
        },
        duration_ms,
    })
}

/// Candidate index key order for a find command.
///
/// Filter fields come first (sorted, always ascending). Sort fields not
/// already present follow (sorted), descending only when the sort value reads
/// as `-1`. A filter field that also appears in the sort keeps its ascending
/// weight.
pub fn suggested_index(command: &Map<String, Value>) -> Map<String, Value> {
    let mut index = Map::new();

    // `filter` shadows `query` whenever the key exists, whatever its value.
    let filter = command.get("filter").or_else(|| command.get("query"));
    if let Some(Value::Object(filter)) = filter {
        for key in sorted_keys(filter) {
            index.insert(key.clone(), Value::from(1));
        }
    }

    if let Some(Value::Object(sort)) = command.get("sort") {
        for key in sorted_keys(sort) {
            if index.contains_key(key) {
                continue;
            }
            let direction = if sort.get(key).is_some_and(is_descending) {
                -1
            } else {
                1
            };
            index.insert(key.clone(), Value::from(direction));
        }
    }

    if index.is_empty() {
        index.insert("note".to_string(), Value::from(NO_INDEX_FIELDS_NOTE));
    }
    index
}

/// Detail document whose shape identifies a non-find operation.
///
/// `None` for find (keyed by [`suggested_index`] instead) and for documents
/// too malformed to describe.
fn operation_detail(kind: &OperationKind, command: &Map<String, Value>) -> Option<Value> {
    let field_or = |name: &str, default: Value| command.get(name).cloned().unwrap_or(default);

    let detail = match kind {
        OperationKind::Find => return None,
        OperationKind::Aggregate => match command.get("pipeline") {
            Some(Value::Array(stages)) => Value::Array(stages.clone()),
            _ => Value::Array(Vec::new()),
        },
        OperationKind::Count => field_or("query", empty_document()),
        OperationKind::Update => first_statement_query(command, "updates"),
        OperationKind::Delete => first_statement_query(command, "deletes"),
        OperationKind::Insert => {
            let docs_count = document_count(command.get("documents"))?;
            json!({ "docs_count": docs_count })
        }
        OperationKind::GetMore => json!({ "cursorId": PLACEHOLDER, "collection": PLACEHOLDER }),
        OperationKind::Distinct => json!({
            "key": field_or("key", Value::from(PLACEHOLDER)),
            "query": field_or("query", empty_document()),
        }),
        // new/remove are per-call flags, not part of the shape.
        OperationKind::FindAndModify => json!({
            "query": field_or("query", empty_document()),
            "sort": field_or("sort", empty_document()),
            "update": field_or("update", empty_document()),
            "new": PLACEHOLDER,
            "remove": PLACEHOLDER,
        }),
        OperationKind::Other(_) | OperationKind::Unclassifiable => Value::Object(command.clone()),
    };
    Some(detail)
}

/// `q` of the first statement of a batched write, else the command's own `q`.
fn first_statement_query(command: &Map<String, Value>, statements: &str) -> Value {
    let first = match command.get(statements) {
        Some(Value::Array(items)) => items.first().and_then(Value::as_object),
        _ => None,
    };
    first
        .unwrap_or(command)
        .get("q")
        .cloned()
        .unwrap_or_else(empty_document)
}

fn document_count(documents: Option<&Value>) -> Option<usize> {
    match documents {
        None => Some(0),
        Some(Value::Array(items)) => Some(items.len()),
        Some(Value::Object(map)) => Some(map.len()),
        Some(Value::String(s)) => Some(s.chars().count()),
        Some(_) => None,
    }
}

/// Non-negative integer milliseconds; floats truncate toward zero.
fn duration_millis(value: &Value) -> Option<u64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .map(|ms| ms.trunc() as u64)
    })
}

fn is_descending(direction: &Value) -> bool {
    match direction {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i == -1,
            None => n.as_f64().is_some_and(|f| f.trunc() == -1.0),
        },
        Value::String(s) => s.trim().parse::<i64>().is_ok_and(|i| i == -1),
        _ => false,
    }
}

fn sorted_keys(map: &Map<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}

fn empty_document() -> Value {
    Value::Object(Map::new())
}
