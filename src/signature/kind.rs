//! Operation classification for a logged command document.
//!
//! The top-level key of a command names the operation (`{"find": "users", ...}`,
//! `{"update": "users", "updates": [...]}`). `find` is checked first, then the
//! remaining known kinds in a fixed priority order; the first match wins.

use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    Find,
    Aggregate,
    Count,
    Update,
    Delete,
    Insert,
    GetMore,
    Distinct,
    FindAndModify,
    /// First top-level key of a command we do not recognise.
    Other(String),
    /// Command document with no keys at all.
    Unclassifiable,
}

/// Non-find kinds in classification priority order.
const PRIORITY: [(&str, OperationKind); 8] = [
    ("aggregate", OperationKind::Aggregate),
    ("count", OperationKind::Count),
    ("update", OperationKind::Update),
    ("delete", OperationKind::Delete),
    ("insert", OperationKind::Insert),
    ("getMore", OperationKind::GetMore),
    ("distinct", OperationKind::Distinct),
    ("findAndModify", OperationKind::FindAndModify),
];

impl OperationKind {
    /// Classify by key presence only; the value under the key is irrelevant.
    pub fn classify(command: &Map<String, Value>) -> Self {
        if command.contains_key("find") {
            return OperationKind::Find;
        }

        for (name, kind) in &PRIORITY {
            if command.contains_key(*name) {
                return kind.clone();
            }
        }

        match command.keys().next() {
            Some(first) => OperationKind::Other(first.clone()),
            None => OperationKind::Unclassifiable,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OperationKind::Find => "find",
            OperationKind::Aggregate => "aggregate",
            OperationKind::Count => "count",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
            OperationKind::Insert => "insert",
            OperationKind::GetMore => "getMore",
            OperationKind::Distinct => "distinct",
            OperationKind::FindAndModify => "findAndModify",
            OperationKind::Other(name) => name,
            OperationKind::Unclassifiable => "unclassifiable",
        }
    }

    pub fn is_find(&self) -> bool {
        matches!(self, OperationKind::Find)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so table columns honour width/alignment flags.
        f.pad(self.as_str())
    }
}
