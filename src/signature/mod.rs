//! Signature layer: turns a logged command into a stable grouping key.
//!
//! Kept free of I/O:
//! - operation classification (`kind`)
//! - structure normalization (`normalize`)
//! - suggested-index / shape extraction (`extract`)
//! - the JSON text form signatures are written in (`json`)

pub mod extract;
pub mod json;
pub mod kind;
pub mod normalize;

pub use extract::extract_signature;
pub use kind::OperationKind;
