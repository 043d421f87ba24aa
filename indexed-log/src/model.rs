//! Core data types for the indexed log.
//!
//! This module defines the record shape shared by producers and consumers.
//! The wire format is one JSON object per line; field names are capitalized
//! to stay byte-compatible with the external log shipper that feeds the
//! engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structured log record.
///
/// Records are the unit of data appended to a log file. The engine itself
/// never interprets record bytes on the write path; the timestamp is what
/// drives sync-point placement and query filtering.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use indexed_log::{FieldValue, Record};
///
/// let record = Record {
///     timestamp: Utc::now(),
///     tag: "app.web".to_string(),
///     key: FieldValue::from("status"),
///     value: FieldValue::Int(200),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// When the record was produced (UTC, RFC 3339 on the wire).
    pub timestamp: DateTime<Utc>,

    /// The producer-assigned stream tag.
    pub tag: String,

    /// The record key. Arbitrary shape; see [`FieldValue`].
    pub key: FieldValue,

    /// The record payload. Arbitrary shape; see [`FieldValue`].
    pub value: FieldValue,
}

impl Record {
    /// Returns the record timestamp as nanoseconds since the Unix epoch.
    ///
    /// Saturates at `i64::MAX` for instants beyond the representable range
    /// (year 2262).
    pub fn timestamp_nanos(&self) -> i64 {
        self.timestamp.timestamp_nanos_opt().unwrap_or(i64::MAX)
    }
}

/// A dynamically-typed record field.
///
/// Producers ship keys and values of arbitrary shape. Rather than an opaque
/// blob, fields are modeled as a JSON-equivalent variant so consumers can
/// inspect them; serde's untagged representation keeps the wire format plain
/// JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}
