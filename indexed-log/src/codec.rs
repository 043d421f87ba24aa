//! Line-oriented record codec.
//!
//! Records travel as newline-delimited JSON: one object per line, encoded by
//! [`encode`] and decoded by [`decode`]. [`decode_window`] scans a mapped byte
//! window, tolerating the partial leading line an aligned mmap can produce
//! and any malformed lines in between.

use crate::error::Result;
use crate::model::Record;

/// Encodes a record as one JSON line, newline-terminated.
pub fn encode(record: &Record) -> Result<Vec<u8>> {
    let mut buf = serde_json::to_vec(record)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Decodes a single record line.
pub fn decode(line: &[u8]) -> Result<Record> {
    Ok(serde_json::from_slice(line)?)
}

/// Scans a byte window as newline-delimited records, keeping those with
/// `t_lo < timestamp < t_hi` (nanoseconds, strict bounds).
///
/// Lines that fail to decode are logged and skipped; a window mapped from a
/// page-aligned offset usually starts mid-record, so the first line is
/// expected to be garbage.
pub fn decode_window(bytes: &[u8], t_lo: i64, t_hi: i64) -> Vec<Record> {
    let mut records = Vec::new();

    for line in bytes.split(|b| *b == b'\n') {
        if line.is_empty() {
            continue;
        }
        match decode(line) {
            Ok(record) => {
                let ts = record.timestamp_nanos();
                if t_lo < ts && ts < t_hi {
                    records.push(record);
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, len = line.len(), "skipping undecodable line");
            }
        }
    }

    records
}
