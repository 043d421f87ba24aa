//! Time-range queries across sealed sidecars.
//!
//! A query fans out one worker per candidate sidecar. Each worker restores
//! the index, resolves the byte window for the requested range, maps it, and
//! filters the decoded records to exact bounds. Workers push their hits into
//! a shared buffer under a mutex; sidecars that cannot be read are logged and
//! skipped so one bad file never sinks the whole query.

use std::sync::Mutex;
use std::thread;

use uuid::Uuid;

use crate::codec;
use crate::config::LogFileOptions;
use crate::error::Result;
use crate::listing::list_sidecars;
use crate::model::Record;
use crate::sidecar::read_serialized_index;

/// Returns every committed record with timestamp strictly inside
/// `(t_lo, t_hi)` nanoseconds, across all sidecars under `opts.root`.
///
/// An inverted range (`t_lo > t_hi`) is not an error; it resolves to an
/// empty result. Results are sorted by timestamp.
///
/// Per-sidecar read, decode, and map failures are logged and skipped
/// (partial-result semantics); only a failure to enumerate `root` itself is
/// surfaced.
pub fn query_range(opts: &LogFileOptions, t_lo: i64, t_hi: i64) -> Result<Vec<Record>> {
    if t_lo > t_hi {
        return Ok(Vec::new());
    }

    let fids = list_sidecars(&opts.root)?;
    let results = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for &fid in &fids {
            let results = &results;
            scope.spawn(move || match query_sidecar(opts, fid, t_lo, t_hi) {
                Ok(mut records) => results.lock().unwrap().append(&mut records),
                Err(err) => {
                    tracing::warn!(fid = %fid, error = %err, "skipping unreadable sidecar");
                }
            });
        }
    });

    let mut records = results.into_inner().unwrap();
    records.sort_by_key(Record::timestamp_nanos);
    Ok(records)
}

/// Runs the range query against a single sidecar.
fn query_sidecar(opts: &LogFileOptions, fid: Uuid, t_lo: i64, t_hi: i64) -> Result<Vec<Record>> {
    let image = read_serialized_index(&opts.root.join(format!("{fid}.idx")))?;
    let engine = image.deserialize(opts.clone());

    let off_lo = engine.first_lte_head(t_lo);
    let off_hi = engine.first_gte_tail(t_hi);
    let window = engine.open_between_positions(off_lo, off_hi)?;

    Ok(codec::decode_window(window.as_bytes(), t_lo, t_hi))
}
