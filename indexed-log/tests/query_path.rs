//! End-to-end tests for the produce → index → restore → query path.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use indexed_log::{
    query_range, read_serialized_index, FieldValue, IndexedLogFile, LogAppender, LogFileOptions,
    Record,
};

fn test_opts(dir: &TempDir) -> LogFileOptions {
    LogFileOptions {
        root: dir.path().to_path_buf(),
        bytes_per_node: 512,
        tree_depth: 2,
    }
}

fn record_at(secs: i64, n: i64) -> Record {
    Record {
        timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        tag: "e2e.test".to_string(),
        key: FieldValue::from("seq"),
        value: FieldValue::Int(n),
    }
}

fn ns(secs: i64) -> i64 {
    secs * 1_000_000_000
}

#[test]
fn should_answer_range_query_from_sealed_sidecar() {
    // given - a producer streams 500 records at 1-second spacing
    let dir = TempDir::new().unwrap();
    let opts = test_opts(&dir);
    let mut appender = LogAppender::create(opts.clone()).unwrap();
    for i in 0..500 {
        appender.append(&record_at(10_000 + i, i)).unwrap();
    }
    appender.checkpoint().unwrap();

    // when - a consumer queries a window in the middle
    let hits = query_range(&opts, ns(10_100), ns(10_200)).unwrap();

    // then - exactly the strictly-interior records come back, in order
    assert_eq!(hits.len(), 99);
    assert_eq!(hits.first().unwrap().timestamp.timestamp(), 10_101);
    assert_eq!(hits.last().unwrap().timestamp.timestamp(), 10_199);
    for pair in hits.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[test]
fn should_preserve_record_contents_through_the_full_path() {
    // given
    let dir = TempDir::new().unwrap();
    let opts = test_opts(&dir);
    let mut appender = LogAppender::create(opts.clone()).unwrap();
    for i in 0..200 {
        appender.append(&record_at(20_000 + i, i)).unwrap();
    }
    appender.checkpoint().unwrap();

    // when
    let hits = query_range(&opts, ns(20_049), ns(20_051)).unwrap();

    // then - the record at t=20050 survives byte-for-byte
    assert_eq!(hits.len(), 1);
    let hit = &hits[0];
    assert_eq!(hit.tag, "e2e.test");
    assert_eq!(hit.key, FieldValue::from("seq"));
    assert_eq!(hit.value, FieldValue::Int(50));
}

#[test]
fn should_restore_engine_and_resolve_same_bounds() {
    // given - a sealed sidecar
    let dir = TempDir::new().unwrap();
    let opts = test_opts(&dir);
    let mut appender = LogAppender::create(opts.clone()).unwrap();
    for i in 0..300 {
        appender.append(&record_at(30_000 + i, i)).unwrap();
    }
    appender.checkpoint().unwrap();
    let fid = appender.engine().fid();
    let live_lo = appender.engine().first_lte_head(ns(30_100));
    let live_hi = appender.engine().first_gte_tail(ns(30_200));
    drop(appender);

    // when - another process restores the engine from disk
    let restored = IndexedLogFile::new_index_from_file(fid, opts).unwrap();

    // then - identical bound resolution
    assert_eq!(restored.first_lte_head(ns(30_100)), live_lo);
    assert_eq!(restored.first_gte_tail(ns(30_200)), live_hi);
    assert_eq!(restored.nodes_flushed(), restored.index().len());
}

#[test]
fn should_cover_every_committed_record_in_window() {
    // given - sync points every ~512 bytes over 1000 records
    let dir = TempDir::new().unwrap();
    let opts = test_opts(&dir);
    let mut appender = LogAppender::create(opts.clone()).unwrap();
    for i in 0..1000 {
        appender.append(&record_at(40_000 + i, i)).unwrap();
    }
    appender.checkpoint().unwrap();

    // when - query several windows well inside the indexed range
    for (lo, hi) in [(40_010, 40_020), (40_400, 40_500), (40_700, 40_950)] {
        let hits = query_range(&opts, ns(lo), ns(hi)).unwrap();

        // then - every record strictly inside the bounds is present once
        let expected: Vec<i64> = (lo + 1..hi).collect();
        let got: Vec<i64> = hits.iter().map(|r| r.timestamp.timestamp()).collect();
        assert_eq!(got, expected, "window ({lo}, {hi})");
    }
}

#[test]
fn should_read_sidecar_with_standalone_reader() {
    // given
    let dir = TempDir::new().unwrap();
    let opts = test_opts(&dir);
    let mut appender = LogAppender::create(opts.clone()).unwrap();
    for i in 0..100 {
        appender.append(&record_at(50_000 + i, i)).unwrap();
    }
    appender.checkpoint().unwrap();
    let fid = appender.engine().fid();

    // when
    let image = read_serialized_index(&dir.path().join(format!("{fid}.idx"))).unwrap();

    // then - fid round-trips and nodes are in ascending timestamp order
    assert_eq!(image.fid(), fid);
    assert!(!image.nodes().is_empty());
    for pair in image.nodes().windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }
}
