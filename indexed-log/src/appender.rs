//! The producer-side append path.
//!
//! A [`LogAppender`] owns an engine plus the open log-file handle and byte
//! counter for its current fid. Records are encoded, written through the
//! counter, and whenever the bytes since the last sync point cross
//! `bytes_per_node` the appender inserts a node, flushes the sidecar, and
//! rotates proactively one slot before the index would overflow.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::codec;
use crate::config::LogFileOptions;
use crate::counter::CountingWriter;
use crate::engine::IndexedLogFile;
use crate::error::Result;
use crate::index::Node;
use crate::model::Record;
use crate::sidecar::NODES_PER_FILE;

/// A single-writer producer for one indexed log.
///
/// One appender at a time owns a given fid and performs all appends, flushes,
/// and rotations serially.
///
/// # Example
///
/// ```ignore
/// let mut appender = LogAppender::create(opts)?;
/// for record in batch {
///     appender.append(&record)?;
/// }
/// appender.checkpoint()?;
/// ```
pub struct LogAppender {
    engine: IndexedLogFile,
    writer: CountingWriter<File>,
}

impl LogAppender {
    /// Creates an appender with a fresh engine, creating `root` if needed.
    pub fn create(opts: LogFileOptions) -> Result<Self> {
        fs::create_dir_all(&opts.root)?;
        let engine = IndexedLogFile::new_index(opts);
        let file = open_log(&engine.log_path())?;
        Ok(Self {
            engine,
            writer: CountingWriter::new(file),
        })
    }

    /// Attaches an appender to an existing engine.
    ///
    /// The counter's base offset is the current length of the log file, so
    /// sync points keep landing on absolute positions.
    pub fn open(engine: IndexedLogFile) -> Result<Self> {
        fs::create_dir_all(&engine.opts().root)?;
        let file = open_log(&engine.log_path())?;
        let offset = file.metadata()?.len() as i64;
        Ok(Self {
            engine,
            writer: CountingWriter::with_offset(file, offset),
        })
    }

    /// The engine backing this appender.
    pub fn engine(&self) -> &IndexedLogFile {
        &self.engine
    }

    /// Appends one record to the log.
    ///
    /// When the write crosses the sync threshold, a node is inserted at the
    /// largest `bytes_per_node` multiple at or below the current position,
    /// with the record's timestamp and the overshoot as its length; the
    /// sidecar is flushed, and the engine rotates once the index reaches
    /// `NODES_PER_FILE - 1` nodes.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        let line = codec::encode(record)?;
        self.writer.write_all(&line)?;

        if self.writer.since_sync() > self.engine.opts().bytes_per_node {
            let position = self.writer.position();
            let sync_point = floor_to_multiple(position, self.engine.opts().bytes_per_node);

            self.engine.insert_node(Node::new(
                sync_point,
                (position - sync_point) as i32,
                record.timestamp_nanos(),
            ))?;
            self.writer.reset_sync();
            self.engine.flush()?;

            if self.engine.index().len() >= NODES_PER_FILE - 1 {
                self.engine.rotate();
                let file = open_log(&self.engine.log_path())?;
                self.writer = CountingWriter::new(file);
            }
        }

        Ok(())
    }

    /// Forces the current index out to the sidecar.
    ///
    /// Appends between sync points are only as durable as the log file; a
    /// producer shutting down calls this so the sidecar reflects every node
    /// inserted so far.
    pub fn checkpoint(&mut self) -> Result<()> {
        self.engine.flush()
    }
}

fn open_log(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().append(true).create(true).open(path)?)
}

/// The largest multiple of `m` at or below `n`.
fn floor_to_multiple(n: i64, m: i64) -> i64 {
    (n / m) * m
}
