//! Byte-counting writer.

use std::io::{self, Write};

/// A write-through wrapper that tracks how many bytes have passed to the
/// underlying sink.
///
/// Three counters are maintained: the base `offset` the writer was attached
/// at (non-zero when appending to an existing log), the bytes written this
/// session, and the bytes written since the last sync point. The producer
/// resets the sync counter each time it records a [`Node`](crate::Node).
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    offset: i64,
    bytes_written: i64,
    since_sync: i64,
}

impl<W: Write> CountingWriter<W> {
    /// Wraps a sink starting at offset zero.
    pub fn new(inner: W) -> Self {
        Self::with_offset(inner, 0)
    }

    /// Wraps a sink positioned at `offset` bytes into the file.
    pub fn with_offset(inner: W, offset: i64) -> Self {
        Self {
            inner,
            offset,
            bytes_written: 0,
            since_sync: 0,
        }
    }

    /// Absolute position in the file: base offset plus session bytes.
    pub fn position(&self) -> i64 {
        self.offset + self.bytes_written
    }

    /// Bytes written through this wrapper.
    pub fn bytes_written(&self) -> i64 {
        self.bytes_written
    }

    /// Bytes written since the last sync point.
    pub fn since_sync(&self) -> i64 {
        self.since_sync
    }

    /// Marks the current position as a sync point.
    pub fn reset_sync(&mut self) {
        self.since_sync = 0;
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consumes the wrapper, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes_written += n as i64;
        self.since_sync += n as i64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_track_bytes_written() {
        // given
        let mut writer = CountingWriter::new(Vec::new());

        // when
        writer.write_all(b"hello ").unwrap();
        writer.write_all(b"world\n").unwrap();

        // then
        assert_eq!(writer.bytes_written(), 12);
        assert_eq!(writer.since_sync(), 12);
        assert_eq!(writer.position(), 12);
        assert_eq!(writer.get_ref().as_slice(), b"hello world\n");
    }

    #[test]
    fn should_offset_position_when_attached_mid_file() {
        // given
        let mut writer = CountingWriter::with_offset(Vec::new(), 4096);

        // when
        writer.write_all(b"entry\n").unwrap();

        // then
        assert_eq!(writer.position(), 4102);
        assert_eq!(writer.bytes_written(), 6);
    }

    #[test]
    fn should_reset_only_the_sync_counter() {
        // given
        let mut writer = CountingWriter::new(Vec::new());
        writer.write_all(b"0123456789").unwrap();

        // when
        writer.reset_sync();
        writer.write_all(b"ab").unwrap();

        // then
        assert_eq!(writer.since_sync(), 2);
        assert_eq!(writer.bytes_written(), 12);
    }
}
