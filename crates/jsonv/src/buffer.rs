//! Compacting byte buffer behind the scanner.
//!
//! Layout: `data[..start]` is consumed, `data[start..end]` is unread input and
//! `data[end..]` is free space for the next read. `data.len()` is the
//! capacity; the vector is always fully initialised so reads can write into
//! the tail directly.
//!
//! Before each read the buffer makes room for one full chunk: if the free tail
//! is too small it first tries sliding the unread bytes to the front, and only
//! grows (to `2 * capacity + chunk`) when compaction would not free a chunk.

use std::io::{self, ErrorKind, Read};

use log::trace;

#[derive(Debug)]
pub(crate) struct ByteBuffer {
    data: Vec<u8>,
    start: usize,
    end: usize,
}

impl ByteBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            start: 0,
            end: 0,
        }
    }

    /// Bytes read from the source but not consumed yet.
    #[inline]
    pub fn unread(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Consumes `n` unread bytes and returns them. The slice stays valid until
    /// the next mutation of the buffer.
    #[inline]
    pub fn take(&mut self, n: usize) -> &[u8] {
        debug_assert!(n <= self.len());
        let from = self.start;
        self.start += n;
        &self.data[from..self.start]
    }

    #[inline]
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.len());
        self.start += n;
    }

    fn reserve_chunk(&mut self, chunk: usize) {
        if self.data.len() - self.end >= chunk {
            return;
        }
        let unread = self.len();
        if self.data.len() - unread >= chunk {
            self.data.copy_within(self.start..self.end, 0);
            trace!("compacted buffer, {unread} unread bytes moved to front");
        } else {
            let capacity = 2 * self.data.len() + chunk;
            let mut grown = vec![0; capacity];
            grown[..unread].copy_from_slice(self.unread());
            self.data = grown;
            trace!("grew buffer to {capacity} bytes");
        }
        self.start = 0;
        self.end = unread;
    }

    /// Reads once from `reader` into the free tail, after making room for at
    /// least `chunk` bytes. Returns the number of bytes read; `Ok(0)` means the
    /// reader is exhausted. Interrupted reads are retried.
    pub fn fill_from(&mut self, reader: &mut dyn Read, chunk: usize) -> io::Result<usize> {
        self.reserve_chunk(chunk.max(1));
        loop {
            match reader.read(&mut self.data[self.end..]) {
                Ok(n) => {
                    self.end += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Yields its input in fixed-size pieces.
    struct Chunked<'a>(&'a [u8], usize);

    impl Read for Chunked<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.0.len().min(self.1).min(buf.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn compacts_before_growing() {
        let mut buf = ByteBuffer::with_capacity(8);
        let mut src = Chunked(b"abcdefghijkl", 6);
        assert_eq!(buf.fill_from(&mut src, 4).unwrap(), 6);
        assert_eq!(buf.take(5), b"abcde");
        // 2 free bytes at the tail, 7 once compacted: no growth needed.
        assert_eq!(buf.fill_from(&mut src, 4).unwrap(), 6);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.unread(), b"fghijkl");
    }

    #[test]
    fn grows_when_compaction_is_not_enough() {
        let mut buf = ByteBuffer::with_capacity(4);
        let mut src = Chunked(b"0123456789", 4);
        buf.fill_from(&mut src, 4).unwrap();
        buf.consume(1);
        buf.fill_from(&mut src, 4).unwrap();
        assert_eq!(buf.capacity(), 12);
        assert_eq!(buf.unread(), b"1234567");
    }

    #[test]
    fn retries_interrupted_reads() {
        struct Flaky(bool);
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if std::mem::replace(&mut self.0, true) {
                    buf[0] = b'x';
                    Ok(1)
                } else {
                    Err(io::Error::from(ErrorKind::Interrupted))
                }
            }
        }
        let mut buf = ByteBuffer::with_capacity(4);
        assert_eq!(buf.fill_from(&mut Flaky(false), 4).unwrap(), 1);
        assert_eq!(buf.unread(), b"x");
    }
}
