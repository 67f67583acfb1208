//! Writing into a caller-owned, fixed-size byte buffer, with an optional
//! drain that empties the buffer as it fills.
//!
//! [`FixedBuffer`] is the backpressure point of the crate. Writes land in the
//! borrowed storage; whenever a write fills it exactly, the buffer offers its
//! contents to the [`Drain`]. A drain that accepts gives the next bytes of
//! the same logical write room to land, so a stream longer than the buffer
//! flushes repeatedly instead of overflowing. A drain that refuses leaves the
//! bytes in place for a later retry; only a byte that can neither be stored
//! nor made room for latches the sticky error.

use log::trace;

use crate::sink::Sink;

/// Receives the buffered bytes when a [`FixedBuffer`] empties itself.
///
/// Returning `true` means the entire span was taken and the buffer may be
/// reset; `false` means none of it was. There is no partial hand-off.
pub trait Drain {
    /// Accepts `data` wholesale, or refuses it.
    fn drain(&mut self, data: &[u8]) -> bool;
}

/// The default drain: refuses everything, so writes beyond the capacity are
/// lost and recorded through the error latch.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Drain for Discard {
    fn drain(&mut self, _data: &[u8]) -> bool {
        false
    }
}

/// A fixed-capacity byte sink over caller-owned storage.
///
/// The storage is borrowed, never allocated, and must outlive the buffer.
/// `bytes_written` counts every byte attempted since the last [`reset`];
/// bytes beyond the capacity are counted but not stored, so a value larger
/// than [`capacity`] doubles as an overflow report. The first
/// `min(bytes_written, capacity)` bytes of storage are always exactly the
/// bytes that were accepted.
///
/// [`reset`]: FixedBuffer::reset
/// [`capacity`]: FixedBuffer::capacity
pub struct FixedBuffer<'buf, D: Drain = Discard> {
    storage: &'buf mut [u8],
    written: usize,
    error: bool,
    drain: D,
}

impl<'buf> FixedBuffer<'buf> {
    /// A buffer with no drain; once full, further writes overflow.
    pub fn new(storage: &'buf mut [u8]) -> Self {
        Self::with_drain(storage, Discard)
    }
}

impl<'buf, D: Drain> FixedBuffer<'buf, D> {
    /// A buffer that offers its contents to `drain` whenever it fills.
    pub fn with_drain(storage: &'buf mut [u8], drain: D) -> Self {
        Self {
            storage,
            written: 0,
            error: false,
            drain,
        }
    }

    /// Size of the borrowed storage.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes attempted since the last reset; exceeds [`capacity`] after an
    /// overflow.
    ///
    /// [`capacity`]: FixedBuffer::capacity
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Bytes currently resident: `min(bytes_written, capacity)`.
    #[must_use]
    pub fn data_size(&self) -> usize {
        self.written.min(self.capacity())
    }

    /// True when nothing has been written since the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// The valid prefix of the storage.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.storage[..self.data_size()]
    }

    /// Forgets all buffered data and clears the error latch, making the
    /// buffer fully reusable. A past overflow is observable only until this
    /// is called.
    pub fn reset(&mut self) {
        self.written = 0;
        self.error = false;
    }

    /// The drain, e.g. to reach a sink wrapped inside it.
    pub fn drain_mut(&mut self) -> &mut D {
        &mut self.drain
    }

    /// Offers the buffered bytes to the drain.
    ///
    /// An empty buffer succeeds without a drain call; a buffer with the
    /// error latched refuses outright (its contents are not a faithful
    /// record of what was written); a refused drain leaves everything intact
    /// so the call can be retried. Returns true when the buffer is empty on
    /// exit.
    pub fn flush(&mut self) -> bool {
        if self.error {
            return false;
        }
        self.try_drain()
    }

    fn try_drain(&mut self) -> bool {
        debug_assert!(self.written <= self.capacity());
        if self.written == 0 {
            return true;
        }
        if self.drain.drain(&self.storage[..self.written]) {
            self.written = 0;
            return true;
        }
        false
    }

    fn store(&mut self, b: u8) {
        self.storage[self.written] = b;
        self.written += 1;
        if self.written == self.capacity() {
            // Fill boundary: hand the contents off eagerly so the next byte
            // has room. A refusal is not an error; the bytes stay put.
            let _ = self.try_drain();
        }
    }
}

impl<D: Drain> Sink for FixedBuffer<'_, D> {
    fn write_byte(&mut self, b: u8) -> usize {
        if !self.error {
            if self.written < self.capacity() {
                self.store(b);
                return 1;
            }
            // Full: a drain retry may still make room.
            if self.capacity() > 0 && self.try_drain() {
                self.store(b);
                return 1;
            }
        }
        self.error = true;
        self.written += 1;
        0
    }

    fn write_all(&mut self, bytes: &[u8]) -> usize {
        if bytes.is_empty() {
            return 0;
        }
        let room = self.capacity() - self.data_size();
        if !self.error && room >= bytes.len() {
            let start = self.written;
            self.storage[start..start + bytes.len()].copy_from_slice(bytes);
            self.written += bytes.len();
            if self.written == self.capacity() {
                let _ = self.try_drain();
            }
            return bytes.len();
        }
        trace!("byte-wise write of {} bytes, room {}", bytes.len(), room);
        let mut count = 0;
        for &b in bytes {
            count += self.write_byte(b);
        }
        count
    }

    fn has_error(&self) -> bool {
        self.error
    }

    fn available_for_write(&self) -> Option<usize> {
        if self.error {
            return Some(0);
        }
        Some(self.capacity() - self.data_size())
    }

    fn flush(&mut self) -> bool {
        FixedBuffer::flush(self)
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use alloc::vec::Vec;

    use super::{Drain, FixedBuffer};
    use crate::sink::Sink;

    #[derive(Default)]
    struct Recording {
        accept: bool,
        chunks: Vec<Vec<u8>>,
        refusals: usize,
    }

    impl Drain for &mut Recording {
        fn drain(&mut self, data: &[u8]) -> bool {
            if self.accept {
                self.chunks.push(data.to_vec());
                true
            } else {
                self.refusals += 1;
                false
            }
        }
    }

    #[test]
    fn collects_writes_in_order() {
        let mut storage = [0u8; 16];
        let mut buf = FixedBuffer::new(&mut storage);
        assert_eq!(buf.write_all(b"abc"), 3);
        assert_eq!(buf.write_byte(b'd'), 1);
        assert_eq!(buf.write_str("ef"), 2);
        assert_eq!(buf.data(), b"abcdef");
        assert_eq!(buf.data_size(), 6);
        assert_eq!(buf.bytes_written(), 6);
        assert!(!buf.has_error());
        assert_eq!(buf.available_for_write(), Some(10));
    }

    #[test]
    fn exact_fill_is_not_an_error() {
        let mut storage = [0u8; 4];
        let mut buf = FixedBuffer::new(&mut storage);
        assert_eq!(buf.write_all(b"wxyz"), 4);
        assert!(!buf.has_error());
        assert_eq!(buf.data(), b"wxyz");
        assert_eq!(buf.available_for_write(), Some(0));
    }

    #[test]
    fn overflow_latches_error_and_keeps_prefix() {
        let mut storage = [0u8; 4];
        let mut buf = FixedBuffer::new(&mut storage);
        for &b in b"abcd" {
            assert_eq!(buf.write_byte(b), 1);
        }
        assert_eq!(buf.write_byte(b'e'), 0);
        assert!(buf.has_error());
        assert_eq!(buf.bytes_written(), 5);
        assert_eq!(buf.data_size(), 4);
        assert_eq!(buf.data(), b"abcd");
    }

    #[test]
    fn overflow_then_reset_is_reusable() {
        // Pins the reset policy: reset clears the position AND the error
        // latch, so a past overflow is observable only until reset.
        let mut storage = [0u8; 4];
        let mut buf = FixedBuffer::new(&mut storage);
        buf.write_all(b"abcdef");
        assert!(buf.has_error());
        assert_eq!(buf.bytes_written(), 6);

        buf.reset();
        assert!(!buf.has_error());
        assert_eq!(buf.bytes_written(), 0);
        assert_eq!(buf.data(), b"");

        assert_eq!(buf.write_all(b"wxyz"), 4);
        assert!(!buf.has_error());
        assert_eq!(buf.data(), b"wxyz");
    }

    #[test]
    fn spilled_write_reports_stored_count_and_attempts() {
        let mut storage = [0u8; 4];
        let mut buf = FixedBuffer::new(&mut storage);
        assert_eq!(buf.write_all(b"abcdef"), 4);
        assert!(buf.has_error());
        // Four stored plus two attempts past the end.
        assert_eq!(buf.bytes_written(), 6);
        assert_eq!(buf.data(), b"abcd");
        // Later writes keep counting attempts without storing.
        assert_eq!(buf.write_byte(b'g'), 0);
        assert_eq!(buf.bytes_written(), 7);
        assert_eq!(buf.data(), b"abcd");
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut storage = [0u8; 0];
        let mut buf = FixedBuffer::new(&mut storage);
        assert_eq!(buf.write_byte(b'a'), 0);
        assert!(buf.has_error());
        assert_eq!(buf.data_size(), 0);
    }

    #[test]
    fn drain_runs_at_the_fill_boundary() {
        let mut rec = Recording {
            accept: true,
            ..Recording::default()
        };
        let mut storage = [0u8; 4];
        let mut buf = FixedBuffer::with_drain(&mut storage, &mut rec);
        assert_eq!(buf.write_all(b"abcdef"), 6);
        assert!(!buf.has_error());
        assert_eq!(buf.data(), b"ef");
        drop(buf);
        assert_eq!(rec.chunks, [b"abcd".to_vec()]);
    }

    #[test]
    fn bulk_exact_fill_drains() {
        let mut rec = Recording {
            accept: true,
            ..Recording::default()
        };
        let mut storage = [0u8; 4];
        let mut buf = FixedBuffer::with_drain(&mut storage, &mut rec);
        assert_eq!(buf.write_all(b"abcd"), 4);
        assert!(buf.is_empty());
        drop(buf);
        assert_eq!(rec.chunks, [b"abcd".to_vec()]);
    }

    #[test]
    fn refused_drain_keeps_data_for_retry() {
        let mut rec = Recording::default();
        let mut storage = [0u8; 4];
        let mut buf = FixedBuffer::with_drain(&mut storage, &mut rec);
        buf.write_all(b"abcd");
        assert!(!buf.has_error());
        assert_eq!(buf.data(), b"abcd");
        assert!(!buf.flush());

        // The drain recovers; the retried flush hands off the same bytes.
        buf.drain_mut().accept = true;
        assert!(buf.flush());
        assert!(buf.is_empty());
        drop(buf);
        assert!(rec.refusals >= 1);
        assert_eq!(rec.chunks, [b"abcd".to_vec()]);
    }

    #[test]
    fn flush_is_idempotent() {
        let mut rec = Recording {
            accept: true,
            ..Recording::default()
        };
        let mut storage = [0u8; 8];
        let mut buf = FixedBuffer::with_drain(&mut storage, &mut rec);
        buf.write_all(b"ab");
        assert!(buf.flush());
        assert!(buf.flush());
        assert!(buf.flush());
        drop(buf);
        assert_eq!(rec.chunks, [b"ab".to_vec()]);
    }

    #[test]
    fn errored_buffer_refuses_to_flush() {
        let mut rec = Recording::default();
        let mut storage = [0u8; 2];
        let mut buf = FixedBuffer::with_drain(&mut storage, &mut rec);
        buf.write_all(b"abc");
        assert!(buf.has_error());
        // Recovery of the drain does not matter: the contents are not a
        // faithful record of the write stream.
        buf.drain_mut().accept = true;
        assert!(!buf.flush());
        drop(buf);
        assert_eq!(rec.chunks, Vec::<Vec<u8>>::new());
    }
}
