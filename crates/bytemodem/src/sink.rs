//! The byte-sink capability every writer in this crate targets.
//!
//! Sinks are deliberately non-panicking: writes report how many bytes were
//! accepted and failures latch a sticky error flag, because the embedded
//! targets this crate serves cannot afford unwinding.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "alloc")]
use bstr::{BStr, ByteSlice};

/// A destination that accepts written bytes.
///
/// All operations are byte-granular and best-effort: a write that cannot be
/// completed stores what it can, latches the implementation's sticky error
/// flag, and reports the shortfall through its return value. Once latched,
/// the flag stays set until explicitly cleared; later successful operations
/// do not clear it. Clearing is left to each implementation (for example
/// [`FixedBuffer::reset`](crate::FixedBuffer::reset)) because what happens to
/// buffered bytes on clear is implementation-specific.
pub trait Sink {
    /// Writes one byte, returning 1 if it was accepted and 0 if not.
    fn write_byte(&mut self, b: u8) -> usize;

    /// Writes as many leading bytes of `bytes` as possible, returning the
    /// count accepted. Stops at the first rejected byte.
    fn write_all(&mut self, bytes: &[u8]) -> usize {
        let mut count = 0;
        for &b in bytes {
            if self.write_byte(b) == 0 {
                break;
            }
            count += 1;
        }
        count
    }

    /// Writes the UTF-8 bytes of `s`.
    fn write_str(&mut self, s: &str) -> usize {
        self.write_all(s.as_bytes())
    }

    /// Whether any write has failed since the latch was last cleared.
    fn has_error(&self) -> bool;

    /// Room left for writing, or `None` when unbounded.
    fn available_for_write(&self) -> Option<usize> {
        None
    }

    /// Pushes any buffered bytes toward their destination, returning false
    /// if buffered data could not be moved. Unbuffered sinks always succeed.
    fn flush(&mut self) -> bool {
        true
    }
}

/// Discards bytes while counting them.
///
/// Useful for pre-computing the size of output (say, a `Content-Length`)
/// before producing it for real.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingSink {
    count: usize,
}

impl CountingSink {
    /// A counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes accepted so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Sink for CountingSink {
    fn write_byte(&mut self, _b: u8) -> usize {
        self.count += 1;
        1
    }

    fn write_all(&mut self, bytes: &[u8]) -> usize {
        self.count += bytes.len();
        bytes.len()
    }

    fn has_error(&self) -> bool {
        false
    }
}

/// A growable in-memory sink for host-side tests and tools. Never errors.
#[cfg(feature = "alloc")]
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    bytes: Vec<u8>,
}

#[cfg(feature = "alloc")]
impl VecSink {
    /// An empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The collected bytes as a printable byte string.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        self.bytes.as_bstr()
    }

    /// Consumes the sink, returning the collected bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Drops everything collected so far.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

#[cfg(feature = "alloc")]
impl Sink for VecSink {
    fn write_byte(&mut self, b: u8) -> usize {
        self.bytes.push(b);
        1
    }

    fn write_all(&mut self, bytes: &[u8]) -> usize {
        self.bytes.extend_from_slice(bytes);
        bytes.len()
    }

    fn has_error(&self) -> bool {
        false
    }
}
