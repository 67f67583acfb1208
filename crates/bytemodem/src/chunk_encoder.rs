//! Chunked Transfer-Encoding output (HTTP/1.1), so a body can be streamed
//! without pre-computing its size.
//!
//! Each time the internal buffer fills (or is flushed), its contents go out
//! as one chunk: the size in bare uppercase hex, CRLF, the bytes, CRLF.
//! Tearing the encoder down emits any pending bytes as a final non-empty
//! chunk followed by the `0\r\n\r\n` terminator.

use crate::fixed_buffer::{Drain, FixedBuffer};
use crate::render;
use crate::sink::Sink;

/// The per-chunk framing drain.
struct ChunkFramer<'out, S: Sink> {
    out: &'out mut S,
}

impl<S: Sink> Drain for ChunkFramer<'_, S> {
    fn drain(&mut self, data: &[u8]) -> bool {
        debug_assert!(!data.is_empty());
        // The size token is bare hex: no padding, no 0x.
        render::write_digits(self.out, data.len() as u64, 16);
        self.out.write_all(b"\r\n");
        self.out.write_all(data);
        self.out.write_all(b"\r\n");
        // Downstream failures are not surfaced here; callers observe the
        // sink's own error latch.
        true
    }
}

/// Buffers body bytes in caller-owned storage and emits each buffer-full as
/// one HTTP/1.1 chunk on a downstream sink.
///
/// Dropping the encoder ends the stream on every exit path: pending bytes go
/// out as a last non-empty chunk, then — unless the downstream sink has a
/// latched error — the terminator `0\r\n\r\n`. An encoder that was never
/// written to emits only the terminator. [`finish`] is the explicit form of
/// the same teardown.
///
/// [`finish`]: ChunkEncoder::finish
pub struct ChunkEncoder<'buf, 'out, S: Sink> {
    buffer: FixedBuffer<'buf, ChunkFramer<'out, S>>,
}

impl<'buf, 'out, S: Sink> ChunkEncoder<'buf, 'out, S> {
    /// Encodes through `storage`, writing chunks to `out`.
    ///
    /// `storage` bounds the size of ordinary chunks; explicit [`flush`]es
    /// cut chunks shorter.
    ///
    /// [`flush`]: Sink::flush
    pub fn new(storage: &'buf mut [u8], out: &'out mut S) -> Self {
        Self {
            buffer: FixedBuffer::with_drain(storage, ChunkFramer { out }),
        }
    }

    /// Ends the stream now: emits any pending chunk and the terminator.
    pub fn finish(self) {}
}

impl<S: Sink> Drop for ChunkEncoder<'_, '_, S> {
    fn drop(&mut self) {
        self.buffer.flush();
        debug_assert!(self.buffer.is_empty());
        let out = &mut *self.buffer.drain_mut().out;
        if !out.has_error() {
            out.write_all(b"0\r\n\r\n");
        }
    }
}

impl<S: Sink> Sink for ChunkEncoder<'_, '_, S> {
    fn write_byte(&mut self, b: u8) -> usize {
        self.buffer.write_byte(b)
    }

    fn write_all(&mut self, bytes: &[u8]) -> usize {
        self.buffer.write_all(bytes)
    }

    fn has_error(&self) -> bool {
        self.buffer.has_error()
    }

    fn available_for_write(&self) -> Option<usize> {
        self.buffer.available_for_write()
    }

    fn flush(&mut self) -> bool {
        self.buffer.flush()
    }
}
