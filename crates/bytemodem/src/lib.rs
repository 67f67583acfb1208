//! Buffered byte sinks, HTTP/1.1 chunked transfer framing, and a small
//! value-to-text streamer for RAM-scarce targets.
//!
//! Everything writes through the [`Sink`] capability: [`FixedBuffer`] puts
//! bytes into caller-owned storage with overflow accounting, [`ChunkEncoder`]
//! frames each buffer-full as one HTTP/1.1 chunk on a downstream sink, and
//! [`ValueStream`] renders heterogeneous values (numbers in configurable
//! bases, strings, user types) as text into any of them.
//!
//! ```
//! use bytemodem::{ChunkEncoder, Sink, ValueStream, VecSink, BASE_HEX};
//!
//! let mut body = VecSink::new();
//! let mut storage = [0u8; 32];
//! {
//!     let mut encoder = ChunkEncoder::new(&mut storage, &mut body);
//!     ValueStream::new(&mut encoder)
//!         .print("base=")
//!         .print(BASE_HEX)
//!         .print(42u8);
//! }
//! assert_eq!(body.as_bytes(), b"9\r\nbase=0x2A\r\n0\r\n\r\n");
//! ```

#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod chunk_encoder;
mod fixed_buffer;
mod render;
mod sink;
mod stream;

#[cfg(feature = "alloc")]
mod chunk_decoder;

#[cfg(feature = "alloc")]
pub use chunk_decoder::{decode_chunk_size, decode_chunked, decode_one_chunk, DecodeError};
pub use chunk_encoder::ChunkEncoder;
pub use fixed_buffer::{Discard, Drain, FixedBuffer};
#[cfg(feature = "alloc")]
pub use sink::VecSink;
pub use sink::{CountingSink, Sink};
pub use stream::{Insert, Manipulator, SetBase, ValueStream, BASE_DEC, BASE_HEX, BASE_TWO};
