//! Streaming values as text into any [`Sink`].
//!
//! [`ValueStream`] turns a chain of heterogeneous values into bytes:
//!
//! ```
//! use bytemodem::{ValueStream, VecSink, BASE_HEX};
//!
//! let mut out = VecSink::new();
//! ValueStream::new(&mut out)
//!     .print("at ")
//!     .print(BASE_HEX)
//!     .print(123)
//!     .print(' ')
//!     .print(-1i8);
//! assert_eq!(out.as_bytes(), b"at 0x7B -0x1");
//! ```
//!
//! The stream itself never fails: every write is best-effort, and all
//! failure surfaces through the sink's sticky error latch, which the stream
//! deliberately does not consult.

use crate::render;
use crate::sink::Sink;

/// A value that can be inserted into a [`ValueStream`].
///
/// Every primitive the crate understands has an implementation; user types
/// implement it to become streamable. An implementation that wants its own
/// numeric base without disturbing the caller's should do its work through
/// [`ValueStream::substream`].
pub trait Insert {
    /// Renders `self` into the stream.
    fn insert_into(&self, strm: &mut ValueStream<'_>);
}

/// Streams values as text into a byte sink, with a configurable integer
/// base.
pub struct ValueStream<'out> {
    out: &'out mut dyn Sink,
    base: u8,
}

impl<'out> ValueStream<'out> {
    /// A stream over `out`, printing integers in base 10.
    pub fn new(out: &'out mut dyn Sink) -> Self {
        Self { out, base: 10 }
    }

    /// Inserts one value, returning the stream for chaining.
    pub fn print<T: Insert>(&mut self, value: T) -> &mut Self {
        value.insert_into(self);
        self
    }

    /// The base used for integers.
    #[must_use]
    pub fn base(&self) -> u8 {
        self.base
    }

    /// Sets the base used for integers. Valid bases are 2–36; anything else
    /// renders as decimal, which is a permissive fallback rather than an
    /// error.
    pub fn set_base(&mut self, base: u8) {
        self.base = base;
    }

    /// The underlying sink, for [`Insert`] implementations that write raw
    /// bytes.
    pub fn sink(&mut self) -> &mut (dyn Sink + '_) {
        &mut *self.out
    }

    /// A fresh stream over the same sink with the default base, for
    /// composite values that format their parts independently of the
    /// caller's base state.
    pub fn substream(&mut self) -> ValueStream<'_> {
        ValueStream::new(&mut *self.out)
    }
}

/// A function that reconfigures the stream when inserted into it; see
/// [`BASE_TWO`], [`BASE_DEC`] and [`BASE_HEX`].
pub type Manipulator = fn(&mut ValueStream<'_>);

impl Insert for Manipulator {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        self(strm);
    }
}

/// Switches the stream to binary: `strm.print(BASE_TWO).print(10)` prints
/// `0b1010`.
pub const BASE_TWO: Manipulator = |strm| strm.set_base(2);

/// Switches the stream back to decimal, the default.
pub const BASE_DEC: Manipulator = |strm| strm.set_base(10);

/// Switches the stream to hexadecimal: `strm.print(BASE_HEX).print(10)`
/// prints `0xA`.
pub const BASE_HEX: Manipulator = |strm| strm.set_base(16);

/// Picks an arbitrary base: `strm.print(SetBase(4)).print(5)` prints `11`.
///
/// Bases 2, 8 and 16 carry their conventional prefixes; the others have
/// none.
#[derive(Debug, Clone, Copy)]
pub struct SetBase(
    /// The base to switch to, 2–36.
    pub u8,
);

impl Insert for SetBase {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        strm.set_base(self.0);
    }
}

impl<T: Insert + ?Sized> Insert for &T {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        (**self).insert_into(strm);
    }
}

impl Insert for char {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        let mut utf8 = [0u8; 4];
        strm.sink().write_str(self.encode_utf8(&mut utf8));
    }
}

impl Insert for bool {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        strm.sink().write_str(if *self { "true" } else { "false" });
    }
}

impl Insert for str {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        strm.sink().write_str(self);
    }
}

/// Raw bytes, inserted unformatted.
impl Insert for [u8] {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        strm.sink().write_all(self);
    }
}

#[cfg(feature = "alloc")]
impl Insert for alloc::string::String {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        strm.sink().write_str(self);
    }
}

/// `None` prints nothing at all, the moral equivalent of the null C string.
impl<T: Insert> Insert for Option<T> {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        if let Some(value) = self {
            value.insert_into(strm);
        }
    }
}

impl<T> Insert for *const T {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        render::write_hex(strm.sink(), *self as usize as u64);
    }
}

impl<T> Insert for *mut T {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        render::write_hex(strm.sink(), *self as usize as u64);
    }
}

impl Insert for f32 {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        render::write_float(strm.sink(), f64::from(*self), 2);
    }
}

impl Insert for f64 {
    fn insert_into(&self, strm: &mut ValueStream<'_>) {
        render::write_float(strm.sink(), *self, 2);
    }
}

// Signed values print the sign themselves; the magnitude is the same-width
// unsigned absolute value, widened for the shared digit writer. That
// sidesteps the most-negative-value overflow that negating directly would
// hit.
macro_rules! impl_insert_int {
    (signed: $($s:ty),*; unsigned: $($u:ty),*) => {
        $(impl Insert for $s {
            fn insert_into(&self, strm: &mut ValueStream<'_>) {
                let base = strm.base();
                render::write_integer(strm.sink(), *self < 0, self.unsigned_abs() as u64, base);
            }
        })*
        $(impl Insert for $u {
            fn insert_into(&self, strm: &mut ValueStream<'_>) {
                let base = strm.base();
                render::write_integer(strm.sink(), false, *self as u64, base);
            }
        })*
    };
}

impl_insert_int!(signed: i8, i16, i32, i64, isize; unsigned: u8, u16, u32, u64, usize);

/// Makes a fieldless enum streamable by casting it to the given repr and
/// printing that integer in the stream's base.
///
/// ```
/// use bytemodem::{insert_enum, ValueStream, VecSink};
///
/// #[derive(Clone, Copy)]
/// enum Mode {
///     Idle = 0,
///     Busy = 3,
/// }
/// insert_enum!(Mode as u8);
///
/// let mut out = VecSink::new();
/// ValueStream::new(&mut out).print(Mode::Busy).print(Mode::Idle);
/// assert_eq!(out.as_bytes(), b"30");
/// ```
#[macro_export]
macro_rules! insert_enum {
    ($ty:ty as $repr:ty) => {
        impl $crate::Insert for $ty {
            fn insert_into(&self, strm: &mut $crate::ValueStream<'_>) {
                $crate::Insert::insert_into(&(*self as $repr), strm);
            }
        }
    };
}
