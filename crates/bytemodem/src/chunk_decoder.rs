//! Decoding chunk transfer encoded bodies.
//!
//! The inverse of [`ChunkEncoder`](crate::ChunkEncoder), for tests and
//! host-side tools that verify what an encoder produced. The whole body must
//! be available up front; anything after the zero-size last chunk is handed
//! back undecoded.

use alloc::vec::Vec;

use bstr::ByteSlice;
use thiserror::Error;

/// How many bytes of the offending input an error carries for display.
const CONTEXT_LEN: usize = 16;

/// Ways a chunk encoded body can be malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// CRLF was required and something else (possibly nothing) was found.
    #[error("expected CRLF, found {:?}", .found.as_bstr())]
    ExpectedCrLf {
        /// The bytes found where CRLF was required.
        found: Vec<u8>,
    },

    /// The input began with something other than hex chunk-size digits.
    #[error("expected chunk size, found {:?}", .found.as_bstr())]
    ExpectedChunkSize {
        /// The leading bytes of the malformed input.
        found: Vec<u8>,
    },

    /// The chunk-size token ran to the end of the input.
    #[error("chunk size never ended: {:?}", .found.as_bstr())]
    UnterminatedChunkSize {
        /// The leading bytes of the malformed input.
        found: Vec<u8>,
    },

    /// The chunk-size token does not fit in `usize`.
    #[error("chunk size overflows: {:?}", .found.as_bstr())]
    ChunkSizeOverflow {
        /// The leading bytes of the malformed input.
        found: Vec<u8>,
    },

    /// A chunk claimed more data bytes than remain in the input.
    #[error("chunk size {size} exceeds the {available} bytes that follow")]
    TruncatedChunk {
        /// The decoded chunk size.
        size: usize,
        /// The bytes actually remaining.
        available: usize,
    },

    /// The input ran out before a zero-size last chunk.
    #[error("no last chunk found")]
    MissingLastChunk,
}

fn context(input: &[u8]) -> Vec<u8> {
    input[..input.len().min(CONTEXT_LEN)].to_vec()
}

fn skip_crlf(input: &[u8]) -> Result<&[u8], DecodeError> {
    match input {
        [b'\r', b'\n', rest @ ..] => Ok(rest),
        _ => Err(DecodeError::ExpectedCrLf {
            found: context(input),
        }),
    }
}

/// Splits the hex size token and its CRLF off the front of `encoded`,
/// returning the size and the remainder.
///
/// # Errors
///
/// Fails if `encoded` does not start with hex digits followed by CRLF, or if
/// the size does not fit in `usize`.
pub fn decode_chunk_size(encoded: &[u8]) -> Result<(usize, &[u8]), DecodeError> {
    let digits = encoded
        .iter()
        .take_while(|b| b.is_ascii_hexdigit())
        .count();
    if digits == 0 {
        return Err(DecodeError::ExpectedChunkSize {
            found: context(encoded),
        });
    }
    if digits == encoded.len() {
        return Err(DecodeError::UnterminatedChunkSize {
            found: context(encoded),
        });
    }

    let mut size: usize = 0;
    for &b in &encoded[..digits] {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            _ => b - b'A' + 10,
        };
        size = size
            .checked_mul(16)
            .and_then(|s| s.checked_add(usize::from(digit)))
            .ok_or_else(|| DecodeError::ChunkSizeOverflow {
                found: context(encoded),
            })?;
    }

    let rest = skip_crlf(&encoded[digits..])?;
    Ok((size, rest))
}

/// Splits one full chunk off the front of `encoded`, returning its data and
/// the content that follows.
///
/// # Errors
///
/// Fails on a malformed size token, a chunk longer than the remaining
/// input, or a missing trailing CRLF.
pub fn decode_one_chunk(encoded: &[u8]) -> Result<(&[u8], &[u8]), DecodeError> {
    let (size, rest) = decode_chunk_size(encoded)?;
    if size > rest.len() {
        return Err(DecodeError::TruncatedChunk {
            size,
            available: rest.len(),
        });
    }
    let (data, rest) = rest.split_at(size);
    let rest = skip_crlf(rest)?;
    Ok((data, rest))
}

/// Decodes a whole chunk encoded body, returning the concatenated chunk data
/// and whatever bytes follow the zero-size last chunk.
///
/// # Errors
///
/// Fails on any malformed chunk, and with [`DecodeError::MissingLastChunk`]
/// when the input ends without the `0\r\n\r\n` terminator.
pub fn decode_chunked(mut encoded: &[u8]) -> Result<(Vec<u8>, &[u8]), DecodeError> {
    let mut decoded = Vec::new();
    while !encoded.is_empty() {
        let (data, rest) = decode_one_chunk(encoded)?;
        decoded.extend_from_slice(data);
        if data.is_empty() {
            return Ok((decoded, rest));
        }
        encoded = rest;
    }
    Err(DecodeError::MissingLastChunk)
}
