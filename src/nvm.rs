//! Persistent script record
//!
//! Layout of the record stored in non-volatile memory:
//!
//! ```text
//! 0..4  b"AMBI"
//! 4     header checksum: XOR of bytes 0..8 with bytes 4 and 5 taken as 0
//! 5     payload checksum: XOR of every payload byte
//! 6..8  payload length, big-endian u16
//! 8..   payload, UTF-8 script text
//! ```
//!
//! Only script text is stored. Animation state always restarts from the
//! first instruction after a power cycle.

use core::str;

use thiserror::Error;

/// Record magic
pub const MAGIC: [u8; 4] = *b"AMBI";

/// Size of the fixed header
pub const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NvmError {
    #[error("record magic missing")]
    BadMagic,
    #[error("header checksum mismatch")]
    HeaderChecksum,
    #[error("record shorter than its declared length")]
    Truncated,
    #[error("payload checksum mismatch")]
    PayloadChecksum,
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("script of {0} bytes does not fit a record")]
    TooLong(usize),
    #[error("output buffer of {available} bytes, {needed} needed")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Total record size for `script`
pub const fn encoded_len(script: &str) -> usize {
    HEADER_LEN + script.len()
}

/// Write the record for `script` into `out`, returning the bytes written.
pub fn encode(script: &str, out: &mut [u8]) -> Result<usize, NvmError> {
    let payload = script.as_bytes();
    let length = u16::try_from(payload.len()).map_err(|_| NvmError::TooLong(payload.len()))?;
    let needed = encoded_len(script);
    let Some(record) = out.get_mut(..needed) else {
        return Err(NvmError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    };

    let (header, body) = record.split_at_mut(HEADER_LEN);
    header[..4].copy_from_slice(&MAGIC);
    header[5] = checksum(payload);
    header[6..].copy_from_slice(&length.to_be_bytes());
    header[4] = header_checksum(header);
    body.copy_from_slice(payload);
    Ok(needed)
}

/// Read the script stored at the start of `bytes`
///
/// Bytes past the declared payload length are ignored.
pub fn decode(bytes: &[u8]) -> Result<&str, NvmError> {
    let header = bytes.get(..HEADER_LEN).ok_or(NvmError::Truncated)?;
    if header[..4] != MAGIC {
        return Err(NvmError::BadMagic);
    }
    if header[4] != header_checksum(header) {
        return Err(NvmError::HeaderChecksum);
    }
    let length = usize::from(u16::from_be_bytes([header[6], header[7]]));
    let payload = bytes
        .get(HEADER_LEN..HEADER_LEN + length)
        .ok_or(NvmError::Truncated)?;
    if header[5] != checksum(payload) {
        return Err(NvmError::PayloadChecksum);
    }
    str::from_utf8(payload).map_err(|_| NvmError::InvalidUtf8)
}

fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}

/// Checksum of the header with both checksum bytes zeroed
fn header_checksum(header: &[u8]) -> u8 {
    checksum(&header[..4]) ^ checksum(&header[6..HEADER_LEN])
}
