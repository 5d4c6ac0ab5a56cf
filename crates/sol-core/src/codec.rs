//! Byte-level codecs used by the wire format and the RPC boundary.
//!
//! Base58 (Bitcoin alphabet) is the textual form of keys, blockhashes and
//! signatures. Base64 wraps whole signed transactions for `sendTransaction`.
//! Compact-u16 is the variable-length prefix used for every length field in
//! the message layout.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::SolError;

// ---------------------------------------------------------------------------
// Base58
// ---------------------------------------------------------------------------

/// Encode bytes as Base58. Each leading zero byte becomes a leading `'1'`.
pub fn base58_encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode a Base58 string of any length.
pub fn base58_decode(input: &str) -> Result<Vec<u8>, SolError> {
    bs58::decode(input)
        .into_vec()
        .map_err(|e| SolError::Decode(format!("base58 decode failed: {e}")))
}

/// Decode a Base58 string that must hold exactly 32 bytes (a public key or
/// a blockhash). Shorter or longer values are rejected, never padded.
pub fn decode_base58_32(input: &str) -> Result<[u8; 32], SolError> {
    let bytes = base58_decode(input)?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::Decode(format!("expected 32 bytes, got {}", v.len()))
    })
}

// ---------------------------------------------------------------------------
// Base64
// ---------------------------------------------------------------------------

/// Standard RFC 4648 Base64 with padding.
pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn base64_decode(input: &str) -> Result<Vec<u8>, SolError> {
    STANDARD
        .decode(input)
        .map_err(|e| SolError::Decode(format!("base64 decode failed: {e}")))
}

// ---------------------------------------------------------------------------
// Fixed-width integers
// ---------------------------------------------------------------------------

/// Encode a `u64` as 8 little-endian bytes (lamports, token amounts).
pub fn encode_u64_le(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Encode a `u32` as 4 little-endian bytes (System Program instruction tags).
pub fn encode_u32_le(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

// ---------------------------------------------------------------------------
// Compact-u16
// ---------------------------------------------------------------------------

/// Maximum number of bytes a compact-u16 occupies.
pub const MAX_COMPACT_U16_LEN: usize = 3;

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(MAX_COMPACT_U16_LEN);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Encode a `usize` length as compact-u16, failing if it does not fit.
pub fn encode_compact_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let value = u16::try_from(len).map_err(|_| {
        SolError::SerializationLimitExceeded(format!(
            "{what} length {len} exceeds compact-u16 maximum {}",
            u16::MAX
        ))
    })?;
    Ok(encode_compact_u16(value))
}

/// Decode a compact-u16 value from the front of `data`.
///
/// Returns `(value, bytes_consumed)`. Truncated input, a continuation bit on
/// the third byte, values above `u16::MAX` and non-canonical (zero-padded)
/// encodings are all rejected.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().take(MAX_COMPACT_U16_LEN).enumerate() {
        if i > 0 && byte == 0 {
            return Err(SolError::Decode(
                "non-canonical compact-u16 encoding".into(),
            ));
        }

        value |= ((byte & 0x7f) as u32) << (7 * i);

        if byte & 0x80 == 0 {
            if value > u16::MAX as u32 {
                return Err(SolError::Decode("compact-u16 value overflow".into()));
            }
            return Ok((value as u16, i + 1));
        }

        if i == MAX_COMPACT_U16_LEN - 1 {
            return Err(SolError::Decode("compact-u16 value overflow".into()));
        }
    }

    Err(SolError::Decode(
        "unexpected end of data while decoding compact-u16".into(),
    ))
}
