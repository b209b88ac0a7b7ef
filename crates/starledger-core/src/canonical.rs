//! Canonical CBOR encoding of the hashed block fields.
//!
//! This follows RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats
//!
//! The same block must produce identical bytes, and thus an identical hash,
//! on every platform. The block's own hash is never part of the encoding.

use ciborium::value::Value;

use crate::block::{Block, BLOCK_VERSION, MAX_PAYLOAD_BYTES};
use crate::error::CoreError;
use crate::types::BlockHash;

/// Block field keys (integer keys for compact encoding).
mod keys {
    pub const VERSION: u64 = 0;
    pub const HEIGHT: u64 = 1;
    pub const TIMESTAMP: u64 = 2;
    pub const PREVIOUS_HASH: u64 = 3;
    pub const PAYLOAD: u64 = 4;
}

/// Encode the hashed fields of a block to canonical bytes.
pub fn canonical_block_bytes(block: &Block) -> Result<Vec<u8>, CoreError> {
    canonical_fields_bytes(
        block.version,
        block.height,
        block.timestamp,
        block.previous_hash.as_ref(),
        &block.payload,
    )
}

/// Encode block fields that have not been assembled into a [`Block`] yet.
///
/// Fails if the version is unknown or the payload is over the size limit:
/// such a block has no well-defined hash.
pub fn canonical_fields_bytes(
    version: u8,
    height: u64,
    timestamp: u64,
    previous_hash: Option<&BlockHash>,
    payload: &[u8],
) -> Result<Vec<u8>, CoreError> {
    if version != BLOCK_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }
    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(CoreError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_BYTES,
        });
    }

    let previous = match previous_hash {
        Some(hash) => Value::Bytes(hash.0.to_vec()),
        None => Value::Null,
    };

    let entries = vec![
        (Value::Integer(keys::VERSION.into()), Value::Integer(version.into())),
        (Value::Integer(keys::HEIGHT.into()), Value::Integer(height.into())),
        (Value::Integer(keys::TIMESTAMP.into()), Value::Integer(timestamp.into())),
        (Value::Integer(keys::PREVIOUS_HASH.into()), previous),
        (Value::Integer(keys::PAYLOAD.into()), Value::Bytes(payload.to_vec())),
    ];

    let mut buf = Vec::new();
    encode_map_canonical(&mut buf, &entries)?;
    Ok(buf)
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Value::Text(s) => {
            encode_uint(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Array(arr) => {
            encode_uint(buf, 4, arr.len() as u64);
            for item in arr {
                encode_value_to(buf, item)?;
            }
        }
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        other => {
            return Err(CoreError::EncodingError(format!(
                "unsupported CBOR value in canonical encoding: {other:?}"
            )))
        }
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a map canonically (major type 5), keys sorted by encoded bytes.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut pairs = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}
