//! Typed decoders for the two fixed admin selectors
//!
//! Discovery only ever issues two calls: `owner()` against the root contract
//! and `getOwners()` against candidate Safes. Both responses are decoded with
//! strict bounds checks; a truncated or oversized response is a `Decode`
//! error rather than a partial result.

use alloy::primitives::Address;

use crate::error::{Error, Result};

/// 4-byte selector for `owner()`
pub const OWNER_SELECTOR: [u8; 4] = [0x8d, 0xa5, 0xcb, 0x5b];

/// 4-byte selector for `getOwners()`
pub const GET_OWNERS_SELECTOR: [u8; 4] = [0xa0, 0xe6, 0x7e, 0x2b];

/// Upper bound on a decoded owner list. A response declaring more owners than
/// this is rejected before any allocation.
pub const MAX_OWNERS: usize = 1000;

const WORD: usize = 32;

/// Decodes a single right-aligned address from the first 32-byte word of an
/// `owner()` response.
pub fn decode_address(raw: &[u8]) -> Result<Address> {
    if raw.len() < WORD {
        return Err(Error::decode(
            "address",
            format!("response is {} bytes, need at least 32", raw.len()),
        ));
    }
    Ok(Address::from_slice(&raw[12..WORD]))
}

/// Decodes a dynamic `address[]` from a `getOwners()` response.
///
/// Standard ABI layout: a 32-byte offset word, a 32-byte length word at that
/// offset, then `length` 32-byte elements each holding a right-aligned
/// address.
pub fn decode_address_array(raw: &[u8]) -> Result<Vec<Address>> {
    if raw.len() < 2 * WORD {
        return Err(Error::decode(
            "address[]",
            format!("response is {} bytes, need at least 64", raw.len()),
        ));
    }

    let offset = word_as_usize(&raw[..WORD])
        .ok_or_else(|| Error::decode("address[]", "offset word out of range"))?;
    let Some(length_end) = offset.checked_add(WORD) else {
        return Err(Error::decode("address[]", "offset word out of range"));
    };
    if length_end > raw.len() {
        return Err(Error::decode("address[]", "offset points past end of response"));
    }

    let length = word_as_usize(&raw[offset..length_end])
        .ok_or_else(|| Error::decode("address[]", "length word out of range"))?;
    if length > MAX_OWNERS {
        return Err(Error::decode(
            "address[]",
            format!("unreasonable number of owners: {length}"),
        ));
    }

    // length is capped, so this cannot overflow
    let data_start = length_end;
    let data_end = data_start + length * WORD;
    if data_end > raw.len() {
        return Err(Error::decode(
            "address[]",
            format!(
                "truncated: {length} owners declared, {} bytes of elements",
                raw.len() - data_start
            ),
        ));
    }

    let mut owners = Vec::with_capacity(length);
    for i in 0..length {
        let start = data_start + i * WORD;
        owners.push(Address::from_slice(&raw[start + 12..start + WORD]));
    }
    Ok(owners)
}

/// Interprets a 32-byte big-endian word as usize, rejecting values with any
/// of the high 24 bytes set.
fn word_as_usize(word: &[u8]) -> Option<usize> {
    if word[..24].iter().any(|&b| b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[24..WORD]);
    usize::try_from(u64::from_be_bytes(buf)).ok()
}
