//! Reflective packet (de)serializer (C11): the trait `#[derive(McPacket)]`
//! targets, plus the structural-fallback helpers its generated code calls
//! for fields whose declared type has no own `Encode`/`Decode` impl.
//!
//! The field-tag vocabulary (`#[mc(skip)]`, `#[mc(length = N)]`,
//! `#[mc(if = "field")]`, `#[mc(prefixed)]`, `#[mc(fixed)]`) lives in
//! `rustcraft_protocol_macros`; this module only supplies the runtime pieces
//! that vocabulary compiles down to.

use crate::error::{Error, Result};
use crate::io::{Reader, Writer};

/// A record-shaped packet payload with a field-declaration-order wire
/// layout. Implemented by hand for leaf types or generated by
/// `#[derive(McPacket)]` for structs.
pub trait McPacket: Sized {
    fn decode(r: &mut Reader) -> Result<Self>;
    fn encode(&self, w: &mut Writer);
}

/// `#[mc(prefixed)]` fallback: `VarInt count` followed by `count` elements,
/// each decoded with `decode_elem`. Used when the element type has no own
/// `Decode` impl the derive can call directly.
pub fn decode_prefixed_vec<T>(r: &mut Reader, mut decode_elem: impl FnMut(&mut Reader) -> Result<T>) -> Result<Vec<T>> {
    let count = r.read_varint()?;
    if count < 0 {
        return Err(Error::NegativeLength(count as i64));
    }
    let count = count as usize;
    let mut out = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        out.push(decode_elem(r)?);
    }
    Ok(out)
}

pub fn encode_prefixed_vec<T>(w: &mut Writer, items: &[T], mut encode_elem: impl FnMut(&mut Writer, &T)) {
    w.write_varint(items.len() as i32);
    for item in items {
        encode_elem(w, item);
    }
}

/// `#[mc(fixed)]` fallback: a slice with a caller-known length and no count
/// prefix on the wire at all — used for arrays whose length is implied by
/// context rather than self-describing.
pub fn decode_fixed_vec<T>(r: &mut Reader, len: usize, mut decode_elem: impl FnMut(&mut Reader) -> Result<T>) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(len.min(4096));
    for _ in 0..len {
        out.push(decode_elem(r)?);
    }
    Ok(out)
}

pub fn encode_fixed_vec<T>(w: &mut Writer, items: &[T], mut encode_elem: impl FnMut(&mut Writer, &T)) {
    for item in items {
        encode_elem(w, item);
    }
}

/// `#[mc(length = N)]` fallback for a fixed-size byte array.
pub fn decode_fixed_bytes(r: &mut Reader, len: usize) -> Result<Vec<u8>> {
    r.read_bytes(len)
}

pub fn encode_fixed_bytes(w: &mut Writer, bytes: &[u8]) {
    w.write_bytes(bytes);
}

/// `PrefixedOptional<FixedByteArray>`: presence flag, then the fixed-length
/// payload iff present. Per §9, `Decode` treats end-of-stream while reading
/// the presence flag as `present = false` rather than propagating
/// `UnexpectedEnd` — `PrefixedOptional` at end-of-stream is documented as a
/// deliberate exception to "every decode step returns its error upward".
pub fn decode_optional_fixed_bytes(r: &mut Reader, len: usize) -> Result<Option<Vec<u8>>> {
    if r.is_empty() {
        return Ok(None);
    }
    if r.read_bool()? {
        Ok(Some(r.read_bytes(len)?))
    } else {
        Ok(None)
    }
}

pub fn encode_optional_fixed_bytes(w: &mut Writer, value: &Option<Vec<u8>>) {
    match value {
        Some(bytes) => {
            w.write_bool(true);
            w.write_bytes(bytes);
        }
        None => w.write_bool(false),
    }
}
