//! String/Identifier codec (C2): VarInt byte-length + UTF-8 bytes, with a
//! caller-supplied character-count bound.

use crate::error::{Error, Result};
use crate::io::{Reader, Writer};
use crate::primitive::{Decode, Encode};

/// Default `maxLen` used by [`Identifier`].
pub const IDENTIFIER_MAX_LEN: usize = 32767;

/// Reads a VarInt byte-length followed by that many UTF-8 bytes, bounding the
/// resulting character count to `max_len`.
///
/// The byte budget is `4 * max_len` (to admit full UTF-8) rather than
/// `max_len` itself; a negative length or an over-budget length both fail
/// before any bytes are read.
pub fn decode_string(r: &mut Reader, max_len: usize) -> Result<String> {
    let len = r.read_varint()?;
    if len < 0 {
        return Err(Error::NegativeLength(len as i64));
    }
    let len = len as usize;
    let byte_budget = max_len.saturating_mul(4);
    if max_len > 0 && len > byte_budget {
        return Err(Error::MaxLenExceeded {
            what: "string",
            max:  max_len,
        });
    }
    let bytes = r.read_bytes(len)?;
    let s = String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
    if max_len > 0 && s.chars().count() > max_len {
        return Err(Error::MaxLenExceeded {
            what: "string",
            max:  max_len,
        });
    }
    Ok(s)
}

/// Writes a VarInt byte-length followed by the raw UTF-8 bytes of `s`.
pub fn encode_string(w: &mut Writer, s: &str) {
    let bytes = s.as_bytes();
    w.write_varint(bytes.len() as i32);
    w.write_bytes(bytes);
}

/// A namespaced identifier, `namespace:path`. When the colon is absent the
/// namespace defaults to `minecraft`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn minecraft(path: impl AsRef<str>) -> Self {
        Self(format!("minecraft:{}", path.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> &str {
        match self.0.split_once(':') {
            Some((ns, _)) => ns,
            None => "minecraft",
        }
    }

    pub fn path(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, path)) => path,
            None => &self.0,
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Encode for Identifier {
    fn encode(&self, w: &mut Writer) {
        encode_string(w, &self.0);
    }
}

impl Decode for Identifier {
    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Identifier(decode_string(r, IDENTIFIER_MAX_LEN)?))
    }
}
