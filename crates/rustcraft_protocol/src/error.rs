//! Error taxonomy for the serialization kernel.
//!
//! Every decode step returns its error upward; there are exactly two
//! documented exceptions (`PrefixedOptional` at end-of-stream, and NBT
//! string truncation on write) and both are handled inline rather than
//! threaded through this enum.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // --- Framing ---
    #[error("frame length {0} exceeds the 21-bit wire limit (2097151)")]
    LengthTooLarge(i32),
    #[error("unexpected end of buffer")]
    UnexpectedEnd,
    #[error("varint is too long (more than {0} bytes)")]
    VarIntTooLong(usize),

    // --- Format ---
    #[error("negative length: {0}")]
    NegativeLength(i64),
    #[error("{what} exceeds its maximum length of {max}")]
    MaxLenExceeded { what: &'static str, max: usize },
    #[error("invalid bool byte: {0:#04x}")]
    InvalidBool(u8),

    // --- Semantic ---
    #[error("unknown NBT tag type: {0}")]
    UnknownTagType(u8),
    #[error("list element type mismatch: declared {declared}, found {found}")]
    ListTypeMismatch { declared: u8, found: u8 },
    #[error("list has mixed element types")]
    MixedListElements,
    #[error("NBT depth exceeded the configured maximum of {0}")]
    DepthExceeded(usize),
    #[error("NBT payload exceeded the configured byte budget of {0}")]
    SizeExceeded(usize),
    #[error("unknown variant tag {0} for {1}")]
    UnknownVariant(i32, &'static str),

    // --- Compression ---
    #[error("zlib inflate failed: {0}")]
    InflateFailed(String),
    #[error("zlib deflate failed: {0}")]
    DeflateFailed(String),
    #[error("compressed frame body ({inner} bytes) is below the compression threshold ({threshold})")]
    CompressedBelowThreshold { inner: usize, threshold: usize },

    // --- Reflection ---
    #[error("field `{0}` has a type unsupported by the reflective (de)serializer")]
    UnsupportedType(&'static str),
    #[error("field `{0}` could not be addressed during (de)serialization")]
    NonAddressableField(&'static str),
    #[error("conditional field `{0}` depends on `{1}`, which was not decoded yet")]
    ConditionFieldMissing(&'static str, &'static str),

    // --- I/O passthrough ---
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid utf-8 in string field")]
    InvalidUtf8,
}
