//! NBT kernel (C5): the tag sum type, streaming reader/writer, and visitor.
//!
//! Submodules mirror the teacher's convention of one file per concern
//! (`reader.rs`, `writer.rs`, `visitor.rs`) rather than one large module.

mod budget;
mod reader;
mod visitor;
mod writer;

pub mod mapping;

pub use reader::{read_tag, read_tag_network};
pub use visitor::{Visitor, accept_visitor, visit_reader};
pub use writer::{write_tag, write_tag_network};

use indexmap::IndexMap;

/// `Compound` backing storage. `IndexMap` preserves the order tags were
/// inserted/read in; the writer sorts keys lexicographically on its own at
/// serialization time (§3 determinism invariant), so insertion order stays
/// meaningful for callers that want it (e.g. round-tripping a file as-read)
/// without the reader paying a sort on every decode.
pub type Compound = IndexMap<String, Tag>;

/// Byte budget and nesting-depth limits enforced by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NbtLimits {
    pub max_depth: usize,
    pub max_bytes: usize,
}

impl Default for NbtLimits {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// The NBT tag sum type.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    /// A homogeneous element sequence; an empty list's `elem_type` is
    /// `TagType::End`.
    List(TagType, Vec<Tag>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// The one-byte tag type discriminant as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagType(pub u8);

impl TagType {
    pub const END: TagType = TagType(0);
    pub const BYTE: TagType = TagType(1);
    pub const SHORT: TagType = TagType(2);
    pub const INT: TagType = TagType(3);
    pub const LONG: TagType = TagType(4);
    pub const FLOAT: TagType = TagType(5);
    pub const DOUBLE: TagType = TagType(6);
    pub const BYTE_ARRAY: TagType = TagType(7);
    pub const STRING: TagType = TagType(8);
    pub const LIST: TagType = TagType(9);
    pub const COMPOUND: TagType = TagType(10);
    pub const INT_ARRAY: TagType = TagType(11);
    pub const LONG_ARRAY: TagType = TagType(12);
}

impl Tag {
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::End => TagType::END,
            Tag::Byte(_) => TagType::BYTE,
            Tag::Short(_) => TagType::SHORT,
            Tag::Int(_) => TagType::INT,
            Tag::Long(_) => TagType::LONG,
            Tag::Float(_) => TagType::FLOAT,
            Tag::Double(_) => TagType::DOUBLE,
            Tag::ByteArray(_) => TagType::BYTE_ARRAY,
            Tag::String(_) => TagType::STRING,
            Tag::List(..) => TagType::LIST,
            Tag::Compound(_) => TagType::COMPOUND,
            Tag::IntArray(_) => TagType::INT_ARRAY,
            Tag::LongArray(_) => TagType::LONG_ARRAY,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }
}
