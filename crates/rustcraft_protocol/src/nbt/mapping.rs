//! NBT struct mapping (C6): `Tag` <-> record reflection.
//!
//! `#[derive(NbtMarshal)]` in `rustcraft_protocol_macros` generates the
//! per-struct [`NbtMarshal`] impl using this module's trait and helpers;
//! this module supplies the trait itself plus impls for the primitive and
//! container types a derived struct is built out of.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::io::Writer;
use crate::nbt::{Compound, Tag, TagType, write_tag_network};

/// Bidirectional mapping between a Rust value and an NBT [`Tag`].
pub trait NbtMarshal: Sized {
    fn marshal(&self) -> Tag;
    fn unmarshal(tag: &Tag) -> Result<Self>;
}

/// `marshal` followed by a network-format write, per §4.6.
pub fn encode<T: NbtMarshal>(value: &T) -> Result<Vec<u8>> {
    let mut w = Writer::new();
    write_tag_network(&mut w, &value.marshal())?;
    Ok(w.finish())
}

macro_rules! impl_scalar {
    ($ty:ty, $variant:ident, $expect:literal) => {
        impl NbtMarshal for $ty {
            fn marshal(&self) -> Tag {
                Tag::$variant(*self)
            }
            fn unmarshal(tag: &Tag) -> Result<Self> {
                match tag {
                    Tag::$variant(v) => Ok(*v),
                    _ => Err(Error::UnsupportedType(concat!($expect, " (found a different tag type)"))),
                }
            }
        }
    };
}

impl_scalar!(i8, Byte, "Byte");
impl_scalar!(i16, Short, "Short");
impl_scalar!(i32, Int, "Int");
impl_scalar!(i64, Long, "Long");
impl_scalar!(f32, Float, "Float");
impl_scalar!(f64, Double, "Double");

impl NbtMarshal for bool {
    fn marshal(&self) -> Tag {
        Tag::Byte(if *self { 1 } else { 0 })
    }
    fn unmarshal(tag: &Tag) -> Result<Self> {
        match tag {
            Tag::Byte(v) => Ok(*v != 0),
            _ => Err(Error::UnsupportedType("bool (expected Byte)")),
        }
    }
}

impl NbtMarshal for String {
    fn marshal(&self) -> Tag {
        Tag::String(self.clone())
    }
    fn unmarshal(tag: &Tag) -> Result<Self> {
        match tag {
            Tag::String(s) => Ok(s.clone()),
            _ => Err(Error::UnsupportedType("String (expected TAG_String)")),
        }
    }
}

impl<T: NbtMarshal> NbtMarshal for Vec<T> {
    fn marshal(&self) -> Tag {
        let elem_type = self.first().map(|v| v.marshal().tag_type()).unwrap_or(TagType::END);
        Tag::List(elem_type, self.iter().map(|v| v.marshal()).collect())
    }
    fn unmarshal(tag: &Tag) -> Result<Self> {
        match tag {
            Tag::List(elem_type, items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if item.tag_type() != *elem_type {
                        return Err(Error::MixedListElements);
                    }
                    out.push(T::unmarshal(item)?);
                }
                Ok(out)
            }
            _ => Err(Error::UnsupportedType("Vec<T> (expected TAG_List)")),
        }
    }
}

impl<T: NbtMarshal> NbtMarshal for Option<T> {
    fn marshal(&self) -> Tag {
        match self {
            Some(v) => v.marshal(),
            None => Tag::End,
        }
    }
    fn unmarshal(tag: &Tag) -> Result<Self> {
        match tag {
            Tag::End => Ok(None),
            other => Ok(Some(T::unmarshal(other)?)),
        }
    }
}

/// A string-keyed map; NBT `Compound` requires string keys (§4.6).
impl<T: NbtMarshal> NbtMarshal for IndexMap<String, T> {
    fn marshal(&self) -> Tag {
        let mut map = Compound::new();
        for (k, v) in self {
            map.insert(k.clone(), v.marshal());
        }
        Tag::Compound(map)
    }
    fn unmarshal(tag: &Tag) -> Result<Self> {
        let compound = tag.as_compound().ok_or(Error::UnsupportedType("Map (expected TAG_Compound)"))?;
        let mut out = IndexMap::with_capacity(compound.len());
        for (k, v) in compound {
            out.insert(k.clone(), T::unmarshal(v)?);
        }
        Ok(out)
    }
}
