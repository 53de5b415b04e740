//! Slot / HashedSlot (C8): item stacks with opaque, caller-decoded data
//! components. The core never parses component internals (§9 decision);
//! decoding a component's raw bytes requires a caller-supplied decoder
//! because no component carries a self-describing length.

use crate::error::{Error, Result};
use crate::io::{Reader, Writer};

/// Reads the raw bytes a single data component occupies on the wire.
/// There is no length prefix, so the decoder alone knows how many bytes it
/// consumed; it must return exactly those bytes.
pub type ComponentDecoder<'a> = dyn FnMut(i32, &mut Reader) -> Result<Vec<u8>> + 'a;

/// Writes a single data component's previously-captured raw bytes back to
/// the wire. Defaults to a verbatim passthrough.
pub type ComponentEncoder<'a> = dyn FnMut(i32, &[u8], &mut Writer) + 'a;

fn passthrough_encoder(_id: i32, bytes: &[u8], w: &mut Writer) {
    w.write_bytes(bytes);
}

/// A protocol-level item stack. Empty iff `count <= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slot {
    pub count: i32,
    pub item:  Option<SlotItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotItem {
    pub item_id: i32,
    pub add:     Vec<(i32, Vec<u8>)>,
    pub remove:  Vec<i32>,
}

impl Slot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn decode(r: &mut Reader, decoder: &mut ComponentDecoder) -> Result<Self> {
        let count = r.read_varint()?;
        if count <= 0 {
            return Ok(Slot { count, item: None });
        }

        let item_id = r.read_varint()?;
        let add_count = non_negative(r.read_varint()?)?;
        let remove_count = non_negative(r.read_varint()?)?;

        let mut add = Vec::with_capacity(add_count.min(4096));
        for _ in 0..add_count {
            let component_id = r.read_varint()?;
            let bytes = decoder(component_id, r)?;
            add.push((component_id, bytes));
        }

        let mut remove = Vec::with_capacity(remove_count.min(4096));
        for _ in 0..remove_count {
            remove.push(r.read_varint()?);
        }

        Ok(Slot {
            count,
            item: Some(SlotItem { item_id, add, remove }),
        })
    }

    /// Decodes using the default passthrough decoder, which requires each
    /// component's bytes to have been pre-captured with an explicit length
    /// by the caller; most callers should prefer [`Slot::decode`] with a
    /// real `componentDecoder`.
    pub fn encode(&self, w: &mut Writer) {
        self.encode_with(w, &mut passthrough_encoder)
    }

    pub fn encode_with(&self, w: &mut Writer, encoder: &mut ComponentEncoder) {
        w.write_varint(self.count);
        let Some(item) = &self.item else { return };
        if self.count <= 0 {
            return;
        }
        w.write_varint(item.item_id);
        w.write_varint(item.add.len() as i32);
        w.write_varint(item.remove.len() as i32);
        for (id, bytes) in &item.add {
            w.write_varint(*id);
            encoder(*id, bytes, w);
        }
        for id in &item.remove {
            w.write_varint(*id);
        }
    }
}

/// Serverbound variant: each added component carries a 32-bit hash rather
/// than raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HashedSlot {
    pub count: i32,
    pub item:  Option<HashedSlotItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HashedSlotItem {
    pub item_id: i32,
    pub add:     Vec<(i32, i32)>,
    pub remove:  Vec<i32>,
}

impl HashedSlot {
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let count = r.read_varint()?;
        if count <= 0 {
            return Ok(HashedSlot { count, item: None });
        }

        let item_id = r.read_varint()?;
        let add_count = non_negative(r.read_varint()?)?;
        let remove_count = non_negative(r.read_varint()?)?;

        let mut add = Vec::with_capacity(add_count.min(4096));
        for _ in 0..add_count {
            let component_id = r.read_varint()?;
            let hash = r.read_i32()?;
            add.push((component_id, hash));
        }

        let mut remove = Vec::with_capacity(remove_count.min(4096));
        for _ in 0..remove_count {
            remove.push(r.read_varint()?);
        }

        Ok(HashedSlot {
            count,
            item: Some(HashedSlotItem { item_id, add, remove }),
        })
    }

    pub fn encode(&self, w: &mut Writer) {
        w.write_varint(self.count);
        let Some(item) = &self.item else { return };
        if self.count <= 0 {
            return;
        }
        w.write_varint(item.item_id);
        w.write_varint(item.add.len() as i32);
        w.write_varint(item.remove.len() as i32);
        for (id, hash) in &item.add {
            w.write_varint(*id);
            w.write_i32(*hash);
        }
        for id in &item.remove {
            w.write_varint(*id);
        }
    }
}

fn non_negative(v: i32) -> Result<usize> {
    if v < 0 {
        return Err(Error::NegativeLength(v as i64));
    }
    Ok(v as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_is_just_the_count() {
        let slot = Slot::empty();
        let mut w = Writer::new();
        slot.encode(&mut w);
        assert_eq!(w.as_slice(), &[0x00]);

        let mut r = Reader::new(w.as_slice());
        let mut decoder = |_id: i32, _r: &mut Reader| -> Result<Vec<u8>> { unreachable!("no components in an empty slot") };
        assert_eq!(Slot::decode(&mut r, &mut decoder).unwrap(), slot);
    }

    #[test]
    fn slot_round_trips_with_opaque_component_bytes() {
        let slot = Slot {
            count: 3,
            item:  Some(SlotItem {
                item_id: 42,
                add:     vec![(5, vec![0xde, 0xad, 0xbe, 0xef])],
                remove:  vec![7],
            }),
        };

        let mut w = Writer::new();
        slot.encode_with(&mut w, &mut |id, bytes, w| {
            w.write_bytes(bytes);
            let _ = id;
        });
        let bytes = w.finish();

        let mut r = Reader::new(&bytes);
        let mut decoder = |_id: i32, r: &mut Reader| -> Result<Vec<u8>> { r.read_bytes(4) };
        let decoded = Slot::decode(&mut r, &mut decoder).unwrap();
        assert_eq!(decoded, slot);
    }

    #[test]
    fn hashed_slot_round_trips() {
        let slot = HashedSlot {
            count: 1,
            item:  Some(HashedSlotItem {
                item_id: 9,
                add:     vec![(2, -123), (3, 456)],
                remove:  vec![],
            }),
        };
        let mut w = Writer::new();
        slot.encode(&mut w);
        let mut r = Reader::new(w.as_slice());
        assert_eq!(HashedSlot::decode(&mut r).unwrap(), slot);
    }
}
