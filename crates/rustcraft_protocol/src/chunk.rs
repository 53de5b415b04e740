//! ChunkData / BlockEntity (C8): chunk-section payload framing. Section
//! contents themselves are opaque bytes — palette/biome decoding is a
//! registry concern explicitly out of scope (§1).

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::io::{Reader, Writer};
use crate::nbt::{NbtLimits, Tag, read_tag_network, write_tag_network};

/// Server-direction vanilla cap on a chunk's packed-section payload.
pub const MAX_CHUNK_SECTION_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntity {
    pub packed_xz: u8,
    pub y:         i16,
    pub entity_type: i32,
    pub data:      Tag,
}

impl BlockEntity {
    pub fn decode(r: &mut Reader, limits: NbtLimits) -> Result<Self> {
        let packed_xz = r.read_u8()?;
        let y = r.read_i16()?;
        let entity_type = r.read_varint()?;
        let data = read_tag_network(r, limits)?;
        Ok(Self {
            packed_xz,
            y,
            entity_type,
            data,
        })
    }

    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.write_u8(self.packed_xz);
        w.write_i16(self.y);
        w.write_varint(self.entity_type);
        write_tag_network(w, &self.data)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkData {
    pub heightmaps: IndexMap<i32, Vec<i64>>,
    pub sections:   Vec<u8>,
    pub block_entities: Vec<BlockEntity>,
}

impl ChunkData {
    pub fn decode(r: &mut Reader, limits: NbtLimits) -> Result<Self> {
        let heightmap_count = non_negative(r.read_varint()?)?;
        let mut heightmaps = IndexMap::with_capacity(heightmap_count.min(64));
        for _ in 0..heightmap_count {
            let key = r.read_varint()?;
            let long_count = non_negative(r.read_varint()?)?;
            let mut longs = Vec::with_capacity(long_count.min(4096));
            for _ in 0..long_count {
                longs.push(r.read_i64()?);
            }
            heightmaps.insert(key, longs);
        }

        let section_len = non_negative(r.read_varint()?)?;
        if section_len > MAX_CHUNK_SECTION_BYTES {
            return Err(Error::MaxLenExceeded {
                what: "chunk section data",
                max:  MAX_CHUNK_SECTION_BYTES,
            });
        }
        let sections = r.read_bytes(section_len)?;

        let block_entity_count = non_negative(r.read_varint()?)?;
        let mut block_entities = Vec::with_capacity(block_entity_count.min(4096));
        for _ in 0..block_entity_count {
            block_entities.push(BlockEntity::decode(r, limits)?);
        }

        Ok(Self {
            heightmaps,
            sections,
            block_entities,
        })
    }

    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.write_varint(self.heightmaps.len() as i32);
        for (key, longs) in &self.heightmaps {
            w.write_varint(*key);
            w.write_varint(longs.len() as i32);
            for long in longs {
                w.write_i64(*long);
            }
        }

        w.write_varint(self.sections.len() as i32);
        w.write_bytes(&self.sections);

        w.write_varint(self.block_entities.len() as i32);
        for be in &self.block_entities {
            be.encode(w)?;
        }
        Ok(())
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
    fn block_entity_round_trips() {
        let be = BlockEntity {
            packed_xz: (3 << 4) | 7,
            y: -12,
            entity_type: 5,
            data: Tag::Compound(crate::nbt::Compound::new()),
        };
        let mut w = Writer::new();
        be.encode(&mut w).unwrap();
        let mut r = Reader::new(w.as_slice());
        assert_eq!(BlockEntity::decode(&mut r, NbtLimits::default()).unwrap(), be);
    }

    #[test]
    fn chunk_data_round_trips_with_heightmaps_and_sections() {
        let mut heightmaps = IndexMap::new();
        heightmaps.insert(1, vec![1, 2, 3]);
        let chunk = ChunkData {
            heightmaps,
            sections: vec![0xAB; 16],
            block_entities: vec![],
        };
        let mut w = Writer::new();
        chunk.encode(&mut w).unwrap();
        let mut r = Reader::new(w.as_slice());
        assert_eq!(ChunkData::decode(&mut r, NbtLimits::default()).unwrap(), chunk);
    }

    #[test]
    fn chunk_data_rejects_oversized_section_payload() {
        let mut w = Writer::new();
        w.write_varint(0); // no heightmaps
        w.write_varint((MAX_CHUNK_SECTION_BYTES + 1) as i32);
        let mut r = Reader::new(w.as_slice());
        assert!(matches!(
            ChunkData::decode(&mut r, NbtLimits::default()),
            Err(Error::MaxLenExceeded { what: "chunk section data", .. })
        ));
    }
}
