//! LightData (C8): four bitsets marking which chunk sections carry
//! sky/block light, followed by the corresponding 2048-byte nibble arrays.

use crate::combinators::BitSet;
use crate::error::{Error, Result};
use crate::io::{Reader, Writer};
use crate::primitive::{Decode, Encode};

/// Each present section contributes a fixed 2048-byte nibble array (4 bits
/// per block, 4096 blocks).
pub const LIGHT_ARRAY_LEN: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightData {
    pub sky_mask:         BitSet,
    pub block_mask:       BitSet,
    pub empty_sky_mask:   BitSet,
    pub empty_block_mask: BitSet,
    pub sky_arrays:       Vec<[u8; LIGHT_ARRAY_LEN]>,
    pub block_arrays:     Vec<[u8; LIGHT_ARRAY_LEN]>,
}

fn decode_arrays(r: &mut Reader) -> Result<Vec<[u8; LIGHT_ARRAY_LEN]>> {
    let count = r.read_varint()?;
    if count < 0 {
        return Err(Error::NegativeLength(count as i64));
    }
    let mut out = Vec::with_capacity((count as usize).min(4096));
    for _ in 0..count {
        let bytes = r.read_bytes(LIGHT_ARRAY_LEN)?;
        let arr: [u8; LIGHT_ARRAY_LEN] = bytes.try_into().expect("read_bytes(LIGHT_ARRAY_LEN) yields that many bytes");
        out.push(arr);
    }
    Ok(out)
}

fn encode_arrays(w: &mut Writer, arrays: &[[u8; LIGHT_ARRAY_LEN]]) {
    w.write_varint(arrays.len() as i32);
    for arr in arrays {
        w.write_bytes(arr);
    }
}

impl LightData {
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let sky_mask = BitSet::decode(r)?;
        let block_mask = BitSet::decode(r)?;
        let empty_sky_mask = BitSet::decode(r)?;
        let empty_block_mask = BitSet::decode(r)?;
        let sky_arrays = decode_arrays(r)?;
        let block_arrays = decode_arrays(r)?;
        Ok(Self {
            sky_mask,
            block_mask,
            empty_sky_mask,
            empty_block_mask,
            sky_arrays,
            block_arrays,
        })
    }

    pub fn encode(&self, w: &mut Writer) {
        self.sky_mask.encode(w);
        self.block_mask.encode(w);
        self.empty_sky_mask.encode(w);
        self.empty_block_mask.encode(w);
        encode_arrays(w, &self.sky_arrays);
        encode_arrays(w, &self.block_arrays);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_data_round_trips() {
        let mut sky_mask = BitSet::new();
        sky_mask.set(0, true);
        let light = LightData {
            sky_mask,
            block_mask: BitSet::new(),
            empty_sky_mask: BitSet::new(),
            empty_block_mask: BitSet::new(),
            sky_arrays: vec![[0xAB; LIGHT_ARRAY_LEN]],
            block_arrays: vec![],
        };
        let mut w = Writer::new();
        light.encode(&mut w);
        let mut r = Reader::new(w.as_slice());
        assert_eq!(LightData::decode(&mut r).unwrap(), light);
    }
}
