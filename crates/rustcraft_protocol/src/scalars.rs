//! Positional & misc scalars (C3): `Position` bit-packing, `Angle`, `UUID`,
//! `LpVec3`.

use uuid::Uuid;

use crate::error::Result;
use crate::io::{Reader, Writer};
use crate::primitive::{Decode, Encode};

/// A block position packed into a single `i64`: X (26 bits) at bits 38-63,
/// Z (26 bits) at bits 12-37, Y (12 bits) at bits 0-11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

fn sign_extend(value: i64, bits: u32) -> i64 {
    let shift = 64 - bits;
    (value << shift) >> shift
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn pack(self) -> i64 {
        let x = (self.x as i64) & 0x3FF_FFFF;
        let z = (self.z as i64) & 0x3FF_FFFF;
        let y = (self.y as i64) & 0xFFF;
        (x << 38) | (z << 12) | y
    }

    pub fn unpack(packed: i64) -> Self {
        let x = sign_extend((packed >> 38) & 0x3FF_FFFF, 26) as i32;
        let y = sign_extend(packed & 0xFFF, 12) as i32;
        let z = sign_extend((packed >> 12) & 0x3FF_FFFF, 26) as i32;
        Self { x, y, z }
    }
}

impl Encode for Position {
    fn encode(&self, w: &mut Writer) {
        w.write_i64(self.pack());
    }
}

impl Decode for Position {
    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Position::unpack(r.read_i64()?))
    }
}

/// A single-byte rotation; 256 units = one full turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Angle(pub u8);

impl Angle {
    pub fn from_degrees(degrees: f32) -> Self {
        let normalised = degrees.rem_euclid(360.0);
        Angle((normalised * 256.0 / 360.0).round() as i32 as u8)
    }

    pub fn from_radians(radians: f32) -> Self {
        Self::from_degrees(radians.to_degrees())
    }

    pub fn degrees(self) -> f32 {
        self.0 as f32 * 360.0 / 256.0
    }

    pub fn radians(self) -> f32 {
        self.0 as f32 * std::f32::consts::TAU / 256.0
    }
}

impl Encode for Angle {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(self.0);
    }
}

impl Decode for Angle {
    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Angle(r.read_u8()?))
    }
}

/// A 16-byte, big-endian UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct McUuid(pub Uuid);

impl McUuid {
    pub fn from_halves(most: i64, least: i64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&most.to_be_bytes());
        bytes[8..16].copy_from_slice(&least.to_be_bytes());
        McUuid(Uuid::from_bytes(bytes))
    }

    pub fn halves(self) -> (i64, i64) {
        let bytes = self.0.into_bytes();
        let most = i64::from_be_bytes(bytes[0..8].try_into().unwrap());
        let least = i64::from_be_bytes(bytes[8..16].try_into().unwrap());
        (most, least)
    }
}

impl Encode for McUuid {
    fn encode(&self, w: &mut Writer) {
        w.write_bytes(self.0.as_bytes());
    }
}

impl Decode for McUuid {
    fn decode(r: &mut Reader) -> Result<Self> {
        let bytes = r.read_bytes(16)?;
        let arr: [u8; 16] = bytes.try_into().expect("read_bytes(16) yields 16 bytes");
        Ok(McUuid(Uuid::from_bytes(arr)))
    }
}

/// Magnitude below which an `LpVec3` component is treated as zero.
const LP_ZERO_THRESHOLD: f64 = 3.0517578125e-5;
/// Clamp applied before classifying/encoding a component.
const LP_CLAMP: f64 = 1.717_986_918_4e10;

fn lp_sanitize(v: f64) -> f64 {
    let v = if v.is_nan() { 0.0 } else { v };
    v.clamp(-LP_CLAMP, LP_CLAMP)
}

/// Low-precision velocity vector with an all-zero single-byte shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LpVec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LpVec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn sanitized(self) -> (f64, f64, f64) {
        (lp_sanitize(self.x), lp_sanitize(self.y), lp_sanitize(self.z))
    }

    fn is_zero(self) -> bool {
        let (x, y, z) = self.sanitized();
        x.abs() < LP_ZERO_THRESHOLD && y.abs() < LP_ZERO_THRESHOLD && z.abs() < LP_ZERO_THRESHOLD
    }
}

impl Encode for LpVec3 {
    fn encode(&self, w: &mut Writer) {
        if self.is_zero() {
            w.write_u8(0);
            return;
        }

        let (x, y, z) = self.sanitized();
        let max_abs = x.abs().max(y.abs()).max(z.abs());
        let scale = max_abs.ceil().max(1.0) as u32;

        let pack_component = |v: f64| -> u32 {
            let u = ((v / scale as f64 + 1.0) * 32766.0 / 2.0).round();
            u.clamp(0.0, 32766.0) as u32
        };

        let ux = pack_component(x) & 0x7FFF;
        let uy = pack_component(y) & 0x7FFF;
        let uz = pack_component(z) & 0x7FFF;

        let low_scale = scale & 0x3;
        let continues = scale > 3;

        let mut bits: u64 = 0;
        bits |= low_scale as u64;
        bits |= (continues as u64) << 2;
        bits |= (ux as u64) << 3;
        bits |= (uy as u64) << 18;
        bits |= (uz as u64) << 33;

        // First two bytes little-endian, remaining four big-endian.
        let le = (bits & 0xFFFF) as u16;
        let be = (bits >> 16) as u32;
        w.write_bytes(&le.to_le_bytes());
        w.write_bytes(&be.to_be_bytes());

        if continues {
            w.write_varint((scale >> 2) as i32);
        }
    }
}

impl Decode for LpVec3 {
    fn decode(r: &mut Reader) -> Result<Self> {
        let first = r.read_u8()?;
        if first == 0 {
            // The packed buffer always has scale >= 1, so either the
            // continuation flag (bit 2) or the low scale bits (0-1) of the
            // first byte are set; a literal 0x00 can only be the shorthand.
            return Ok(LpVec3::default());
        }

        let mut le_bytes = [first, r.read_u8()?];
        le_bytes.swap(0, 1);
        let le = u16::from_be_bytes(le_bytes);
        let be_bytes = r.read_bytes(4)?;
        let be = u32::from_be_bytes(be_bytes.try_into().unwrap());

        let bits: u64 = (le as u64) | ((be as u64) << 16);

        let low_scale = (bits & 0x3) as u32;
        let continues = (bits >> 2) & 0x1 != 0;
        let ux = ((bits >> 3) & 0x7FFF) as u32;
        let uy = ((bits >> 18) & 0x7FFF) as u32;
        let uz = ((bits >> 33) & 0x7FFF) as u32;

        let scale: u32 = if continues {
            let high = r.read_varint()? as u32;
            (high << 2) | low_scale
        } else {
            low_scale
        };
        let scale = scale.max(1) as f64;

        let unpack_component = |u: u32| -> f64 {
            let u = u.min(32766) as f64;
            (u * 2.0 / 32766.0 - 1.0) * scale
        };

        Ok(LpVec3 {
            x: unpack_component(ux),
            y: unpack_component(uy),
            z: unpack_component(uz),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_packs_to_spec_example() {
        let pos = Position::new(18357644, 831, -20882616);
        let packed = pos.pack();
        assert_eq!(packed.to_be_bytes(), [0x46, 0x07, 0x63, 0x2c, 0x15, 0xb4, 0x83, 0x3f]);
        assert_eq!(Position::unpack(packed), pos);
    }

    #[test]
    fn position_round_trips_boundaries() {
        for pos in [
            Position::new(0, 0, 0),
            Position::new(-1, -1, -1),
            Position::new(33554431, 2047, 33554431),
            Position::new(-33554432, -2048, -33554432),
        ] {
            assert_eq!(Position::unpack(pos.pack()), pos);
        }
    }

    #[test]
    fn angle_round_trips() {
        for degrees in [0.0, 90.0, 180.0, -45.0, 359.9] {
            let angle = Angle::from_degrees(degrees);
            let mut w = Writer::new();
            angle.encode(&mut w);
            let mut r = Reader::new(w.as_slice());
            assert_eq!(Angle::decode(&mut r).unwrap(), angle);
        }
    }

    #[test]
    fn uuid_halves_round_trip() {
        let uuid = McUuid(Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef));
        let (most, least) = uuid.halves();
        assert_eq!(McUuid::from_halves(most, least), uuid);

        let mut w = Writer::new();
        uuid.encode(&mut w);
        assert_eq!(w.len(), 16);
        let mut r = Reader::new(w.as_slice());
        assert_eq!(McUuid::decode(&mut r).unwrap(), uuid);
    }

    #[test]
    fn lp_vec3_zero_is_single_byte() {
        let mut w = Writer::new();
        LpVec3::new(0.0, 0.0, 0.0).encode(&mut w);
        assert_eq!(w.as_slice(), &[0x00]);

        let mut w = Writer::new();
        LpVec3::new(1e-6, -1e-6, 0.0).encode(&mut w);
        assert_eq!(w.as_slice(), &[0x00]);
    }

    #[test]
    fn lp_vec3_unit_x_round_trips_within_tolerance() {
        let original = LpVec3::new(1.0, 0.0, 0.0);
        let mut w = Writer::new();
        original.encode(&mut w);
        assert!(w.len() <= 6);
        let mut r = Reader::new(w.as_slice());
        let decoded = LpVec3::decode(&mut r).unwrap();
        assert!((decoded.x - original.x).abs() <= 0.001);
        assert!((decoded.y - original.y).abs() <= 0.001);
        assert!((decoded.z - original.z).abs() <= 0.001);
    }

    #[test]
    fn lp_vec3_large_scale_uses_continuation() {
        let original = LpVec3::new(500.0, -500.0, 12.0);
        let mut w = Writer::new();
        original.encode(&mut w);
        assert!(w.len() > 6, "scale > 3 should emit a trailing VarInt");
        let mut r = Reader::new(w.as_slice());
        let decoded = LpVec3::decode(&mut r).unwrap();
        assert!((decoded.x - original.x).abs() <= 0.1);
        assert!((decoded.y - original.y).abs() <= 0.1);
        assert!((decoded.z - original.z).abs() <= 0.1);
    }
}
