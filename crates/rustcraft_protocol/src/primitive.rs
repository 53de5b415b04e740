//! Generic `Encode`/`Decode` traits over [`Writer`]/[`Reader`], plus the
//! `VarInt`/`VarLong` newtypes that let those get used generically by the
//! composite combinators (C4), NBT struct mapping (C6), and the reflective
//! packet (de)serializer (C11).

use crate::error::Result;
use crate::io::{Reader, Writer, varint_len, varlong_len};

/// A value that can encode itself onto the wire.
pub trait Encode {
    fn encode(&self, w: &mut Writer);
}

/// A value that can decode itself from the wire.
pub trait Decode: Sized {
    fn decode(r: &mut Reader) -> Result<Self>;
}

macro_rules! impl_fixed_width {
    ($ty:ty, $read:ident, $write:ident) => {
        impl Encode for $ty {
            fn encode(&self, w: &mut Writer) {
                w.$write(*self);
            }
        }
        impl Decode for $ty {
            fn decode(r: &mut Reader) -> Result<Self> {
                r.$read()
            }
        }
    };
}

impl_fixed_width!(u8, read_u8, write_u8);
impl_fixed_width!(i8, read_i8, write_i8);
impl_fixed_width!(u16, read_u16, write_u16);
impl_fixed_width!(i16, read_i16, write_i16);
impl_fixed_width!(i32, read_i32, write_i32);
impl_fixed_width!(i64, read_i64, write_i64);
impl_fixed_width!(f32, read_f32, write_f32);
impl_fixed_width!(f64, read_f64, write_f64);
impl_fixed_width!(bool, read_bool, write_bool);

/// 7-bits-per-byte variable length `i32`. Consumes at most 5 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct VarInt(pub i32);

impl VarInt {
    /// Minimal encoded length of `v`, `1..=5`.
    pub fn len(v: i32) -> usize {
        varint_len(v)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for VarInt {
    fn from(v: i32) -> Self {
        VarInt(v)
    }
}

impl From<VarInt> for i32 {
    fn from(v: VarInt) -> Self {
        v.0
    }
}

impl Encode for VarInt {
    fn encode(&self, w: &mut Writer) {
        w.write_varint(self.0);
    }
}

impl Decode for VarInt {
    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(VarInt(r.read_varint()?))
    }
}

/// 7-bits-per-byte variable length `i64`. Consumes at most 10 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct VarLong(pub i64);

impl VarLong {
    /// Minimal encoded length of `v`, `1..=10`.
    pub fn len(v: i64) -> usize {
        varlong_len(v)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for VarLong {
    fn from(v: i64) -> Self {
        VarLong(v)
    }
}

impl Encode for VarLong {
    fn encode(&self, w: &mut Writer) {
        w.write_varlong(self.0);
    }
}

impl Decode for VarLong {
    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(VarLong(r.read_varlong()?))
    }
}
