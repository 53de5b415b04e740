//! Serialize and deserialize buffers from Minecraft: Java Edition.
//!
//! The crate is organized bottom-up: [`io`] and [`primitive`] give every
//! other module its byte cursor and `Encode`/`Decode` traits; [`string`],
//! [`scalars`], and [`combinators`] build the composite wire types; [`nbt`]
//! and [`text`] are self-contained subsystems built on top of those;
//! [`slot`], [`chunk`], [`light`], and [`profile`] are record-shaped payload
//! types assembled from the lower layers; [`frame`] and [`packet`] govern
//! the outer connection-level framing; [`auth`] is the one piece of the
//! login handshake that belongs in the wire-protocol crate rather than the
//! consumer binary.

pub mod auth;
pub mod chunk;
pub mod combinators;
pub mod error;
pub mod frame;
pub mod io;
pub mod light;
pub mod nbt;
pub mod packet;
pub mod primitive;
pub mod profile;
pub mod scalars;
pub mod slot;
pub mod string;
pub mod text;

pub use error::{Error, Result};
pub use frame::{FrameCodec, WirePacket};
pub use io::{Reader, Writer};
pub use packet::McPacket;
pub use primitive::{Decode, Encode, VarInt, VarLong};

pub use rustcraft_protocol_macros::{McPacket, NbtMarshal};
