//! The handshake packet (state `Handshaking`, id `0x00`): the only packet a
//! client sends before picking a next state, so it has no connection state
//! of its own to be decoded against.

use rustcraft_protocol::io::Reader;
use rustcraft_protocol::primitive::{Decode, VarInt};
use rustcraft_protocol::string::decode_string;
use rustcraft_protocol::{Error, Result};
#[cfg(test)]
use rustcraft_protocol::io::Writer;
#[cfg(test)]
use rustcraft_protocol::primitive::Encode;

/// `server_address` carries a hostname or IP literal; vanilla bounds it at
/// 255 characters (longer for SRV-record/FML forwarding payloads, which this
/// demo does not need to support).
const SERVER_ADDRESS_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextState {
    Status,
    Login,
}

impl NextState {
    fn from_varint(v: i32) -> Result<Self> {
        match v {
            1 => Ok(NextState::Status),
            2 => Ok(NextState::Login),
            other => Err(Error::UnknownVariant(other, "Handshake.next_state")),
        }
    }

    fn to_varint(self) -> i32 {
        match self {
            NextState::Status => 1,
            NextState::Login => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol_version: i32,
    pub server_address:   String,
    pub server_port:      u16,
    pub next_state:       NextState,
}

impl Handshake {
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let protocol_version = VarInt::decode(r)?.value();
        let server_address = decode_string(r, SERVER_ADDRESS_MAX_LEN)?;
        let server_port = r.read_u16()?;
        let next_state = NextState::from_varint(VarInt::decode(r)?.value())?;
        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state,
        })
    }

    #[cfg(test)]
    pub fn encode(&self, w: &mut Writer) {
        VarInt(self.protocol_version).encode(w);
        rustcraft_protocol::string::encode_string(w, &self.server_address);
        w.write_u16(self.server_port);
        VarInt(self.next_state.to_varint()).encode(w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_login_handshake() {
        let handshake = Handshake {
            protocol_version: 772,
            server_address:   "localhost".to_string(),
            server_port:      25565,
            next_state:       NextState::Login,
        };
        let mut w = Writer::new();
        handshake.encode(&mut w);
        let mut r = Reader::new(w.as_slice());
        assert_eq!(Handshake::decode(&mut r).unwrap(), handshake);
    }

    #[test]
    fn unknown_next_state_is_rejected() {
        let mut w = Writer::new();
        VarInt(772).encode(&mut w);
        rustcraft_protocol::string::encode_string(&mut w, "localhost");
        w.write_u16(25565);
        VarInt(99).encode(&mut w);
        let mut r = Reader::new(w.as_slice());
        assert!(matches!(Handshake::decode(&mut r), Err(Error::UnknownVariant(99, _))));
    }
}
