//! The login sequence (state `Login`): `Login Start` in, `Login Success` out,
//! `Login Acknowledged` in. No encryption or session-server round trip — this
//! demo only exercises [`rustcraft_protocol::auth::server_hash`] against a
//! locally fabricated server ID, then falls back to an offline profile the
//! way a no-auth vanilla server would.

use rustcraft_protocol::auth::server_hash;
use rustcraft_protocol::io::{Reader, Writer};
use rustcraft_protocol::primitive::{Decode, Encode, VarInt};
use rustcraft_protocol::profile::{GameProfile, USERNAME_MAX_LEN};
use rustcraft_protocol::scalars::McUuid;
use rustcraft_protocol::string::decode_string;
use rustcraft_protocol::Result;
use tracing::debug;

pub const PACKET_ID_LOGIN_START:        i32 = 0x00;
pub const PACKET_ID_SET_COMPRESSION:    i32 = 0x03;
pub const PACKET_ID_LOGIN_SUCCESS:      i32 = 0x02;
pub const PACKET_ID_LOGIN_ACKNOWLEDGED: i32 = 0x03;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStart {
    pub name: String,
    pub uuid: McUuid,
}

impl LoginStart {
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let name = decode_string(r, USERNAME_MAX_LEN)?;
        let uuid = McUuid::decode(r)?;
        Ok(Self { name, uuid })
    }
}

/// Computes the `serverId` hash a genuine session-server login would send to
/// `Mojang`, purely to demonstrate [`server_hash`]; this server never
/// contacts the session server and always falls back to [`GameProfile::offline`].
pub fn demo_server_hash(server_address: &str, login_start: &LoginStart) -> String {
    let hash = server_hash(server_address, login_start.name.as_bytes(), login_start.uuid.0.as_bytes());
    debug!("[LOGIN] computed session hash for {}: {}", login_start.name, hash);
    hash
}

pub fn login_success_packet(profile: &GameProfile) -> Vec<u8> {
    let mut w = Writer::new();
    profile.encode(&mut w);
    w.finish()
}

pub fn set_compression_packet(threshold: i32) -> Vec<u8> {
    let mut w = Writer::new();
    VarInt(threshold).encode(&mut w);
    w.finish()
}

#[cfg(test)]
mod tests {
    use rustcraft_protocol::primitive::Encode;
    use rustcraft_protocol::string::encode_string;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn decodes_a_login_start_packet() {
        let mut w = Writer::new();
        encode_string(&mut w, "Notch");
        let uuid = McUuid(Uuid::new_v4());
        uuid.encode(&mut w);

        let mut r = Reader::new(w.as_slice());
        let login_start = LoginStart::decode(&mut r).unwrap();
        assert_eq!(login_start.name, "Notch");
        assert_eq!(login_start.uuid, uuid);
    }

    #[test]
    fn demo_hash_is_deterministic_per_login() {
        let login_start = LoginStart {
            name: "Notch".to_string(),
            uuid: McUuid(Uuid::nil()),
        };
        let a = demo_server_hash("localhost", &login_start);
        let b = demo_server_hash("localhost", &login_start);
        assert_eq!(a, b);
    }

    #[test]
    fn set_compression_packet_encodes_threshold_as_varint() {
        let payload = set_compression_packet(256);
        let mut r = Reader::new(&payload);
        assert_eq!(r.read_varint().unwrap(), 256);
    }
}
