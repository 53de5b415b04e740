//! GameProfile / ResolvableProfile (C9): player identity with signed
//! properties.

use uuid::Uuid;

use crate::combinators::PrefixedArray;
use crate::error::{Error, Result};
use crate::io::{Reader, Writer};
use crate::primitive::{Decode, Encode, VarInt};
use crate::scalars::McUuid;
use crate::string::{decode_string, encode_string};

pub const USERNAME_MAX_LEN: usize = 16;
pub const PROPERTY_NAME_MAX_LEN: usize = 64;
pub const PROPERTY_VALUE_MAX_LEN: usize = 32767;
pub const PROPERTY_SIGNATURE_MAX_LEN: usize = 1024;
/// Appearance identifiers (cape/elytra/skin) are texture-hash-shaped
/// identifiers, not usernames; bounded generously since the wire format
/// does not document an exact cap.
pub const APPEARANCE_ID_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileProperty {
    pub name:      String,
    pub value:     String,
    pub signature: Option<String>,
}

/// `PrefixedOptional<String(maxLen)>`: the String combinator needs a caller
/// chosen `maxLen` per field, so it can't be expressed as a single blanket
/// `Option<String>` impl the way `Option<McUuid>` can.
fn decode_optional_string(r: &mut Reader, max_len: usize) -> Result<Option<String>> {
    if r.read_bool()? {
        Ok(Some(decode_string(r, max_len)?))
    } else {
        Ok(None)
    }
}

fn encode_optional_string(w: &mut Writer, value: &Option<String>) {
    match value {
        Some(s) => {
            w.write_bool(true);
            encode_string(w, s);
        }
        None => w.write_bool(false),
    }
}

impl Encode for ProfileProperty {
    fn encode(&self, w: &mut Writer) {
        encode_string(w, &self.name);
        encode_string(w, &self.value);
        encode_optional_string(w, &self.signature);
    }
}

impl Decode for ProfileProperty {
    fn decode(r: &mut Reader) -> Result<Self> {
        let name = decode_string(r, PROPERTY_NAME_MAX_LEN)?;
        let value = decode_string(r, PROPERTY_VALUE_MAX_LEN)?;
        let signature = decode_optional_string(r, PROPERTY_SIGNATURE_MAX_LEN)?;
        Ok(Self { name, value, signature })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProfile {
    pub uuid:       McUuid,
    pub username:   String,
    pub properties: Vec<ProfileProperty>,
}

impl GameProfile {
    /// A v3 (name-based, MD5) UUID derived from `"OfflinePlayer:" +
    /// username`, matching the teacher's no-auth login path.
    pub fn offline(username: impl AsRef<str>) -> Self {
        let offline_name = format!("OfflinePlayer:{}", username.as_ref());
        let uuid = Uuid::new_v3(&Uuid::NAMESPACE_DNS, offline_name.as_bytes());
        Self {
            uuid: McUuid(uuid),
            username: username.as_ref().to_string(),
            properties: Vec::new(),
        }
    }

    pub fn decode(r: &mut Reader) -> Result<Self> {
        let uuid = McUuid::decode(r)?;
        let username = decode_string(r, USERNAME_MAX_LEN)?;
        let properties = PrefixedArray::<ProfileProperty>::decode(r)?.0;
        Ok(Self {
            uuid,
            username,
            properties,
        })
    }

    pub fn encode(&self, w: &mut Writer) {
        self.uuid.encode(w);
        encode_string(w, &self.username);
        PrefixedArray::new(self.properties.clone()).encode(w);
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum SkinModel {
    Classic = 0,
    Slim    = 1,
}

impl Encode for SkinModel {
    fn encode(&self, w: &mut Writer) {
        w.write_varint(*self as i32);
    }
}

impl Decode for SkinModel {
    fn decode(r: &mut Reader) -> Result<Self> {
        match r.read_varint()? {
            0 => Ok(SkinModel::Classic),
            1 => Ok(SkinModel::Slim),
            other => Err(Error::UnknownVariant(other, "SkinModel")),
        }
    }
}

/// A player profile value that is either partial (server-side lookup
/// pending) or complete (fully resolved with identity and appearance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvableProfile {
    Partial {
        username:   Option<String>,
        uuid:       Option<McUuid>,
        properties: Option<Vec<ProfileProperty>>,
        signature:  Option<String>,
    },
    Complete {
        profile:    GameProfile,
        cape:       Option<String>,
        elytra:     Option<String>,
        skin:       Option<String>,
        skin_model: Option<SkinModel>,
    },
}

impl Encode for Vec<ProfileProperty> {
    fn encode(&self, w: &mut Writer) {
        PrefixedArray::new(self.clone()).encode(w)
    }
}

impl Decode for Vec<ProfileProperty> {
    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(PrefixedArray::<ProfileProperty>::decode(r)?.0)
    }
}

impl ResolvableProfile {
    pub fn decode(r: &mut Reader) -> Result<Self> {
        match VarInt::decode(r)?.value() {
            0 => Ok(ResolvableProfile::Partial {
                username:   decode_optional_string(r, USERNAME_MAX_LEN)?,
                uuid:       Option::<McUuid>::decode(r)?,
                properties: Option::<Vec<ProfileProperty>>::decode(r)?,
                signature:  decode_optional_string(r, PROPERTY_SIGNATURE_MAX_LEN)?,
            }),
            1 => Ok(ResolvableProfile::Complete {
                profile:    GameProfile::decode(r)?,
                cape:       decode_optional_string(r, APPEARANCE_ID_MAX_LEN)?,
                elytra:     decode_optional_string(r, APPEARANCE_ID_MAX_LEN)?,
                skin:       decode_optional_string(r, APPEARANCE_ID_MAX_LEN)?,
                skin_model: Option::<SkinModel>::decode(r)?,
            }),
            other => Err(Error::UnknownVariant(other, "ResolvableProfile")),
        }
    }

    pub fn encode(&self, w: &mut Writer) {
        match self {
            ResolvableProfile::Partial {
                username,
                uuid,
                properties,
                signature,
            } => {
                VarInt(0).encode(w);
                encode_optional_string(w, username);
                uuid.encode(w);
                properties.encode(w);
                encode_optional_string(w, signature);
            }
            ResolvableProfile::Complete {
                profile,
                cape,
                elytra,
                skin,
                skin_model,
            } => {
                VarInt(1).encode(w);
                profile.encode(w);
                encode_optional_string(w, cape);
                encode_optional_string(w, elytra);
                encode_optional_string(w, skin);
                skin_model.encode(w);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_uuid_is_deterministic_per_username() {
        let a = GameProfile::offline("Notch");
        let b = GameProfile::offline("Notch");
        assert_eq!(a.uuid, b.uuid);
        assert_ne!(GameProfile::offline("Notch").uuid, GameProfile::offline("jeb_").uuid);
    }

    #[test]
    fn game_profile_round_trips() {
        let profile = GameProfile {
            uuid: McUuid(Uuid::new_v4()),
            username: "Steve".to_string(),
            properties: vec![ProfileProperty {
                name: "textures".to_string(),
                value: "eyJ0ZXh0dXJlcyI6e319".to_string(),
                signature: Some("sig".to_string()),
            }],
        };
        let mut w = Writer::new();
        profile.encode(&mut w);
        let mut r = Reader::new(w.as_slice());
        assert_eq!(GameProfile::decode(&mut r).unwrap(), profile);
    }

    #[test]
    fn resolvable_profile_round_trips_both_branches() {
        let partial = ResolvableProfile::Partial {
            username:   Some("Steve".to_string()),
            uuid:       None,
            properties: None,
            signature:  None,
        };
        let mut w = Writer::new();
        partial.encode(&mut w);
        let mut r = Reader::new(w.as_slice());
        assert_eq!(ResolvableProfile::decode(&mut r).unwrap(), partial);

        let complete = ResolvableProfile::Complete {
            profile: GameProfile::offline("Steve"),
            cape: None,
            elytra: None,
            skin: None,
            skin_model: Some(SkinModel::Slim),
        };
        let mut w = Writer::new();
        complete.encode(&mut w);
        let mut r = Reader::new(w.as_slice());
        assert_eq!(ResolvableProfile::decode(&mut r).unwrap(), complete);
    }
}
