//! Integration tests for the `#[derive(McPacket)]` / `#[derive(NbtMarshal)]`
//! field-attribute combinations that only compile correctly from outside the
//! crate (the generated code emits `::rustcraft_protocol::...` paths).

use rustcraft_protocol::io::{Reader, Writer};
use rustcraft_protocol::nbt::mapping::NbtMarshal;
use rustcraft_protocol::nbt::Tag;
use rustcraft_protocol::{McPacket, NbtMarshal as NbtMarshalDerive};

#[derive(Debug, PartialEq, McPacket)]
struct PublicKeyPacket {
    has_key: bool,
    #[mc(if = "has_key", length = 4)]
    key: Option<Vec<u8>>,
}

#[test]
fn conditional_fixed_bytes_field_round_trips_when_present() {
    let packet = PublicKeyPacket {
        has_key: true,
        key:     Some(vec![0xDE, 0xAD, 0xBE, 0xEF]),
    };
    let mut w = Writer::new();
    packet.encode(&mut w);
    let bytes = w.finish();

    let mut r = Reader::new(&bytes);
    assert_eq!(PublicKeyPacket::decode(&mut r).unwrap(), packet);
}

#[test]
fn conditional_fixed_bytes_field_round_trips_when_absent_and_truncated() {
    let packet = PublicKeyPacket {
        has_key: false,
        key:     None,
    };
    let mut w = Writer::new();
    packet.encode(&mut w);
    let bytes = w.finish();

    let mut r = Reader::new(&bytes);
    assert_eq!(PublicKeyPacket::decode(&mut r).unwrap(), packet);
}

#[derive(Debug, PartialEq, Default, NbtMarshalDerive)]
struct ScoreEntry {
    name:  String,
    #[nbt(omitempty)]
    score: i32,
}

#[test]
fn omitempty_on_a_non_option_field_round_trips_at_default() {
    let entry = ScoreEntry {
        name:  "zero".to_string(),
        score: 0,
    };
    let tag = entry.marshal();
    let Tag::Compound(compound) = &tag else {
        panic!("expected Compound");
    };
    assert!(!compound.contains_key("score"), "omitempty field at default should be omitted from the wire");
    assert_eq!(ScoreEntry::unmarshal(&tag).unwrap(), entry);
}

#[test]
fn omitempty_on_a_non_option_field_round_trips_when_non_default() {
    let entry = ScoreEntry {
        name:  "nonzero".to_string(),
        score: 42,
    };
    let tag = entry.marshal();
    let Tag::Compound(compound) = &tag else {
        panic!("expected Compound");
    };
    assert!(compound.contains_key("score"));
    assert_eq!(ScoreEntry::unmarshal(&tag).unwrap(), entry);
}
