use crate::error::{Error, Result};
use crate::io::Writer;
use crate::nbt::{Tag, TagType};

/// Writes a file-format tag: root type + root name + payload.
pub fn write_tag(w: &mut Writer, name: &str, tag: &Tag) -> Result<()> {
    w.write_u8(tag.tag_type().0);
    if tag.tag_type() != TagType::END {
        write_modified_utf8(w, name);
        write_payload(w, tag)?;
    }
    Ok(())
}

/// Writes a network-format tag: root type + payload, no root name.
pub fn write_tag_network(w: &mut Writer, tag: &Tag) -> Result<()> {
    w.write_u8(tag.tag_type().0);
    if tag.tag_type() != TagType::END {
        write_payload(w, tag)?;
    }
    Ok(())
}

/// Writes the NBT string encoding: a 2-byte big-endian length followed by
/// the raw bytes, truncated to fit the 16-bit length field if oversized.
///
/// Truncation on overflow is defined behaviour per §7, not an error.
fn write_modified_utf8(w: &mut Writer, s: &str) {
    let bytes = s.as_bytes();
    let truncated = if bytes.len() > u16::MAX as usize {
        // Truncate on a char boundary so the result stays valid UTF-8.
        let mut cut = u16::MAX as usize;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        &bytes[..cut]
    } else {
        bytes
    };
    w.write_u16(truncated.len() as u16);
    w.write_bytes(truncated);
}

fn write_payload(w: &mut Writer, tag: &Tag) -> Result<()> {
    match tag {
        Tag::End => {}
        Tag::Byte(v) => w.write_i8(*v),
        Tag::Short(v) => w.write_i16(*v),
        Tag::Int(v) => w.write_i32(*v),
        Tag::Long(v) => w.write_i64(*v),
        Tag::Float(v) => w.write_f32(*v),
        Tag::Double(v) => w.write_f64(*v),
        Tag::String(s) => write_modified_utf8(w, s),
        Tag::ByteArray(items) => {
            w.write_i32(items.len() as i32);
            for v in items {
                w.write_i8(*v);
            }
        }
        Tag::IntArray(items) => {
            w.write_i32(items.len() as i32);
            for v in items {
                w.write_i32(*v);
            }
        }
        Tag::LongArray(items) => {
            w.write_i32(items.len() as i32);
            for v in items {
                w.write_i64(*v);
            }
        }
        Tag::List(elem_type, items) => {
            let elem_type = if items.is_empty() {
                // An empty list always normalises its declared element type
                // to End, regardless of what the caller stashed there.
                TagType::END
            } else {
                *elem_type
            };
            w.write_u8(elem_type.0);
            w.write_i32(items.len() as i32);
            for item in items {
                if item.tag_type() != elem_type {
                    return Err(Error::ListTypeMismatch {
                        declared: elem_type.0,
                        found:    item.tag_type().0,
                    });
                }
                write_payload(w, item)?;
            }
        }
        Tag::Compound(map) => {
            // Deterministic output: lexicographic key order (§3, §9).
            let mut entries: Vec<(&String, &Tag)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (name, value) in entries {
                w.write_u8(value.tag_type().0);
                write_modified_utf8(w, name);
                write_payload(w, value)?;
            }
            w.write_u8(TagType::END.0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Reader;
    use crate::nbt::{Compound, NbtLimits, read_tag_network};

    #[test]
    fn compound_writes_keys_in_lexicographic_order() {
        let mut map = Compound::new();
        map.insert("zebra".to_string(), Tag::Byte(1));
        map.insert("apple".to_string(), Tag::Byte(2));
        map.insert("mango".to_string(), Tag::Byte(3));

        let mut w = Writer::new();
        write_tag_network(&mut w, &Tag::Compound(map)).unwrap();
        let bytes = w.finish();

        // TAG_Compound, then entries: apple, mango, zebra, then TAG_End.
        assert_eq!(bytes[0], TagType::COMPOUND.0);
        let apple_pos = find_name(&bytes, "apple");
        let mango_pos = find_name(&bytes, "mango");
        let zebra_pos = find_name(&bytes, "zebra");
        assert!(apple_pos < mango_pos);
        assert!(mango_pos < zebra_pos);
    }

    fn find_name(bytes: &[u8], name: &str) -> usize {
        let needle = name.as_bytes();
        bytes
            .windows(needle.len())
            .position(|w| w == needle)
            .expect("name present in buffer")
    }

    #[test]
    fn empty_list_normalises_to_end_element_type() {
        let tag = Tag::List(TagType::COMPOUND, vec![]);
        let mut w = Writer::new();
        write_tag_network(&mut w, &tag).unwrap();
        let bytes = w.finish();
        assert_eq!(bytes[1], TagType::END.0);

        let mut r = Reader::new(&bytes);
        let decoded = read_tag_network(&mut r, NbtLimits::default()).unwrap();
        assert_eq!(decoded, Tag::List(TagType::END, vec![]));
    }

    #[test]
    fn scalar_round_trips_through_network_format() {
        for tag in [
            Tag::Byte(-1),
            Tag::Short(1234),
            Tag::Int(-100000),
            Tag::Long(i64::MIN),
            Tag::Float(1.5),
            Tag::Double(-2.25),
            Tag::String("hello".to_string()),
            Tag::IntArray(vec![1, 2, 3]),
        ] {
            let mut w = Writer::new();
            write_tag_network(&mut w, &tag).unwrap();
            let bytes = w.finish();
            let mut r = Reader::new(&bytes);
            assert_eq!(read_tag_network(&mut r, NbtLimits::default()).unwrap(), tag);
        }
    }

    #[test]
    fn mismatched_list_element_type_is_rejected() {
        let tag = Tag::List(TagType::INT, vec![Tag::Int(1), Tag::String("oops".to_string())]);
        let mut w = Writer::new();
        let err = write_tag_network(&mut w, &tag).unwrap_err();
        assert!(matches!(
            err,
            Error::ListTypeMismatch {
                declared: d,
                found: f
            } if d == TagType::INT.0 && f == TagType::STRING.0
        ));
    }
}
