use crate::error::{Error, Result};
use crate::io::Reader;
use crate::nbt::budget::Budget;
use crate::nbt::{Compound, NbtLimits, Tag, TagType};

/// Reads a file-format tag: root type + root name + payload.
pub fn read_tag(r: &mut Reader, limits: NbtLimits) -> Result<(Tag, String)> {
    read_root(r, false, limits)
}

/// Reads a network-format tag: root type + payload, no root name.
pub fn read_tag_network(r: &mut Reader, limits: NbtLimits) -> Result<Tag> {
    Ok(read_root(r, true, limits)?.0)
}

fn read_root(r: &mut Reader, network: bool, limits: NbtLimits) -> Result<(Tag, String)> {
    let mut budget = Budget::new(limits);

    let tag_type = TagType(r.read_u8()?);
    budget.account(1)?;

    if tag_type == TagType::END {
        return Ok((Tag::End, String::new()));
    }

    let name = if network {
        String::new()
    } else {
        read_modified_utf8(r, &mut budget)?
    };

    let payload = read_payload(r, tag_type, &mut budget)?;
    Ok((payload, name))
}

/// Reads the NBT string encoding: a 2-byte big-endian unsigned length
/// followed by that many raw bytes.
///
/// Decoded as plain UTF-8 rather than Java's modified UTF-8 (see
/// `DESIGN.md` for the accepted divergence on embedded NUL bytes and
/// characters outside the BMP).
fn read_modified_utf8(r: &mut Reader, budget: &mut Budget) -> Result<String> {
    let len = r.read_u16()? as usize;
    budget.account(2 + len)?;
    let bytes = r.read_bytes(len)?;
    String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
}

fn read_payload(r: &mut Reader, tag_type: TagType, budget: &mut Budget) -> Result<Tag> {
    match tag_type {
        TagType::BYTE => {
            budget.account(1)?;
            Ok(Tag::Byte(r.read_i8()?))
        }
        TagType::SHORT => {
            budget.account(2)?;
            Ok(Tag::Short(r.read_i16()?))
        }
        TagType::INT => {
            budget.account(4)?;
            Ok(Tag::Int(r.read_i32()?))
        }
        TagType::LONG => {
            budget.account(8)?;
            Ok(Tag::Long(r.read_i64()?))
        }
        TagType::FLOAT => {
            budget.account(4)?;
            Ok(Tag::Float(r.read_f32()?))
        }
        TagType::DOUBLE => {
            budget.account(8)?;
            Ok(Tag::Double(r.read_f64()?))
        }
        TagType::STRING => Ok(Tag::String(read_modified_utf8(r, budget)?)),
        TagType::BYTE_ARRAY => {
            let len = read_array_len(r, budget)?;
            let mut out = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                out.push(r.read_i8()?);
            }
            budget.account(len)?;
            Ok(Tag::ByteArray(out))
        }
        TagType::INT_ARRAY => {
            let len = read_array_len(r, budget)?;
            let mut out = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                out.push(r.read_i32()?);
            }
            budget.account(len * 4)?;
            Ok(Tag::IntArray(out))
        }
        TagType::LONG_ARRAY => {
            let len = read_array_len(r, budget)?;
            let mut out = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                out.push(r.read_i64()?);
            }
            budget.account(len * 8)?;
            Ok(Tag::LongArray(out))
        }
        TagType::LIST => {
            budget.push_depth()?;
            let elem_type = TagType(r.read_u8()?);
            budget.account(1)?;
            let raw_len = r.read_i32()?;
            budget.account(4)?;
            // A negative length is the historical Notchian "empty list"
            // encoding; tolerate it rather than erroring.
            let len = raw_len.max(0) as usize;
            let mut items = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                items.push(read_payload(r, elem_type, budget)?);
            }
            budget.pop_depth();
            Ok(Tag::List(elem_type, items))
        }
        TagType::COMPOUND => {
            budget.push_depth()?;
            let mut map = Compound::new();
            loop {
                let entry_type = TagType(r.read_u8()?);
                budget.account(1)?;
                if entry_type == TagType::END {
                    break;
                }
                let name = read_modified_utf8(r, budget)?;
                let value = read_payload(r, entry_type, budget)?;
                map.insert(name, value);
            }
            budget.pop_depth();
            Ok(Tag::Compound(map))
        }
        TagType::END => Ok(Tag::End),
        TagType(other) => Err(Error::UnknownTagType(other)),
    }
}

fn read_array_len(r: &mut Reader, budget: &mut Budget) -> Result<usize> {
    let len = r.read_i32()?;
    budget.account(4)?;
    if len < 0 {
        return Err(Error::NegativeLength(len as i64));
    }
    Ok(len as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::write_tag_network;

    #[test]
    fn depth_cap_rejects_deeply_nested_compounds() {
        let mut inner = Tag::Compound(Compound::new());
        for _ in 0..10 {
            let mut c = Compound::new();
            c.insert("c".to_string(), inner);
            inner = Tag::Compound(c);
        }

        let mut w = crate::io::Writer::new();
        write_tag_network(&mut w, &inner).unwrap();
        let bytes = w.finish();

        let tight_limits = NbtLimits {
            max_depth: 3,
            ..NbtLimits::default()
        };
        let mut r = Reader::new(&bytes);
        assert!(matches!(
            read_tag_network(&mut r, tight_limits),
            Err(Error::DepthExceeded(3))
        ));

        let mut r = Reader::new(&bytes);
        assert!(read_tag_network(&mut r, NbtLimits::default()).is_ok());
    }

    #[test]
    fn byte_budget_rejects_oversized_payload() {
        let tag = Tag::ByteArray(vec![0; 1024]);
        let mut w = crate::io::Writer::new();
        write_tag_network(&mut w, &tag).unwrap();
        let bytes = w.finish();

        let tiny = NbtLimits {
            max_bytes: 8,
            ..NbtLimits::default()
        };
        let mut r = Reader::new(&bytes);
        assert!(matches!(read_tag_network(&mut r, tiny), Err(Error::SizeExceeded(8))));
    }

    #[test]
    fn array_rejects_negative_length() {
        let mut w = crate::io::Writer::new();
        w.write_u8(TagType::BYTE_ARRAY.0);
        w.write_i32(-1);
        let mut r = Reader::new(w.as_slice());
        assert!(matches!(
            read_tag_network(&mut r, NbtLimits::default()),
            Err(Error::NegativeLength(-1))
        ));
    }

    #[test]
    fn unknown_tag_type_is_rejected() {
        let mut w = crate::io::Writer::new();
        w.write_u8(200);
        let mut r = Reader::new(w.as_slice());
        assert!(matches!(
            read_tag_network(&mut r, NbtLimits::default()),
            Err(Error::UnknownTagType(200))
        ));
    }
}
