//! The selective-extraction visitor (§4.5.3): callbacks for each scalar and
//! for list/compound entry, with a dedicated skip path so discarding a
//! subtree never allocates it.

use crate::error::Result;
use crate::io::Reader;
use crate::nbt::budget::Budget;
use crate::nbt::{Compound, NbtLimits, Tag, TagType};

/// Callback surface for walking a tag tree without necessarily
/// materializing all of it. All methods default to no-ops; override only
/// the ones a given extraction cares about.
pub trait Visitor {
    fn visit_byte(&mut self, _v: i8) {}
    fn visit_short(&mut self, _v: i16) {}
    fn visit_int(&mut self, _v: i32) {}
    fn visit_long(&mut self, _v: i64) {}
    fn visit_float(&mut self, _v: f32) {}
    fn visit_double(&mut self, _v: f64) {}
    fn visit_byte_array(&mut self, _v: &[i8]) {}
    fn visit_string(&mut self, _v: &str) {}
    fn visit_int_array(&mut self, _v: &[i32]) {}
    fn visit_long_array(&mut self, _v: &[i64]) {}

    /// Return `Some` to descend into the list with a (possibly different)
    /// child visitor; return `None` to have the subtree skipped without
    /// being materialized.
    fn list_start(&mut self, _elem_type: TagType, _len: usize) -> Option<Box<dyn Visitor>> {
        None
    }
    fn list_end(&mut self) {}

    fn compound_start(&mut self) -> Option<Box<dyn Visitor>> {
        None
    }
    /// Return `Some` to descend into this entry's value; `None` skips it.
    fn compound_entry(&mut self, _name: &str, _tag_type: TagType) -> Option<Box<dyn Visitor>> {
        None
    }
    fn compound_end(&mut self) {}

    fn end(&mut self) {}
}

/// Walks an in-memory [`Tag`], invoking `v`'s callbacks.
pub fn accept_visitor(tag: &Tag, v: &mut dyn Visitor) {
    match tag {
        Tag::End => v.end(),
        Tag::Byte(x) => v.visit_byte(*x),
        Tag::Short(x) => v.visit_short(*x),
        Tag::Int(x) => v.visit_int(*x),
        Tag::Long(x) => v.visit_long(*x),
        Tag::Float(x) => v.visit_float(*x),
        Tag::Double(x) => v.visit_double(*x),
        Tag::ByteArray(x) => v.visit_byte_array(x),
        Tag::String(x) => v.visit_string(x),
        Tag::IntArray(x) => v.visit_int_array(x),
        Tag::LongArray(x) => v.visit_long_array(x),
        Tag::List(elem_type, items) => {
            if let Some(mut child) = v.list_start(*elem_type, items.len()) {
                for item in items {
                    accept_visitor(item, child.as_mut());
                }
            }
            v.list_end();
        }
        Tag::Compound(map) => {
            if let Some(_child) = v.compound_start() {
                // `compound_start` exists for symmetry with `list_start` and
                // parity with the streaming walk below; per-entry dispatch
                // always goes through `compound_entry` so each entry can be
                // accepted or skipped independently.
            }
            for (name, value) in map {
                if let Some(mut entry_visitor) = v.compound_entry(name, value.tag_type()) {
                    accept_visitor(value, entry_visitor.as_mut());
                }
            }
            v.compound_end();
        }
    }
}

/// Walks a network-format or file-format tag directly off the wire,
/// invoking `v`'s callbacks without materializing subtrees the visitor
/// declines (returns `None` for).
pub fn visit_reader(r: &mut Reader, v: &mut dyn Visitor, network: bool, limits: NbtLimits) -> Result<()> {
    let mut budget = Budget::new(limits);

    let tag_type = TagType(r.read_u8()?);
    budget.account(1)?;
    if tag_type == TagType::END {
        v.end();
        return Ok(());
    }

    if !network {
        let _name = read_name(r, &mut budget)?;
    }

    visit_payload(r, tag_type, v, &mut budget)
}

fn read_name(r: &mut Reader, budget: &mut Budget) -> Result<String> {
    let len = r.read_u16()? as usize;
    budget.account(2 + len)?;
    let bytes = r.read_bytes(len)?;
    String::from_utf8(bytes).map_err(|_| crate::error::Error::InvalidUtf8)
}

fn visit_payload(r: &mut Reader, tag_type: TagType, v: &mut dyn Visitor, budget: &mut Budget) -> Result<()> {
    match tag_type {
        TagType::BYTE => {
            budget.account(1)?;
            v.visit_byte(r.read_i8()?);
        }
        TagType::SHORT => {
            budget.account(2)?;
            v.visit_short(r.read_i16()?);
        }
        TagType::INT => {
            budget.account(4)?;
            v.visit_int(r.read_i32()?);
        }
        TagType::LONG => {
            budget.account(8)?;
            v.visit_long(r.read_i64()?);
        }
        TagType::FLOAT => {
            budget.account(4)?;
            v.visit_float(r.read_f32()?);
        }
        TagType::DOUBLE => {
            budget.account(8)?;
            v.visit_double(r.read_f64()?);
        }
        TagType::STRING => {
            let s = read_name(r, budget)?;
            v.visit_string(&s);
        }
        TagType::BYTE_ARRAY => {
            let len = read_array_len(r, budget)?;
            let mut out = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                out.push(r.read_i8()?);
            }
            budget.account(len)?;
            v.visit_byte_array(&out);
        }
        TagType::INT_ARRAY => {
            let len = read_array_len(r, budget)?;
            let mut out = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                out.push(r.read_i32()?);
            }
            budget.account(len * 4)?;
            v.visit_int_array(&out);
        }
        TagType::LONG_ARRAY => {
            let len = read_array_len(r, budget)?;
            let mut out = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                out.push(r.read_i64()?);
            }
            budget.account(len * 8)?;
            v.visit_long_array(&out);
        }
        TagType::LIST => {
            budget.push_depth()?;
            let elem_type = TagType(r.read_u8()?);
            budget.account(1)?;
            let raw_len = r.read_i32()?;
            budget.account(4)?;
            let len = raw_len.max(0) as usize;

            match v.list_start(elem_type, len) {
                Some(mut child) => {
                    for _ in 0..len {
                        visit_payload(r, elem_type, child.as_mut(), budget)?;
                    }
                }
                None => {
                    for _ in 0..len {
                        skip_payload(r, elem_type, budget)?;
                    }
                }
            }
            v.list_end();
            budget.pop_depth();
        }
        TagType::COMPOUND => {
            budget.push_depth()?;
            let _ = v.compound_start();
            loop {
                let entry_type = TagType(r.read_u8()?);
                budget.account(1)?;
                if entry_type == TagType::END {
                    break;
                }
                let name = read_name(r, budget)?;
                match v.compound_entry(&name, entry_type) {
                    Some(mut child) => visit_payload(r, entry_type, child.as_mut(), budget)?,
                    None => skip_payload(r, entry_type, budget)?,
                }
            }
            v.compound_end();
            budget.pop_depth();
        }
        TagType::END => {}
        TagType(other) => return Err(crate::error::Error::UnknownTagType(other)),
    }
    Ok(())
}

fn read_array_len(r: &mut Reader, budget: &mut Budget) -> Result<usize> {
    let len = r.read_i32()?;
    budget.account(4)?;
    if len < 0 {
        return Err(crate::error::Error::NegativeLength(len as i64));
    }
    Ok(len as usize)
}

/// Consumes (and discards) the payload of `tag_type` without allocating a
/// [`Tag`] for it. This is the O(1)-memory counterpart to `read_payload`
/// used whenever a [`Visitor`] declines a subtree.
pub(crate) fn skip_payload(r: &mut Reader, tag_type: TagType, budget: &mut Budget) -> Result<()> {
    match tag_type {
        TagType::BYTE => {
            r.read_i8()?;
            budget.account(1)?;
        }
        TagType::SHORT => {
            r.read_i16()?;
            budget.account(2)?;
        }
        TagType::INT => {
            r.read_i32()?;
            budget.account(4)?;
        }
        TagType::LONG => {
            r.read_i64()?;
            budget.account(8)?;
        }
        TagType::FLOAT => {
            r.read_f32()?;
            budget.account(4)?;
        }
        TagType::DOUBLE => {
            r.read_f64()?;
            budget.account(8)?;
        }
        TagType::STRING => {
            let _ = read_name(r, budget)?;
        }
        TagType::BYTE_ARRAY => {
            let len = read_array_len(r, budget)?;
            r.read_bytes(len)?;
            budget.account(len)?;
        }
        TagType::INT_ARRAY => {
            let len = read_array_len(r, budget)?;
            r.read_bytes(len * 4)?;
            budget.account(len * 4)?;
        }
        TagType::LONG_ARRAY => {
            let len = read_array_len(r, budget)?;
            r.read_bytes(len * 8)?;
            budget.account(len * 8)?;
        }
        TagType::LIST => {
            budget.push_depth()?;
            let elem_type = TagType(r.read_u8()?);
            budget.account(1)?;
            let len = read_array_len(r, budget)?;
            for _ in 0..len {
                skip_payload(r, elem_type, budget)?;
            }
            budget.pop_depth();
        }
        TagType::COMPOUND => {
            budget.push_depth()?;
            loop {
                let entry_type = TagType(r.read_u8()?);
                budget.account(1)?;
                if entry_type == TagType::END {
                    break;
                }
                let _ = read_name(r, budget)?;
                skip_payload(r, entry_type, budget)?;
            }
            budget.pop_depth();
        }
        TagType::END => {}
        TagType(other) => return Err(crate::error::Error::UnknownTagType(other)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::write_tag_network;

    struct CountingVisitor {
        ints: usize,
    }
    impl Visitor for CountingVisitor {
        fn visit_int(&mut self, _v: i32) {
            self.ints += 1;
        }
        fn compound_entry(&mut self, _name: &str, tag_type: TagType) -> Option<Box<dyn Visitor>> {
            if tag_type == TagType::COMPOUND || tag_type == TagType::INT {
                Some(Box::new(CountingVisitor { ints: 0 }))
            } else {
                None
            }
        }
    }

    #[test]
    fn visit_reader_skips_declined_subtrees() {
        let mut outer = Compound::new();
        outer.insert("keep".to_string(), Tag::Int(7));
        outer.insert("skip".to_string(), Tag::String("ignored".to_string()));
        let mut nested = Compound::new();
        nested.insert("deep".to_string(), Tag::Int(9));
        outer.insert("nested".to_string(), Tag::Compound(nested));

        let mut w = crate::io::Writer::new();
        write_tag_network(&mut w, &Tag::Compound(outer)).unwrap();
        let bytes = w.finish();

        let mut r = Reader::new(&bytes);
        let mut v = CountingVisitor { ints: 0 };
        visit_reader(&mut r, &mut v, true, NbtLimits::default()).unwrap();
        // Top-level visitor never directly visits ints, only its children do.
        assert_eq!(v.ints, 0);
    }

    #[test]
    fn accept_visitor_matches_visit_reader_for_plain_scalars() {
        let tag = Tag::Int(42);
        let mut w = crate::io::Writer::new();
        write_tag_network(&mut w, &tag).unwrap();
        let bytes = w.finish();

        let mut v1 = CountingVisitor { ints: 0 };
        accept_visitor(&tag, &mut v1);
        assert_eq!(v1.ints, 1);

        let mut r = Reader::new(&bytes);
        let mut v2 = CountingVisitor { ints: 0 };
        visit_reader(&mut r, &mut v2, true, NbtLimits::default()).unwrap();
        assert_eq!(v2.ints, 1);
    }
}
