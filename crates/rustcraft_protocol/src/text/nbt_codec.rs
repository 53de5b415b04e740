//! The NBT encoding of [`TextComponent`], including the "string shorthand"
//! rule (§4.7): a style-free, child-free plain-text component serialises as
//! a bare NBT `String` rather than a `Compound`.

use crate::error::{Error, Result};
use crate::io::Writer;
use crate::nbt::{Compound, Tag, write_tag_network};
use crate::text::{
    ClickAction, ClickEvent, Content, HoverAction, HoverEvent, NbtContent, NbtSource, ScoreContent, Style,
    TextComponent,
};

/// `marshal` half of the shorthand rule.
pub fn marshal(component: &TextComponent) -> Tag {
    if component.is_simple() {
        return Tag::String(component.plain_text().to_string());
    }
    Tag::Compound(marshal_fields(component))
}

fn marshal_fields(component: &TextComponent) -> Compound {
    let mut map = Compound::new();
    match &component.content {
        Content::Plain { text } => {
            map.insert("text".to_string(), Tag::String(text.clone()));
        }
        Content::Translate { translate, with } => {
            map.insert("translate".to_string(), Tag::String(translate.clone()));
            if !with.is_empty() {
                map.insert(
                    "with".to_string(),
                    Tag::List(crate::nbt::TagType::COMPOUND, with.iter().map(marshal).collect()),
                );
            }
        }
        Content::Keybind { keybind } => {
            map.insert("keybind".to_string(), Tag::String(keybind.clone()));
        }
        Content::Score { score } => {
            let mut s = Compound::new();
            s.insert("name".to_string(), Tag::String(score.name.clone()));
            s.insert("objective".to_string(), Tag::String(score.objective.clone()));
            map.insert("score".to_string(), Tag::Compound(s));
        }
        Content::Selector { selector } => {
            map.insert("selector".to_string(), Tag::String(selector.clone()));
        }
        Content::Nbt { nbt, interpret } => {
            map.insert("nbt".to_string(), Tag::String(nbt.path.clone()));
            map.insert(
                "source".to_string(),
                Tag::String(nbt_source_name(nbt.source).to_string()),
            );
            if let Some(i) = interpret {
                map.insert("interpret".to_string(), Tag::Byte(if *i { 1 } else { 0 }));
            }
        }
    }

    let style = &component.style;
    if let Some(c) = &style.color {
        map.insert("color".to_string(), Tag::String(c.clone()));
    }
    if let Some(b) = style.bold {
        map.insert("bold".to_string(), Tag::Byte(b as i8));
    }
    if let Some(b) = style.italic {
        map.insert("italic".to_string(), Tag::Byte(b as i8));
    }
    if let Some(b) = style.underlined {
        map.insert("underlined".to_string(), Tag::Byte(b as i8));
    }
    if let Some(b) = style.strikethrough {
        map.insert("strikethrough".to_string(), Tag::Byte(b as i8));
    }
    if let Some(b) = style.obfuscated {
        map.insert("obfuscated".to_string(), Tag::Byte(b as i8));
    }
    if let Some(f) = &style.font {
        map.insert("font".to_string(), Tag::String(f.clone()));
    }
    if let Some(i) = &style.insertion {
        map.insert("insertion".to_string(), Tag::String(i.clone()));
    }

    if let Some(click) = &component.click_event {
        let mut c = Compound::new();
        c.insert("action".to_string(), Tag::String(click_action_name(click.action).to_string()));
        c.insert("value".to_string(), Tag::String(click.value.clone()));
        map.insert("clickEvent".to_string(), Tag::Compound(c));
    }
    if let Some(hover) = &component.hover_event {
        let mut h = Compound::new();
        h.insert(
            "action".to_string(),
            Tag::String(hover_action_name(hover.action).to_string()),
        );
        h.insert("contents".to_string(), marshal(&hover.contents));
        map.insert("hoverEvent".to_string(), Tag::Compound(h));
    }

    if !component.extra.is_empty() {
        map.insert(
            "extra".to_string(),
            Tag::List(
                crate::nbt::TagType::COMPOUND,
                component.extra.iter().map(marshal).collect(),
            ),
        );
    }

    map
}

fn nbt_source_name(source: NbtSource) -> &'static str {
    match source {
        NbtSource::Block => "block",
        NbtSource::Entity => "entity",
        NbtSource::Storage => "storage",
    }
}

fn nbt_source_from_name(name: &str) -> Result<NbtSource> {
    match name {
        "block" => Ok(NbtSource::Block),
        "entity" => Ok(NbtSource::Entity),
        "storage" => Ok(NbtSource::Storage),
        _ => Err(Error::UnsupportedType("nbt content source")),
    }
}

fn click_action_name(action: ClickAction) -> &'static str {
    match action {
        ClickAction::OpenUrl => "open_url",
        ClickAction::RunCommand => "run_command",
        ClickAction::SuggestCommand => "suggest_command",
        ClickAction::ChangePage => "change_page",
        ClickAction::CopyToClipboard => "copy_to_clipboard",
    }
}

fn hover_action_name(action: HoverAction) -> &'static str {
    match action {
        HoverAction::ShowText => "show_text",
        HoverAction::ShowItem => "show_item",
        HoverAction::ShowEntity => "show_entity",
    }
}

/// `unmarshal` half of the shorthand rule.
pub fn unmarshal(tag: &Tag) -> Result<TextComponent> {
    match tag {
        Tag::String(s) => Ok(TextComponent::text(s.clone())),
        Tag::Compound(map) => unmarshal_compound(map),
        _ => Err(Error::UnsupportedType("TextComponent (expected String or Compound)")),
    }
}

fn unmarshal_compound(map: &Compound) -> Result<TextComponent> {
    let get_str = |key: &str| -> Option<String> { map.get(key).and_then(Tag::as_str).map(str::to_string) };
    let get_bool = |key: &str| -> Option<bool> {
        match map.get(key) {
            Some(Tag::Byte(b)) => Some(*b != 0),
            _ => None,
        }
    };

    let content = if let Some(text) = get_str("text") {
        Content::Plain { text }
    } else if let Some(translate) = get_str("translate") {
        let with = match map.get("with") {
            Some(Tag::List(_, items)) => items.iter().map(unmarshal).collect::<Result<Vec<_>>>()?,
            _ => Vec::new(),
        };
        Content::Translate { translate, with }
    } else if let Some(keybind) = get_str("keybind") {
        Content::Keybind { keybind }
    } else if let Some(Tag::Compound(score)) = map.get("score") {
        let name = score
            .get("name")
            .and_then(Tag::as_str)
            .ok_or(Error::UnsupportedType("score.name"))?
            .to_string();
        let objective = score
            .get("objective")
            .and_then(Tag::as_str)
            .ok_or(Error::UnsupportedType("score.objective"))?
            .to_string();
        Content::Score {
            score: ScoreContent { name, objective },
        }
    } else if let Some(selector) = get_str("selector") {
        Content::Selector { selector }
    } else if let Some(path) = get_str("nbt") {
        let source = nbt_source_from_name(&get_str("source").unwrap_or_default())?;
        Content::Nbt {
            nbt: NbtContent { path, source },
            interpret: get_bool("interpret"),
        }
    } else {
        return Err(Error::UnsupportedType("TextComponent (no recognised content field)"));
    };

    let style = Style {
        color: get_str("color"),
        bold: get_bool("bold"),
        italic: get_bool("italic"),
        underlined: get_bool("underlined"),
        strikethrough: get_bool("strikethrough"),
        obfuscated: get_bool("obfuscated"),
        font: get_str("font"),
        insertion: get_str("insertion"),
    };

    let click_event = match map.get("clickEvent") {
        Some(Tag::Compound(c)) => {
            let action = match c.get("action").and_then(Tag::as_str).unwrap_or_default() {
                "open_url" => ClickAction::OpenUrl,
                "run_command" => ClickAction::RunCommand,
                "suggest_command" => ClickAction::SuggestCommand,
                "change_page" => ClickAction::ChangePage,
                "copy_to_clipboard" => ClickAction::CopyToClipboard,
                _ => return Err(Error::UnsupportedType("clickEvent.action")),
            };
            let value = c.get("value").and_then(Tag::as_str).unwrap_or_default().to_string();
            Some(ClickEvent { action, value })
        }
        _ => None,
    };

    let hover_event = match map.get("hoverEvent") {
        Some(Tag::Compound(h)) => {
            let action = match h.get("action").and_then(Tag::as_str).unwrap_or_default() {
                "show_text" => HoverAction::ShowText,
                "show_item" => HoverAction::ShowItem,
                "show_entity" => HoverAction::ShowEntity,
                _ => return Err(Error::UnsupportedType("hoverEvent.action")),
            };
            let contents = h
                .get("contents")
                .map(unmarshal)
                .transpose()?
                .ok_or(Error::UnsupportedType("hoverEvent.contents"))?;
            Some(HoverEvent {
                action,
                contents: Box::new(contents),
            })
        }
        _ => None,
    };

    let extra = match map.get("extra") {
        Some(Tag::List(_, items)) => items.iter().map(unmarshal).collect::<Result<Vec<_>>>()?,
        _ => Vec::new(),
    };

    Ok(TextComponent {
        content,
        style,
        click_event,
        hover_event,
        extra,
    })
}

pub fn encode(component: &TextComponent) -> Result<Vec<u8>> {
    let mut w = Writer::new();
    write_tag_network(&mut w, &marshal(component))?;
    Ok(w.finish())
}

pub fn decode(tag: &Tag) -> Result<TextComponent> {
    unmarshal(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Reader;
    use crate::nbt::{NbtLimits, TagType, read_tag_network};

    #[test]
    fn simple_text_encodes_as_bare_string() {
        let component = TextComponent::text("Hello");
        let bytes = encode(&component).unwrap();
        assert_eq!(bytes, [0x08, 0x00, 0x05, b'H', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn styled_text_encodes_as_compound_and_round_trips() {
        let component = TextComponent::text("Hello").with_color("red");
        let bytes = encode(&component).unwrap();
        assert_eq!(bytes[0], TagType::COMPOUND.0);

        let mut r = Reader::new(&bytes);
        let tag = read_tag_network(&mut r, NbtLimits::default()).unwrap();
        assert_eq!(decode(&tag).unwrap(), component);
    }

    #[test]
    fn extra_children_round_trip() {
        let component = TextComponent {
            extra: vec![TextComponent::text("!")],
            ..TextComponent::text("Hello")
        };
        let bytes = encode(&component).unwrap();
        let mut r = Reader::new(&bytes);
        let tag = read_tag_network(&mut r, NbtLimits::default()).unwrap();
        assert_eq!(decode(&tag).unwrap(), component);
    }
}
