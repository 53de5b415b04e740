//! JSON parity for [`TextComponent`]: parsing accepts either a bare string
//! or an object; marshalling always emits an object (Adventure convention).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::text::TextComponent;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrComponent {
    Str(String),
    Component(TextComponent),
}

pub fn from_json(s: &str) -> Result<TextComponent> {
    let value: StringOrComponent =
        serde_json::from_str(s).map_err(|_| Error::UnsupportedType("TextComponent (invalid JSON)"))?;
    Ok(match value {
        StringOrComponent::Str(text) => TextComponent::text(text),
        StringOrComponent::Component(c) => c,
    })
}

pub fn to_json(component: &TextComponent) -> String {
    // `TextComponent` always serialises as an object; `to_json` never
    // takes the bare-string shortcut `from_json` accepts on the way in.
    serde_json::to_string(component).expect("TextComponent serialises without error")
}

pub fn to_json_value(component: &TextComponent) -> Value {
    serde_json::to_value(component).expect("TextComponent serialises without error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_string_parses_as_plain_text() {
        let parsed = from_json("\"Hello\"").unwrap();
        assert_eq!(parsed, TextComponent::text("Hello"));
    }

    #[test]
    fn object_round_trips_through_json() {
        let original = TextComponent::text("Hello").with_color("red");
        let json = to_json(&original);
        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn marshalling_always_emits_an_object_not_a_bare_string() {
        let plain = TextComponent::text("Hello");
        let value = to_json_value(&plain);
        assert!(value.is_object());
    }
}
