//! Text component (C7): tagged content + style + events, with dual NBT/JSON
//! encoding and a family of renderers.

pub mod json_codec;
pub mod nbt_codec;
pub mod render;

use serde::{Deserialize, Serialize};

/// The tagged content a [`TextComponent`] carries. At most one of these is
/// ever set on a given component (§4.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Plain {
        text: String,
    },
    Translate {
        translate: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        with:      Vec<TextComponent>,
    },
    Keybind {
        keybind: String,
    },
    Score {
        score: ScoreContent,
    },
    Selector {
        selector: String,
    },
    Nbt {
        nbt:   NbtContent,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        interpret: Option<bool>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContent {
    pub name:      String,
    pub objective: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NbtSource {
    Block,
    Entity,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NbtContent {
    pub path:   String,
    pub source: NbtSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    OpenUrl,
    RunCommand,
    SuggestCommand,
    ChangePage,
    CopyToClipboard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub action: ClickAction,
    pub value:  String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverAction {
    ShowText,
    ShowItem,
    ShowEntity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverEvent {
    pub action:  HoverAction,
    pub contents: Box<TextComponent>,
}

/// Text styling, every field optional (§3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion: Option<String>,
}

impl Style {
    fn is_empty(&self) -> bool {
        self == &Style::default()
    }
}

/// A Minecraft text component: content plus style, events, translation
/// arguments, and children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextComponent {
    #[serde(flatten)]
    pub content: Content,
    #[serde(flatten, default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_event: Option<ClickEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_event: Option<HoverEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<TextComponent>,
}

impl TextComponent {
    pub fn text(s: impl Into<String>) -> Self {
        Self {
            content: Content::Plain { text: s.into() },
            style: Style::default(),
            click_event: None,
            hover_event: None,
            extra: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.style.color = Some(color.into());
        self
    }

    /// A component is *simple* iff its content is bare plain text and it
    /// carries no style, events, translation args, or children (§4.7).
    pub fn is_simple(&self) -> bool {
        matches!(&self.content, Content::Plain { text } if !text.is_empty())
            && self.style.is_empty()
            && self.click_event.is_none()
            && self.hover_event.is_none()
            && self.extra.is_empty()
    }

    pub(crate) fn plain_text(&self) -> &str {
        match &self.content {
            Content::Plain { text } => text,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_detects_bare_plain_text_only() {
        let plain = TextComponent::text("Hello");
        assert!(plain.is_simple());

        let colored = TextComponent::text("Hello").with_color("red");
        assert!(!colored.is_simple());

        let with_child = TextComponent {
            extra: vec![TextComponent::text("!")],
            ..TextComponent::text("Hello")
        };
        assert!(!with_child.is_simple());
    }
}
