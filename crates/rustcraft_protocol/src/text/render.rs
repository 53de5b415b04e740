//! Renderers (§4.7): plain text, ANSI terminal escapes, legacy `§` color
//! codes, and MiniMessage tags.

use crate::text::{Content, TextComponent};

fn named_color_ansi(name: &str) -> Option<&'static str> {
    Some(match name {
        "black" => "30",
        "dark_blue" => "34",
        "dark_green" => "32",
        "dark_aqua" => "36",
        "dark_red" => "31",
        "dark_purple" => "35",
        "gold" => "33",
        "gray" => "37",
        "dark_gray" => "90",
        "blue" => "94",
        "green" => "92",
        "aqua" => "96",
        "red" => "91",
        "light_purple" => "95",
        "yellow" => "93",
        "white" => "97",
        _ => return None,
    })
}

fn named_color_code(name: &str) -> Option<char> {
    Some(match name {
        "black" => '0',
        "dark_blue" => '1',
        "dark_green" => '2',
        "dark_aqua" => '3',
        "dark_red" => '4',
        "dark_purple" => '5',
        "gold" => '6',
        "gray" => '7',
        "dark_gray" => '8',
        "blue" => '9',
        "green" => 'a',
        "aqua" => 'b',
        "red" => 'c',
        "light_purple" => 'd',
        "yellow" => 'e',
        "white" => 'f',
        _ => return None,
    })
}

/// Concatenates each component's own text with its children's, ignoring
/// all style and events.
pub fn plain(component: &TextComponent) -> String {
    let mut out = String::new();
    write_plain(component, &mut out);
    out
}

fn write_plain(component: &TextComponent, out: &mut String) {
    match &component.content {
        Content::Plain { text } => out.push_str(text),
        Content::Translate { translate, with } => {
            out.push_str(translate);
            for arg in with {
                write_plain(arg, out);
            }
        }
        Content::Keybind { keybind } => out.push_str(keybind),
        Content::Score { score } => out.push_str(&score.name),
        Content::Selector { selector } => out.push_str(selector),
        Content::Nbt { nbt, .. } => out.push_str(&nbt.path),
    }
    for child in &component.extra {
        write_plain(child, out);
    }
}

/// Renders with ANSI escapes: named colors and the bold/italic/underline/
/// strikethrough/obfuscated style codes; a `#rrggbb` color emits 24-bit ANSI.
pub fn ansi(component: &TextComponent) -> String {
    let mut out = String::new();
    write_ansi(component, &mut out, false);
    out
}

fn write_ansi(component: &TextComponent, out: &mut String, parent_styled: bool) {
    let style = &component.style;
    let styled = parent_styled || !style.is_empty();
    if styled {
        out.push_str("\x1b[0m");
    }

    if let Some(color) = &style.color {
        if let Some(hex) = color.strip_prefix('#') {
            if let Ok(rgb) = u32::from_str_radix(hex, 16) {
                let (r, g, b) = ((rgb >> 16) & 0xff, (rgb >> 8) & 0xff, rgb & 0xff);
                out.push_str(&format!("\x1b[38;2;{r};{g};{b}m"));
            }
        } else if let Some(code) = named_color_ansi(color) {
            out.push_str(&format!("\x1b[{code}m"));
        }
    }
    if style.bold == Some(true) {
        out.push_str("\x1b[1m");
    }
    if style.italic == Some(true) {
        out.push_str("\x1b[3m");
    }
    if style.underlined == Some(true) {
        out.push_str("\x1b[4m");
    }
    if style.strikethrough == Some(true) {
        out.push_str("\x1b[9m");
    }
    if style.obfuscated == Some(true) {
        out.push_str("\x1b[8m");
    }

    match &component.content {
        Content::Plain { text } => out.push_str(text),
        Content::Translate { translate, with } => {
            out.push_str(translate);
            for arg in with {
                write_ansi(arg, out, styled);
            }
        }
        Content::Keybind { keybind } => out.push_str(keybind),
        Content::Score { score } => out.push_str(&score.name),
        Content::Selector { selector } => out.push_str(selector),
        Content::Nbt { nbt, .. } => out.push_str(&nbt.path),
    }

    for child in &component.extra {
        write_ansi(child, out, styled);
    }
    if styled {
        out.push_str("\x1b[0m");
    }
}

/// Renders with legacy `§` formatting codes.
pub fn color_codes(component: &TextComponent) -> String {
    let mut out = String::new();
    write_color_codes(component, &mut out);
    out
}

fn write_color_codes(component: &TextComponent, out: &mut String) {
    let style = &component.style;
    if let Some(color) = &style.color {
        if let Some(code) = named_color_code(color) {
            out.push('§');
            out.push(code);
        }
    }
    if style.bold == Some(true) {
        out.push_str("§l");
    }
    if style.italic == Some(true) {
        out.push_str("§o");
    }
    if style.underlined == Some(true) {
        out.push_str("§n");
    }
    if style.strikethrough == Some(true) {
        out.push_str("§m");
    }
    if style.obfuscated == Some(true) {
        out.push_str("§k");
    }

    out.push_str(component.plain_text());
    match &component.content {
        Content::Translate { translate, .. } => out.push_str(translate),
        Content::Keybind { keybind } => out.push_str(keybind),
        Content::Score { score } => out.push_str(&score.name),
        Content::Selector { selector } => out.push_str(selector),
        Content::Nbt { nbt, .. } => out.push_str(&nbt.path),
        Content::Plain { .. } => {}
    }

    for child in &component.extra {
        write_color_codes(child, out);
    }
}

/// Renders as MiniMessage-style tags, closing each opened tag in reverse.
pub fn mini_message(component: &TextComponent) -> String {
    let mut out = String::new();
    write_mini_message(component, &mut out);
    out
}

fn write_mini_message(component: &TextComponent, out: &mut String) {
    let mut opened: Vec<String> = Vec::new();
    let style = &component.style;
    if let Some(color) = &style.color {
        opened.push(format!("<{color}>"));
    }
    if style.bold == Some(true) {
        opened.push("<bold>".to_string());
    }
    if style.italic == Some(true) {
        opened.push("<italic>".to_string());
    }
    if style.underlined == Some(true) {
        opened.push("<underlined>".to_string());
    }
    if style.strikethrough == Some(true) {
        opened.push("<strikethrough>".to_string());
    }
    if style.obfuscated == Some(true) {
        opened.push("<obfuscated>".to_string());
    }

    for tag in &opened {
        out.push_str(tag);
    }

    match &component.content {
        Content::Plain { text } => out.push_str(text),
        Content::Translate { translate, with } => {
            out.push_str("<lang:");
            out.push_str(translate);
            for arg in with {
                out.push(':');
                write_mini_message(arg, out);
            }
            out.push('>');
        }
        Content::Keybind { keybind } => {
            out.push_str("<key:");
            out.push_str(keybind);
            out.push('>');
        }
        Content::Score { score } => out.push_str(&score.name),
        Content::Selector { selector } => out.push_str(selector),
        Content::Nbt { nbt, .. } => out.push_str(&nbt.path),
    }

    for child in &component.extra {
        write_mini_message(child, out);
    }

    for tag in opened.iter().rev() {
        let name = tag.trim_start_matches('<').trim_end_matches('>');
        out.push_str(&format!("</{name}>"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextComponent;

    #[test]
    fn plain_concatenates_text_and_children() {
        let component = TextComponent {
            extra: vec![TextComponent::text(" world")],
            ..TextComponent::text("Hello")
        };
        assert_eq!(plain(&component), "Hello world");
    }

    #[test]
    fn color_codes_prefixes_legacy_section_sign() {
        let component = TextComponent::text("Hello").with_color("red");
        assert_eq!(color_codes(&component), "§cHello");
    }

    #[test]
    fn ansi_emits_24bit_escape_for_hex_color() {
        let component = TextComponent::text("Hi").with_color("#ff0000");
        let rendered = ansi(&component);
        assert!(rendered.contains("\x1b[38;2;255;0;0m"));
    }

    #[test]
    fn mini_message_closes_tags_in_reverse_order() {
        let mut component = TextComponent::text("Hi").with_color("red");
        component.style.bold = Some(true);
        let rendered = mini_message(&component);
        assert_eq!(rendered, "<red><bold>Hi</bold></red>");
    }
}
