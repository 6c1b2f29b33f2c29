//! services/api/src/render/mod.rs
//!
//! Pure presentational templates. Each surface takes a member record plus
//! the organization assets and produces a standalone SVG string for the
//! export pipeline; nothing here touches storage or the network.

pub mod application;
pub mod id_card;
pub mod letter;

pub use application::application_form_svg;
pub use id_card::id_card_svg;
pub use letter::letter_svg;

/// Escapes the XML-reserved characters for use in text nodes and attributes.
pub(crate) fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Greedy word wrap. A single word longer than the limit keeps its own line.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
