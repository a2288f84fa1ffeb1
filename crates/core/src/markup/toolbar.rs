//! Editor toolbar actions that produce the stored marker encoding.

use serde::{Deserialize, Serialize};

use super::{parse, text_content, Color, TextSize};

/// A formatting action applied to a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mark", content = "value", rename_all = "camelCase")]
pub enum Mark {
    Bold,
    Italic,
    Size(TextSize),
    /// Palette name or `#hex`; rejected values leave the text unchanged.
    Color(String),
}

impl Mark {
    fn markers(&self) -> Option<(String, String)> {
        match self {
            Mark::Bold => Some(("**".into(), "**".into())),
            Mark::Italic => Some(("*".into(), "*".into())),
            Mark::Size(size) => Some((
                format!("[[size:{}]]", size.as_str()),
                format!("[[/size:{}]]", size.as_str()),
            )),
            Mark::Color(value) => {
                let color = Color::parse(value)?;
                let value = color.marker_value();
                Some((format!("[[color:{value}]]"), format!("[[/color:{value}]]")))
            }
        }
    }
}

/// Wrap the char range `start..end` of `text` in `mark`'s markers.
///
/// Offsets count chars, are clamped to the text, and may be given in either
/// order. An empty range or an invalid color returns the text unchanged.
pub fn wrap_selection(text: &str, start: usize, end: usize, mark: &Mark) -> String {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let len = text.chars().count();
    let (start, end) = (start.min(len), end.min(len));
    if start == end {
        return text.to_string();
    }
    let Some((open, close)) = mark.markers() else {
        return text.to_string();
    };

    let byte_at = |char_idx: usize| {
        text.char_indices()
            .nth(char_idx)
            .map_or(text.len(), |(i, _)| i)
    };
    let (a, b) = (byte_at(start), byte_at(end));

    let mut out = String::with_capacity(text.len() + open.len() + close.len());
    out.push_str(&text[..a]);
    out.push_str(&open);
    out.push_str(&text[a..b]);
    out.push_str(&close);
    out.push_str(&text[b..]);
    out
}

/// Remove every matched formatting marker, keeping text and `{{tokens}}`.
pub fn strip_markup(text: &str) -> String {
    text_content(&parse(text))
}
