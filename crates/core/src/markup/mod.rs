//! Inline rich-text markup.
//!
//! Stored text fields carry a small marker language produced by the editor
//! toolbar:
//!
//! ```text
//! [[size:large]]...[[/size:large]]     five fixed sizes
//! [[color:red]]...[[/color:red]]       13 named colors or any #hex value
//! [[red]]...[[/red]]                   named-color shorthand
//! **bold**  *italic*  {{first_name}}
//! ```
//!
//! Spans nest to arbitrary depth. Anything that does not form a matched
//! pair passes through as literal text; parsing never fails.

mod html;
mod lexer;
mod parser;
mod toolbar;

use serde::{Deserialize, Serialize};

use crate::substitution::RecipientData;

pub use html::{body_html, headline_html, inline_html, UNRESOLVED_TOKEN_CLASS};
pub use toolbar::{strip_markup, wrap_selection, Mark};

// ---------------------------------------------------------------------------
// Node tree
// ---------------------------------------------------------------------------

/// One styled node of an inline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Size { size: TextSize, children: Vec<Inline> },
    Color { color: Color, children: Vec<Inline> },
    /// A `{{name}}` token that no recipient value filled.
    Token(String),
    LineBreak,
}

/// A paragraph of a multi-paragraph body.
pub type Paragraph = Vec<Inline>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextSize {
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "large")]
    Large,
    #[serde(rename = "xlarge")]
    XLarge,
    #[serde(rename = "2xlarge")]
    XxLarge,
}

impl TextSize {
    pub const ALL: [TextSize; 5] = [
        TextSize::Small,
        TextSize::Medium,
        TextSize::Large,
        TextSize::XLarge,
        TextSize::XxLarge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TextSize::Small => "small",
            TextSize::Medium => "medium",
            TextSize::Large => "large",
            TextSize::XLarge => "xlarge",
            TextSize::XxLarge => "2xlarge",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Relative CSS font size.
    pub fn css(self) -> &'static str {
        match self {
            TextSize::Small => "0.875em",
            TextSize::Medium => "1em",
            TextSize::Large => "1.25em",
            TextSize::XLarge => "1.5em",
            TextSize::XxLarge => "2em",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Red,
    Orange,
    Amber,
    Yellow,
    Green,
    Teal,
    Blue,
    Indigo,
    Purple,
    Pink,
    Gray,
    Black,
    White,
}

impl NamedColor {
    pub const ALL: [NamedColor; 13] = [
        NamedColor::Red,
        NamedColor::Orange,
        NamedColor::Amber,
        NamedColor::Yellow,
        NamedColor::Green,
        NamedColor::Teal,
        NamedColor::Blue,
        NamedColor::Indigo,
        NamedColor::Purple,
        NamedColor::Pink,
        NamedColor::Gray,
        NamedColor::Black,
        NamedColor::White,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NamedColor::Red => "red",
            NamedColor::Orange => "orange",
            NamedColor::Amber => "amber",
            NamedColor::Yellow => "yellow",
            NamedColor::Green => "green",
            NamedColor::Teal => "teal",
            NamedColor::Blue => "blue",
            NamedColor::Indigo => "indigo",
            NamedColor::Purple => "purple",
            NamedColor::Pink => "pink",
            NamedColor::Gray => "gray",
            NamedColor::Black => "black",
            NamedColor::White => "white",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            NamedColor::Red => "#ef4444",
            NamedColor::Orange => "#f97316",
            NamedColor::Amber => "#f59e0b",
            NamedColor::Yellow => "#eab308",
            NamedColor::Green => "#22c55e",
            NamedColor::Teal => "#14b8a6",
            NamedColor::Blue => "#3b82f6",
            NamedColor::Indigo => "#6366f1",
            NamedColor::Purple => "#a855f7",
            NamedColor::Pink => "#ec4899",
            NamedColor::Gray => "#6b7280",
            NamedColor::Black => "#000000",
            NamedColor::White => "#ffffff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A span color: a palette entry or a validated, lowercased hex value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    Named(NamedColor),
    Hex(String),
}

impl Color {
    /// Parse a marker value: a palette name or `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(named) = NamedColor::parse(s) {
            return Some(Color::Named(named));
        }
        let digits = s.strip_prefix('#')?;
        let valid_len = matches!(digits.len(), 3 | 4 | 6 | 8);
        if valid_len && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Color::Hex(s.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// The value written inside `[[color:...]]`.
    pub fn marker_value(&self) -> &str {
        match self {
            Color::Named(named) => named.as_str(),
            Color::Hex(hex) => hex,
        }
    }

    pub fn css(&self) -> &str {
        match self {
            Color::Named(named) => named.hex(),
            Color::Hex(hex) => hex,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse `text` into an inline run without personalization.
pub fn parse(text: &str) -> Vec<Inline> {
    parse_with(text, None)
}

/// Parse `text`, resolving `{{tokens}}` present in `data` to literal text.
///
/// Resolution happens on the token stream before any span is formed, so a
/// recipient value is always plain text and can never open or close a span.
pub fn parse_with(text: &str, data: Option<&RecipientData>) -> Vec<Inline> {
    let tokens = lexer::tokenize(text);
    parser::parse(&tokens, data)
}

/// Single-line context: one flat inline run.
pub fn render_headline(text: &str, data: Option<&RecipientData>) -> Vec<Inline> {
    parse_with(text, data)
}

/// Multi-paragraph context: blank lines split paragraphs, single newlines
/// become [`Inline::LineBreak`].
pub fn render_body(text: &str, data: Option<&RecipientData>) -> Vec<Paragraph> {
    split_paragraphs(text)
        .into_iter()
        .map(|p| split_line_breaks(parse_with(p.trim_matches('\n'), data)))
        .collect()
}

/// Concatenated text of a run, markers removed, unresolved tokens kept as `{{name}}`.
pub fn text_content(nodes: &[Inline]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    out
}

fn collect_text(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(t) => out.push_str(t),
            Inline::Bold(children)
            | Inline::Italic(children)
            | Inline::Size { children, .. }
            | Inline::Color { children, .. } => collect_text(children, out),
            Inline::Token(name) => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
            Inline::LineBreak => out.push('\n'),
        }
    }
}

fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut line_start = 0;
    let mut prev_blank = false;

    // Walk line by line; a whitespace-only line ends the current paragraph.
    for (idx, ch) in text.char_indices().chain(std::iter::once((text.len(), '\n'))) {
        if ch != '\n' {
            continue;
        }
        let line = &text[line_start..idx];
        let blank = line.trim().is_empty();
        if blank && !prev_blank {
            paragraphs.push(&text[start..line_start]);
        }
        if blank {
            start = (idx + 1).min(text.len());
        }
        prev_blank = blank;
        line_start = (idx + 1).min(text.len());
    }
    if start < text.len() {
        paragraphs.push(&text[start..]);
    }

    paragraphs
        .into_iter()
        .map(|p| p.trim_end_matches(['\n', '\r']))
        .filter(|p| !p.trim().is_empty())
        .collect()
}

fn split_line_breaks(nodes: Vec<Inline>) -> Vec<Inline> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Text(text) => {
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        out.push(Inline::LineBreak);
                    }
                    let line = line.strip_suffix('\r').unwrap_or(line);
                    if !line.is_empty() {
                        out.push(Inline::Text(line.to_string()));
                    }
                }
            }
            Inline::Bold(children) => out.push(Inline::Bold(split_line_breaks(children))),
            Inline::Italic(children) => out.push(Inline::Italic(split_line_breaks(children))),
            Inline::Size { size, children } => out.push(Inline::Size {
                size,
                children: split_line_breaks(children),
            }),
            Inline::Color { color, children } => out.push(Inline::Color {
                color,
                children: split_line_breaks(children),
            }),
            other => out.push(other),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn plain_text_round_trips() {
        for s in [
            "",
            "Hello world",
            "Price: $40 / month (billed yearly)",
            "brackets [ ] and braces { } alone",
            "emoji 🚀 and accents café",
            "line one\nline two",
        ] {
            let nodes = parse(s);
            assert_eq!(text_content(&nodes), s);
            assert!(nodes.iter().all(|n| matches!(n, Inline::Text(_))));
        }
    }

    #[test]
    fn color_wrapping_bold_applies_both() {
        let nodes = parse("[[color:red]]**bold red**[[/color:red]]");
        assert_eq!(
            nodes,
            vec![Inline::Color {
                color: Color::Named(NamedColor::Red),
                children: vec![Inline::Bold(vec![text("bold red")])],
            }]
        );
    }

    #[test]
    fn named_shorthand_and_hex_colors() {
        let nodes = parse("[[blue]]a[[/blue]] [[color:#FF0000]]b[[/color:#ff0000]]");
        assert_eq!(
            nodes,
            vec![
                Inline::Color {
                    color: Color::Named(NamedColor::Blue),
                    children: vec![text("a")],
                },
                text(" "),
                Inline::Color {
                    color: Color::Hex("#ff0000".into()),
                    children: vec![text("b")],
                },
            ]
        );
    }

    #[test]
    fn sizes_nest_with_colors() {
        let nodes = parse("[[size:xlarge]]big [[green]]go[[/green]][[/size:xlarge]]");
        assert_eq!(
            nodes,
            vec![Inline::Size {
                size: TextSize::XLarge,
                children: vec![
                    text("big "),
                    Inline::Color {
                        color: Color::Named(NamedColor::Green),
                        children: vec![text("go")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn same_kind_spans_nest_by_depth() {
        let nodes = parse("[[red]]a[[red]]b[[/red]]c[[/red]]");
        let Inline::Color { children, .. } = &nodes[0] else {
            panic!("expected color span, got {nodes:?}");
        };
        assert_eq!(children.len(), 3);
        assert_eq!(text_content(&nodes), "abc");
    }

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            parse("a **b** *c*"),
            vec![
                text("a "),
                Inline::Bold(vec![text("b")]),
                text(" "),
                Inline::Italic(vec![text("c")]),
            ]
        );
        assert_eq!(
            parse("***both***"),
            vec![Inline::Bold(vec![Inline::Italic(vec![text("both")])])]
        );
    }

    #[test]
    fn unmatched_markers_stay_literal() {
        for s in [
            "**unclosed bold",
            "lonely * star",
            "[[color:red]]never closed",
            "[[/color:red]] stray close",
            "[[size:huge]]bad size[[/size:huge]]",
            "[[color:notacolor]]x[[/color:notacolor]]",
            "[[red]]mismatch[[/blue]]",
            "[[",
            "]]",
            "{{",
            "****",
            "[[red]][[/red]]",
        ] {
            let nodes = parse(s);
            assert_eq!(text_content(&nodes), s, "input: {s}");
        }
    }

    #[test]
    fn unresolved_tokens_become_token_nodes() {
        let nodes = parse("Hi {{first_name}}!");
        assert_eq!(
            nodes,
            vec![text("Hi "), Inline::Token("first_name".into()), text("!")]
        );
    }

    #[test]
    fn resolved_tokens_cannot_inject_markup() {
        let mut data = RecipientData::new();
        data.insert("first_name".into(), "**Ann**".into());
        data.insert("company".into(), String::new());
        let nodes = parse_with("**Hi** {{first_name}}{{company}} {{other}}", Some(&data));
        assert_eq!(
            nodes,
            vec![
                Inline::Bold(vec![text("Hi")]),
                text(" **Ann** "),
                Inline::Token("other".into()),
            ]
        );
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let depth = 5_000;
        let s = format!("{}x{}", "[[red]]".repeat(depth), "[[/red]]".repeat(depth));
        let nodes = parse(&s);
        assert!(text_content(&nodes).contains('x'));
    }

    #[test]
    fn stray_marker_floods_stay_literal() {
        let openers = "[[".repeat(50_000);
        assert_eq!(parse(&openers), vec![text(&openers)]);

        let unclosed = "[[red]]".repeat(40_000);
        assert_eq!(parse(&unclosed), vec![text(&unclosed)]);

        let inner = "[[blue]]".repeat(20_000);
        let nodes = parse(&format!("a*{inner}*"));
        assert_eq!(nodes, vec![text("a"), Inline::Italic(vec![text(&inner)])]);
    }

    #[test]
    fn body_splits_paragraphs_and_line_breaks() {
        let paragraphs = render_body("first\nsecond\n\n  \n\nthird **bold\nwrap**", None);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(
            paragraphs[0],
            vec![text("first"), Inline::LineBreak, text("second")]
        );
        assert_eq!(
            paragraphs[1],
            vec![
                text("third "),
                Inline::Bold(vec![text("bold"), Inline::LineBreak, text("wrap")]),
            ]
        );
    }

    #[test]
    fn body_handles_crlf_and_empty_input() {
        assert!(render_body("", None).is_empty());
        assert!(render_body("\n\n  \n", None).is_empty());
        let paragraphs = render_body("a\r\nb\r\n\r\nc", None);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0], vec![text("a"), Inline::LineBreak, text("b")]);
        assert_eq!(paragraphs[1], vec![text("c")]);
    }

    #[test]
    fn color_parse_rules() {
        assert_eq!(Color::parse("teal"), Some(Color::Named(NamedColor::Teal)));
        assert_eq!(Color::parse("#AbC"), Some(Color::Hex("#abc".into())));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#ggg"), None);
        assert_eq!(Color::parse("Red"), None);
        assert_eq!(NamedColor::ALL.len(), 13);
    }
}
