//! Single left-to-right pass turning stored text into marker tokens.
//!
//! Every token keeps the exact source slice it came from so the parser can
//! fall back to literal text without losing a character.

use std::sync::LazyLock;

use regex::Regex;

use super::{Color, TextSize};

static VAR_AT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{(\w+)\}\}").expect("valid regex"));

/// Longest `[[...]]` body worth inspecting; longer runs are plain text.
const MAX_MARKER_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum SpanKind {
    Size(TextSize),
    Color(Color),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Tok<'a> {
    Text(&'a str),
    Open { kind: SpanKind, raw: &'a str },
    Close { kind: SpanKind, raw: &'a str },
    Strong(&'a str),
    Emph(&'a str),
    Var { name: &'a str, raw: &'a str },
}

impl<'a> Tok<'a> {
    /// Source text of the token, used when it ends up unmatched.
    pub(super) fn raw(&self) -> &'a str {
        match self {
            Tok::Text(raw)
            | Tok::Strong(raw)
            | Tok::Emph(raw)
            | Tok::Open { raw, .. }
            | Tok::Close { raw, .. }
            | Tok::Var { raw, .. } => raw,
        }
    }
}

pub(super) fn tokenize(input: &str) -> Vec<Tok<'_>> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'[' if bytes.get(pos + 1) == Some(&b'[') => {
                if let Some((tok, len)) = lex_marker(&input[pos..]) {
                    flush(&mut tokens, input, text_start, pos);
                    tokens.push(tok);
                    pos += len;
                    text_start = pos;
                } else {
                    pos += 1;
                }
            }
            b'{' if bytes.get(pos + 1) == Some(&b'{') => {
                if let Some(caps) = VAR_AT_START.captures(&input[pos..]) {
                    let raw_len = caps[0].len();
                    let name_len = caps[1].len();
                    flush(&mut tokens, input, text_start, pos);
                    tokens.push(Tok::Var {
                        name: &input[pos + 2..pos + 2 + name_len],
                        raw: &input[pos..pos + raw_len],
                    });
                    pos += raw_len;
                    text_start = pos;
                } else {
                    pos += 1;
                }
            }
            b'*' => {
                flush(&mut tokens, input, text_start, pos);
                let run = bytes[pos..].iter().take_while(|&&b| b == b'*').count();
                push_star_run(&mut tokens, input, pos, run);
                pos += run;
                text_start = pos;
            }
            _ => pos += 1,
        }
    }
    flush(&mut tokens, input, text_start, bytes.len());
    tokens
}

fn flush<'a>(tokens: &mut Vec<Tok<'a>>, input: &'a str, from: usize, to: usize) {
    if from < to {
        tokens.push(Tok::Text(&input[from..to]));
    }
}

/// Lex `[[...]]` at the start of `s`. Returns the token and its byte length.
fn lex_marker(s: &str) -> Option<(Tok<'_>, usize)> {
    let window = &s.as_bytes()[2..s.len().min(MAX_MARKER_LEN + 4)];
    let body_end = window.windows(2).position(|w| w == b"]]")? + 2;
    let body = &s[2..body_end];
    if body.is_empty() || body.contains('[') {
        return None;
    }
    let raw = &s[..body_end + 2];
    let tok = match body.strip_prefix('/') {
        Some(value) => Tok::Close {
            kind: span_kind(value)?,
            raw,
        },
        None => Tok::Open {
            kind: span_kind(body)?,
            raw,
        },
    };
    Some((tok, raw.len()))
}

fn span_kind(body: &str) -> Option<SpanKind> {
    if let Some(size) = body.strip_prefix("size:") {
        return TextSize::parse(size).map(SpanKind::Size);
    }
    if let Some(color) = body.strip_prefix("color:") {
        return Color::parse(color).map(SpanKind::Color);
    }
    super::NamedColor::parse(body).map(|named| SpanKind::Color(Color::Named(named)))
}

/// Split a run of `*` into strong/emphasis delimiters.
///
/// An odd run puts the single `*` innermost: after `**` when the run opens a
/// span, before it when the run closes one (preceded by a non-space and not
/// followed by a word character).
fn push_star_run<'a>(tokens: &mut Vec<Tok<'a>>, input: &'a str, start: usize, run: usize) {
    let closing = {
        let before = input[..start].chars().next_back();
        let after = input[start + run..].chars().next();
        before.is_some_and(|c| !c.is_whitespace())
            && !after.is_some_and(|c| c.is_alphanumeric())
    };

    let mut pos = start;
    let push_strongs = |tokens: &mut Vec<Tok<'a>>, pos: &mut usize| {
        for _ in 0..run / 2 {
            tokens.push(Tok::Strong(&input[*pos..*pos + 2]));
            *pos += 2;
        }
    };

    if run % 2 == 1 && closing {
        tokens.push(Tok::Emph(&input[pos..pos + 1]));
        pos += 1;
        push_strongs(tokens, &mut pos);
    } else {
        push_strongs(tokens, &mut pos);
        if run % 2 == 1 {
            tokens.push(Tok::Emph(&input[pos..pos + 1]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_slices_cover_the_input() {
        for s in [
            "plain",
            "**a** *b* [[red]]c[[/red]] {{d}}",
            "[[bogus]] [[ [[size:small]] {{ x }} ***",
            "ünïcödé [[color:#abc]]ok[[/color:#abc]]",
        ] {
            let joined: String = tokenize(s).iter().map(Tok::raw).collect();
            assert_eq!(joined, s);
        }
    }

    #[test]
    fn markers_are_classified() {
        let toks = tokenize("[[size:2xlarge]]x[[/size:2xlarge]]");
        assert_eq!(
            toks,
            vec![
                Tok::Open {
                    kind: SpanKind::Size(TextSize::XxLarge),
                    raw: "[[size:2xlarge]]",
                },
                Tok::Text("x"),
                Tok::Close {
                    kind: SpanKind::Size(TextSize::XxLarge),
                    raw: "[[/size:2xlarge]]",
                },
            ]
        );
    }

    #[test]
    fn overlong_marker_bodies_are_text() {
        let long = format!("[[{}]]", "r".repeat(MAX_MARKER_LEN + 1));
        assert_eq!(tokenize(&long), vec![Tok::Text(long.as_str())]);
    }

    #[test]
    fn unknown_markers_are_text() {
        assert_eq!(tokenize("[[hello]]"), vec![Tok::Text("[[hello]]")]);
    }

    #[test]
    fn triple_star_orders_by_position() {
        let toks = tokenize("***x***");
        let kinds: Vec<&str> = toks
            .iter()
            .map(|t| match t {
                Tok::Strong(_) => "S",
                Tok::Emph(_) => "E",
                _ => "T",
            })
            .collect();
        assert_eq!(kinds, vec!["S", "E", "T", "E", "S"]);
    }

    #[test]
    fn variables_capture_name() {
        assert_eq!(
            tokenize("{{first_name}}"),
            vec![Tok::Var {
                name: "first_name",
                raw: "{{first_name}}",
            }]
        );
    }
}
