//! Recursive descent over the lexer's token stream.

use std::collections::HashMap;
use std::ops::Range;

use super::lexer::{SpanKind, Tok};
use super::Inline;
use crate::substitution::RecipientData;

/// Spans nested deeper than this are emitted as literal text.
const MAX_DEPTH: usize = 32;

pub(super) fn parse(tokens: &[Tok<'_>], data: Option<&RecipientData>) -> Vec<Inline> {
    let partners = pair_tokens(tokens);
    parse_run(tokens, &partners, 0..tokens.len(), data, 0)
}

fn parse_run(
    tokens: &[Tok<'_>],
    partners: &[Option<usize>],
    range: Range<usize>,
    data: Option<&RecipientData>,
    depth: usize,
) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut i = range.start;

    while i < range.end {
        let tok = &tokens[i];
        let nested = depth < MAX_DEPTH;

        let matched = match tok {
            Tok::Text(text) => {
                push_text(&mut out, text);
                i += 1;
                continue;
            }
            Tok::Var { name, .. } => {
                match data.and_then(|d| d.get(*name)) {
                    Some(value) => push_text(&mut out, value),
                    None => out.push(Inline::Token((*name).to_string())),
                }
                i += 1;
                continue;
            }
            Tok::Open { .. } | Tok::Strong(_) | Tok::Emph(_) if nested => {
                partners[i].filter(|&end| end < range.end)
            }
            _ => None,
        };

        match matched {
            Some(end) if end > i + 1 => {
                let children = parse_run(tokens, partners, i + 1..end, data, depth + 1);
                out.push(wrap(tok, children));
                i = end + 1;
            }
            _ => {
                push_text(&mut out, tok.raw());
                i += 1;
            }
        }
    }

    out
}

/// For each opener, the index of the token that would close it.
///
/// Span markers balance per kind, so an opener pairs with the close that
/// empties its kind's stack. Star delimiters pair with the next delimiter of
/// the same width.
fn pair_tokens(tokens: &[Tok<'_>]) -> Vec<Option<usize>> {
    let mut partners = vec![None; tokens.len()];
    let mut open: HashMap<&SpanKind, Vec<usize>> = HashMap::new();
    let mut next_strong = None;
    let mut next_emph = None;

    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Tok::Open { kind, .. } => open.entry(kind).or_default().push(i),
            Tok::Close { kind, .. } => {
                if let Some(opener) = open.get_mut(kind).and_then(Vec::pop) {
                    partners[opener] = Some(i);
                }
            }
            _ => {}
        }
    }
    for (i, tok) in tokens.iter().enumerate().rev() {
        match tok {
            Tok::Strong(_) => {
                partners[i] = next_strong;
                next_strong = Some(i);
            }
            Tok::Emph(_) => {
                partners[i] = next_emph;
                next_emph = Some(i);
            }
            _ => {}
        }
    }
    partners
}

fn wrap(opener: &Tok<'_>, children: Vec<Inline>) -> Inline {
    match opener {
        Tok::Open {
            kind: SpanKind::Size(size),
            ..
        } => Inline::Size {
            size: *size,
            children,
        },
        Tok::Open {
            kind: SpanKind::Color(color),
            ..
        } => Inline::Color {
            color: color.clone(),
            children,
        },
        Tok::Emph(_) => Inline::Italic(children),
        _ => Inline::Bold(children),
    }
}

/// Append text, merging with a preceding text node.
fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Inline::Text(text.to_string()));
    }
}
