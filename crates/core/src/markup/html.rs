use std::fmt::Write;

use super::{render_body, render_headline, Inline};
use crate::substitution::RecipientData;

/// CSS class carried by unfilled `{{token}}` spans.
pub const UNRESOLVED_TOKEN_CLASS: &str = "pc-token";

/// Write an inline run as HTML.
pub fn inline_html(nodes: &[Inline]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_inlines(&mut out, nodes);
    out
}

/// Headline text, personalized then formatted, as one inline HTML run.
pub fn headline_html(text: &str, data: Option<&RecipientData>) -> String {
    inline_html(&render_headline(text, data))
}

/// Body text as a sequence of `<p>` elements.
pub fn body_html(text: &str, data: Option<&RecipientData>) -> String {
    let mut out = String::new();
    for paragraph in render_body(text, data) {
        out.push_str("<p>");
        let _ = write_inlines(&mut out, &paragraph);
        out.push_str("</p>");
    }
    out
}

fn write_inlines(out: &mut String, nodes: &[Inline]) -> std::fmt::Result {
    for node in nodes {
        match node {
            Inline::Text(text) => {
                html_escape::encode_text_to_string(text, out);
            }
            Inline::Bold(children) => {
                out.push_str("<strong>");
                write_inlines(out, children)?;
                out.push_str("</strong>");
            }
            Inline::Italic(children) => {
                out.push_str("<em>");
                write_inlines(out, children)?;
                out.push_str("</em>");
            }
            Inline::Size { size, children } => {
                write!(out, "<span style=\"font-size:{}\">", size.css())?;
                write_inlines(out, children)?;
                out.push_str("</span>");
            }
            Inline::Color { color, children } => {
                write!(out, "<span style=\"color:{}\">", color.css())?;
                write_inlines(out, children)?;
                out.push_str("</span>");
            }
            Inline::Token(name) => {
                write!(
                    out,
                    "<span class=\"{UNRESOLVED_TOKEN_CLASS}\" title=\"Unfilled variable\">{{{{{}}}}}</span>",
                    html_escape::encode_text(name)
                )?;
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
    Ok(())
}
