//! Full HTML documents around rendered sections.

use std::fmt::Write;

use super::{render_section, RenderOptions};
use crate::markup::strip_markup;
use crate::section::{Section, SectionId};
use crate::substitution::substitute_opt;

/// Base stylesheet shared by every generated page.
pub const PAGE_STYLES: &str = "\
*{box-sizing:border-box}\
body{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;line-height:1.6}\
h1,h2,h3{line-height:1.2;margin:0 0 .5em}\
img,video,iframe{max-width:100%}\
.pc-inner{width:100%}\
.pc-badge{position:absolute;top:0;left:0;background:#6366f1;color:#fff;font-size:12px;padding:2px 8px}\
.pc-subheading{opacity:.8;font-size:1.125rem}\
.pc-actions{display:flex;gap:12px;justify-content:center;flex-wrap:wrap;margin-top:24px}\
.pc-button{display:inline-block;padding:12px 24px;text-decoration:none;font-weight:600;border:0;cursor:pointer}\
.pc-placeholder{border:2px dashed #d1d5db;color:#6b7280;padding:32px;border-radius:8px}\
.pc-token{background:#eef2ff;color:#4338ca;border-radius:4px;padding:0 4px}\
.pc-video-frame{position:relative;padding-top:56.25%;overflow:hidden}\
.pc-video-frame iframe{position:absolute;inset:0;width:100%;height:100%}\
.pc-split{display:grid;grid-template-columns:1fr 1fr;gap:48px;align-items:center}\
.pc-split-reverse .pc-split-text{order:2}\
.pc-card{background:rgba(127,127,127,.06);border-radius:8px;padding:24px;text-align:left}\
.pc-form,.pc-newsletter{display:flex;flex-direction:column;gap:12px;max-width:480px;margin:0 auto}\
.pc-field{display:flex;flex-direction:column;text-align:left;gap:4px}\
.pc-field input,.pc-field textarea,.pc-newsletter input{padding:10px;border:1px solid #d1d5db;border-radius:6px}\
.pc-countdown{display:flex;gap:16px;justify-content:center}\
.pc-countdown-value{display:block;font-size:2.5rem;font-weight:700}\
.pc-stat-value{font-size:2.5rem;font-weight:700}\
.pc-comparison{width:100%;border-collapse:collapse}\
.pc-comparison td,.pc-comparison th{padding:12px;border-bottom:1px solid #e5e7eb}\
.pc-steps{list-style:none;padding:0}\
.pc-step-number{display:inline-block;width:32px;height:32px;border-radius:50%;color:#fff;text-align:center;line-height:32px}\
.pc-benefits{list-style:none;padding:0;text-align:left}\
.pc-logo-cloud{display:flex;gap:32px;justify-content:center;flex-wrap:wrap;align-items:center}\
.pc-logo{max-height:48px}\
.pc-avatar{width:48px;height:48px;border-radius:50%;object-fit:cover}\
.pc-fine-print,.pc-caption{font-size:.875rem;opacity:.7}\
@media(max-width:768px){.pc-split,.pc-grid{grid-template-columns:1fr!important}}";

/// Re-renders every countdown once per second from its `data-target`.
const COUNTDOWN_SCRIPT: &str = "\
document.querySelectorAll('.pc-countdown').forEach(function(el){\
var t=Date.parse(el.dataset.target);\
var v=el.querySelectorAll('.pc-countdown-value');\
var id=setInterval(function(){\
var s=Math.max(0,Math.floor((t-Date.now())/1000));\
[Math.floor(s/86400),Math.floor(s%86400/3600),Math.floor(s%3600/60),s%60].forEach(function(n,i){v[i].textContent=String(n).padStart(2,'0')});\
if(s===0)clearInterval(id);},1000);});";

/// A complete page: every section in order inside one document.
///
/// `title` may carry markup and tokens; the `<title>` gets plain text.
pub fn render_page(title: &str, sections: &[Section], opts: &RenderOptions<'_>) -> String {
    let mut body = String::new();
    for section in sections {
        body.push_str(&render_section(section, opts));
    }
    let title = strip_markup(&substitute_opt(title, opts.personalization));
    let has_countdown = body.contains("class=\"pc-countdown\"");
    document(&title, &body, has_countdown)
}

/// Builder preview of a whole page: `selected` gets the editing outline,
/// every other section renders plain.
pub fn render_editing_page(
    title: &str,
    sections: &[Section],
    selected: Option<&SectionId>,
    opts: &RenderOptions<'_>,
) -> String {
    let mut body = String::new();
    for section in sections {
        let opts = RenderOptions {
            selected: selected == Some(&section.id),
            ..*opts
        };
        body.push_str(&render_section(section, &opts));
    }
    let title = strip_markup(&substitute_opt(title, opts.personalization));
    let has_countdown = body.contains("class=\"pc-countdown\"");
    document(&title, &body, has_countdown)
}

/// A minimal standalone page for errors and notices.
pub fn render_message_page(title: &str, message: &str) -> String {
    let body = format!(
        "<section class=\"pc-section\" style=\"padding:96px 24px;text-align:center;color:#111827;\"><h1>{}</h1><p>{}</p></section>",
        html_escape::encode_text(title),
        html_escape::encode_text(message)
    );
    document(title, &body, false)
}

fn document(title: &str, body: &str, with_countdown: bool) -> String {
    let mut out = String::with_capacity(body.len() + PAGE_STYLES.len() + 256);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{}</title>\n<style>{PAGE_STYLES}</style>\n</head>\n<body>\n{body}\n",
        html_escape::encode_text(title)
    );
    if with_countdown {
        let _ = writeln!(out, "<script>{COUNTDOWN_SCRIPT}</script>");
    }
    out.push_str("</body>\n</html>\n");
    out
}
