//! Section renderer: one [`Section`] in, one HTML fragment out.
//!
//! Every text-bearing field is personalized and then formatted through
//! [`crate::markup`]; URLs and attribute text go through
//! [`crate::substitution::substitute`] only. Missing required content yields
//! a type-specific placeholder. Unknown section types render nothing.

mod blocks;
mod collections;
pub mod countdown;
mod page;
pub mod style;
pub mod video;

use std::fmt::Write;

use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::markup::{body_html, headline_html};
use crate::section::{Section, SectionContent};
use crate::substitution::{substitute_opt, RecipientData};
use crate::types::Timestamp;

pub use page::{render_editing_page, render_message_page, render_page, PAGE_STYLES};
pub use style::ResolvedStyle;
pub use video::{parse_video_url, VideoEmbed, VideoProvider};

/// Bytes that could end or escape a quoted CSS `url()`.
const CSS_URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'\\')
    .add(b'<')
    .add(b'>');

/// Outline color drawn around the selected section while editing.
pub const SELECTION_COLOR: &str = "#6366f1";

/// Presentation hints for one render.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions<'a> {
    /// Preview disables form controls and never draws the editing outline.
    pub preview: bool,
    /// Draws the editing outline and type badge, unless `preview` is set.
    pub selected: bool,
    pub personalization: Option<&'a RecipientData>,
    /// Clock for countdown snapshots; wall clock when `None`.
    pub now: Option<Timestamp>,
}

impl<'a> RenderOptions<'a> {
    /// Recipient-facing render: no editing chrome, tokens filled from `data`.
    pub fn personalized(data: &'a RecipientData) -> Self {
        RenderOptions {
            personalization: Some(data),
            ..Default::default()
        }
    }

    pub fn shows_selection(&self) -> bool {
        self.selected && !self.preview
    }
}

/// Render one section to an HTML fragment.
pub fn render_section(section: &Section, opts: &RenderOptions<'_>) -> String {
    let Some(ty) = section.section_type() else {
        return String::new();
    };

    let ctx = Ctx {
        opts,
        style: ResolvedStyle::resolve(&section.style),
    };

    let mut body = String::new();
    if let Err(e) = write_content(&mut body, &ctx, &section.content) {
        tracing::warn!(section_id = %section.id, error = %e, "Section render failed");
        return String::new();
    }

    let mut out = String::new();
    let mut css = ctx.style.section_css();
    let mut class = format!("pc-section pc-{}", ty.as_str());
    if opts.shows_selection() {
        class.push_str(" pc-selected");
        let _ = write!(
            css,
            "outline:2px solid {SELECTION_COLOR};outline-offset:-2px;position:relative;"
        );
    }

    let _ = write!(
        out,
        "<section class=\"{class}\" data-section-id=\"{}\" data-section-type=\"{}\" style=\"{css}\">",
        html_escape::encode_double_quoted_attribute(section.id.as_str()),
        ty.as_str(),
    );
    if opts.shows_selection() {
        let _ = write!(out, "<span class=\"pc-badge\">{}</span>", ty.label());
    }
    let _ = write!(
        out,
        "<div class=\"pc-inner\" style=\"max-width:{}px;margin:0 auto;\">{body}</div></section>",
        ctx.style.max_width
    );
    out
}

fn write_content(out: &mut String, ctx: &Ctx<'_>, content: &SectionContent) -> std::fmt::Result {
    match content {
        SectionContent::Headline(c) => blocks::headline(out, ctx, c),
        SectionContent::Body(c) => blocks::body(out, ctx, c),
        SectionContent::Video(c) => blocks::video(out, ctx, c),
        SectionContent::Image(c) => blocks::image(out, ctx, c),
        SectionContent::Banner(c) => blocks::banner(out, ctx, c),
        SectionContent::Cta(c) => blocks::cta(out, ctx, c),
        SectionContent::Form(c) => blocks::form(out, ctx, c),
        SectionContent::Logo(c) => blocks::logo(out, ctx, c),
        SectionContent::Document(c) => blocks::document(out, ctx, c),
        SectionContent::Spacer(_) => blocks::spacer(out, ctx),
        SectionContent::Hero(c) => blocks::hero(out, ctx, c),
        SectionContent::HeroVideo(c) => blocks::hero_video(out, ctx, c),
        SectionContent::HeroImage(c) => blocks::hero_image(out, ctx, c),
        SectionContent::HeroForm(c) => blocks::hero_form(out, ctx, c),
        SectionContent::Features(c) => collections::features(out, ctx, c),
        SectionContent::Testimonials(c) => collections::testimonials(out, ctx, c),
        SectionContent::Pricing(c) => collections::pricing(out, ctx, c),
        SectionContent::Faq(c) => collections::faq(out, ctx, c),
        SectionContent::Stats(c) => collections::stats(out, ctx, c),
        SectionContent::Team(c) => collections::team(out, ctx, c),
        SectionContent::LogoCloud(c) => collections::logo_cloud(out, ctx, c),
        SectionContent::Newsletter(c) => blocks::newsletter(out, ctx, c),
        SectionContent::Comparison(c) => collections::comparison(out, ctx, c),
        SectionContent::Steps(c) => collections::steps(out, ctx, c),
        SectionContent::Gallery(c) => collections::gallery(out, ctx, c),
        SectionContent::Footer(c) => collections::footer(out, ctx, c),
        SectionContent::Divider(_) => blocks::divider(out, ctx),
        SectionContent::Quote(c) => blocks::quote(out, ctx, c),
        SectionContent::Countdown(c) => blocks::countdown(out, ctx, c),
        SectionContent::SocialProof(c) => collections::social_proof(out, ctx, c),
        SectionContent::Benefits(c) => collections::benefits(out, ctx, c),
        SectionContent::Cards(c) => collections::cards(out, ctx, c),
        SectionContent::QrCode(c) => blocks::qr_code(out, ctx, c),
        SectionContent::Unknown { .. } => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Render context
// ---------------------------------------------------------------------------

/// Per-section rendering helpers shared by the block writers.
pub(crate) struct Ctx<'a> {
    pub opts: &'a RenderOptions<'a>,
    pub style: ResolvedStyle,
}

impl Ctx<'_> {
    fn data(&self) -> Option<&RecipientData> {
        self.opts.personalization
    }

    /// Single-line rich text.
    pub fn inline(&self, text: &str) -> String {
        headline_html(text, self.data())
    }

    /// Multi-paragraph rich text.
    pub fn rich(&self, text: &str) -> String {
        body_html(text, self.data())
    }

    /// Personalized text for an attribute value (alt, placeholder).
    pub fn attr(&self, text: &str) -> String {
        html_escape::encode_double_quoted_attribute(&substitute_opt(text, self.data())).into_owned()
    }

    /// Personalized, scheme-checked URL for `href`/`src`.
    pub fn url(&self, raw: &str) -> String {
        let url = substitute_opt(raw, self.data());
        html_escape::encode_double_quoted_attribute(safe_url(&url)).into_owned()
    }

    /// Like [`Ctx::url`], for a quoted CSS `url('...')` inside a `style` attribute.
    pub fn css_url(&self, raw: &str) -> String {
        let url = substitute_opt(raw, self.data());
        let encoded = utf8_percent_encode(safe_url(&url), CSS_URL_UNSAFE).to_string();
        html_escape::encode_double_quoted_attribute(&encoded).into_owned()
    }

    pub fn now(&self) -> Timestamp {
        self.opts.now.unwrap_or_else(Utc::now)
    }

    /// ` disabled` on form controls in preview mode.
    pub fn disabled(&self) -> &'static str {
        if self.opts.preview {
            " disabled"
        } else {
            ""
        }
    }

    /// A button, suppressed when `hidden` or when its text is blank.
    pub fn button(
        &self,
        out: &mut String,
        text: &str,
        url: &str,
        hidden: bool,
        secondary: bool,
    ) -> std::fmt::Result {
        if hidden || text.trim().is_empty() {
            return Ok(());
        }
        let href = if url.trim().is_empty() { "#" } else { url };
        write!(
            out,
            "<a class=\"pc-button{}\" href=\"{}\" style=\"{}\">{}</a>",
            if secondary { " pc-button-secondary" } else { "" },
            self.url(href),
            self.style.button_css(secondary),
            self.inline(text)
        )
    }

    /// `<h2>` heading, omitted when blank.
    pub fn heading(&self, out: &mut String, text: &str) -> std::fmt::Result {
        if text.trim().is_empty() {
            return Ok(());
        }
        write!(out, "<h2 class=\"pc-heading\">{}</h2>", self.inline(text))
    }

    /// Supporting line under a heading, omitted when blank.
    pub fn subheading(&self, out: &mut String, text: &str) -> std::fmt::Result {
        if text.trim().is_empty() {
            return Ok(());
        }
        write!(out, "<p class=\"pc-subheading\">{}</p>", self.inline(text))
    }

    pub fn placeholder(&self, out: &mut String, message: &str) -> std::fmt::Result {
        write!(
            out,
            "<div class=\"pc-placeholder\">{}</div>",
            html_escape::encode_text(message)
        )
    }
}

/// Allow web, mail, phone, and relative URLs; anything else becomes `#`.
pub fn safe_url(url: &str) -> &str {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let scheme_end = lower.find(':');
    let path_start = lower.find(['/', '?', '#']);
    let has_scheme = match (scheme_end, path_start) {
        (Some(colon), Some(slash)) => colon < slash,
        (Some(_), None) => true,
        _ => false,
    };
    let allowed = !has_scheme
        || ["http:", "https:", "mailto:", "tel:"]
            .iter()
            .any(|scheme| lower.starts_with(scheme));
    if allowed && !trimmed.is_empty() {
        trimmed
    } else {
        "#"
    }
}
