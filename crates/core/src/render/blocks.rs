//! Writers for single-block sections: text, media, buttons, and forms.

use std::fmt::Write;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::countdown::{parse_target, time_remaining};
use super::video::parse_video_url;
use super::Ctx;
use crate::section::content::*;
use crate::substitution::substitute_opt;

const QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/?size=220x220&data=";

pub(super) fn headline(out: &mut String, ctx: &Ctx<'_>, c: &HeadlineContent) -> std::fmt::Result {
    write!(
        out,
        "<h1 class=\"pc-headline\" style=\"{}\">{}</h1>",
        ctx.style.text_css(),
        ctx.inline(&c.text)
    )?;
    ctx.subheading(out, &c.subtext)
}

pub(super) fn body(out: &mut String, ctx: &Ctx<'_>, c: &BodyContent) -> std::fmt::Result {
    write!(
        out,
        "<div class=\"pc-body\" style=\"{}\">{}</div>",
        ctx.style.text_css(),
        ctx.rich(&c.text)
    )
}

pub(super) fn video(out: &mut String, ctx: &Ctx<'_>, c: &VideoContent) -> std::fmt::Result {
    video_frame(out, ctx, &c.video_url)?;
    caption(out, ctx, &c.caption)
}

fn video_frame(out: &mut String, ctx: &Ctx<'_>, raw_url: &str) -> std::fmt::Result {
    let url = substitute_opt(raw_url, ctx.opts.personalization);
    let Some(embed) = parse_video_url(&url) else {
        return ctx.placeholder(out, "Paste a YouTube, Vimeo, or video URL");
    };
    let src = html_escape::encode_double_quoted_attribute(&embed.embed_url);
    if embed.is_media_file() {
        write!(
            out,
            "<video class=\"pc-video\" src=\"{src}\" controls playsinline style=\"border-radius:{}px;\"></video>",
            ctx.style.border_radius
        )
    } else {
        write!(
            out,
            "<div class=\"pc-video-frame\" style=\"border-radius:{}px;\"><iframe src=\"{src}\" title=\"Video\" frameborder=\"0\" allow=\"autoplay; fullscreen; picture-in-picture\" allowfullscreen></iframe></div>",
            ctx.style.border_radius
        )
    }
}

pub(super) fn image(out: &mut String, ctx: &Ctx<'_>, c: &ImageContent) -> std::fmt::Result {
    if c.image_url.trim().is_empty() {
        return ctx.placeholder(out, "Add an image URL");
    }
    let img = format!(
        "<img class=\"pc-image\" src=\"{}\" alt=\"{}\" style=\"border-radius:{}px;\">",
        ctx.url(&c.image_url),
        ctx.attr(&c.alt_text),
        ctx.style.border_radius
    );
    if c.link_url.trim().is_empty() {
        out.push_str(&img);
    } else {
        write!(out, "<a href=\"{}\">{img}</a>", ctx.url(&c.link_url))?;
    }
    caption(out, ctx, &c.caption)
}

pub(super) fn banner(out: &mut String, ctx: &Ctx<'_>, c: &BannerContent) -> std::fmt::Result {
    write!(
        out,
        "<div class=\"pc-banner\"><span class=\"pc-banner-text\" style=\"{}\">{}</span>",
        ctx.style.text_css(),
        ctx.inline(&c.text)
    )?;
    ctx.button(out, &c.button_text, &c.button_url, c.hide_button, false)?;
    out.push_str("</div>");
    Ok(())
}

pub(super) fn cta(out: &mut String, ctx: &Ctx<'_>, c: &CtaContent) -> std::fmt::Result {
    if !c.headline.trim().is_empty() {
        write!(
            out,
            "<h2 class=\"pc-heading\" style=\"{}\">{}</h2>",
            ctx.style.text_css(),
            ctx.inline(&c.headline)
        )?;
    }
    ctx.subheading(out, &c.subheadline)?;
    out.push_str("<div class=\"pc-actions\">");
    ctx.button(out, &c.button_text, &c.button_url, c.hide_button, false)?;
    ctx.button(
        out,
        &c.secondary_button_text,
        &c.secondary_button_url,
        c.hide_secondary_button,
        true,
    )?;
    out.push_str("</div>");
    Ok(())
}

pub(super) fn form(out: &mut String, ctx: &Ctx<'_>, c: &FormContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    ctx.subheading(out, &c.subheadline)?;
    form_body(out, ctx, &c.fields, &c.button_text, c.hide_button, &c.action_url)
}

/// `<form>` with one labelled control per field.
fn form_body(
    out: &mut String,
    ctx: &Ctx<'_>,
    fields: &[FormField],
    button_text: &str,
    hide_button: bool,
    action_url: &str,
) -> std::fmt::Result {
    let action = if action_url.trim().is_empty() {
        "#".to_string()
    } else {
        ctx.url(action_url)
    };
    write!(out, "<form class=\"pc-form\" method=\"post\" action=\"{action}\">")?;
    let disabled = ctx.disabled();
    for field in fields {
        let name = html_escape::encode_double_quoted_attribute(&field.name);
        let required = if field.required { " required" } else { "" };
        write!(
            out,
            "<label class=\"pc-field\"><span>{}</span>",
            ctx.inline(&field.label)
        )?;
        match field.field_type.as_str() {
            "textarea" => write!(
                out,
                "<textarea name=\"{name}\" placeholder=\"{}\"{required}{disabled}></textarea>",
                ctx.attr(&field.placeholder)
            )?,
            other => {
                let input_type = match other {
                    "email" | "tel" | "number" | "url" => other,
                    _ => "text",
                };
                write!(
                    out,
                    "<input type=\"{input_type}\" name=\"{name}\" placeholder=\"{}\"{required}{disabled}>",
                    ctx.attr(&field.placeholder)
                )?
            }
        }
        out.push_str("</label>");
    }
    if !hide_button && !button_text.trim().is_empty() {
        write!(
            out,
            "<button type=\"submit\" class=\"pc-button\" style=\"{}\"{disabled}>{}</button>",
            ctx.style.button_css(false),
            ctx.inline(button_text)
        )?;
    }
    out.push_str("</form>");
    Ok(())
}

pub(super) fn logo(out: &mut String, ctx: &Ctx<'_>, c: &LogoContent) -> std::fmt::Result {
    if c.image_url.trim().is_empty() {
        return ctx.placeholder(out, "Add a logo URL");
    }
    let img = format!(
        "<img class=\"pc-logo\" src=\"{}\" alt=\"{}\">",
        ctx.url(&c.image_url),
        ctx.attr(&c.alt_text)
    );
    if c.link_url.trim().is_empty() {
        out.push_str(&img);
        Ok(())
    } else {
        write!(out, "<a href=\"{}\">{img}</a>", ctx.url(&c.link_url))
    }
}

pub(super) fn document(out: &mut String, ctx: &Ctx<'_>, c: &DocumentContent) -> std::fmt::Result {
    write!(out, "<div class=\"pc-document\">")?;
    ctx.heading(out, &c.title)?;
    if !c.description.trim().is_empty() {
        out.push_str(&ctx.rich(&c.description));
    }
    if c.document_url.trim().is_empty() {
        ctx.placeholder(out, "Add a document URL")?;
    } else {
        ctx.button(out, &c.button_text, &c.document_url, c.hide_button, false)?;
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn spacer(out: &mut String, ctx: &Ctx<'_>) -> std::fmt::Result {
    write!(
        out,
        "<div class=\"pc-spacer\" style=\"height:{}px;\"></div>",
        ctx.style.height.unwrap_or(ctx.style.padding_y)
    )
}

pub(super) fn divider(out: &mut String, ctx: &Ctx<'_>) -> std::fmt::Result {
    write!(
        out,
        "<hr class=\"pc-divider\" style=\"border:0;border-top:1px solid {};\">",
        ctx.style.accent_color
    )
}

// ---------------------------------------------------------------------------
// Hero variants
// ---------------------------------------------------------------------------

fn hero_headline(out: &mut String, ctx: &Ctx<'_>, headline: &str, subheadline: &str) -> std::fmt::Result {
    write!(
        out,
        "<h1 class=\"pc-hero-title\" style=\"{}\">{}</h1>",
        ctx.style.text_css(),
        ctx.inline(headline)
    )?;
    ctx.subheading(out, subheadline)
}

pub(super) fn hero(out: &mut String, ctx: &Ctx<'_>, c: &HeroContent) -> std::fmt::Result {
    let has_background = !c.background_image_url.trim().is_empty();
    if has_background {
        write!(
            out,
            "<div class=\"pc-hero-bg\" style=\"background-image:url('{}');background-size:cover;background-position:center;\"><div class=\"pc-hero-overlay\" style=\"background:rgba(0,0,0,{});\">",
            ctx.css_url(&c.background_image_url),
            ctx.style.overlay_opacity
        )?;
    }
    hero_headline(out, ctx, &c.headline, &c.subheadline)?;
    out.push_str("<div class=\"pc-actions\">");
    ctx.button(out, &c.button_text, &c.button_url, c.hide_button, false)?;
    ctx.button(
        out,
        &c.secondary_button_text,
        &c.secondary_button_url,
        c.hide_secondary_button,
        true,
    )?;
    out.push_str("</div>");
    if has_background {
        out.push_str("</div></div>");
    }
    Ok(())
}

pub(super) fn hero_video(out: &mut String, ctx: &Ctx<'_>, c: &HeroVideoContent) -> std::fmt::Result {
    out.push_str("<div class=\"pc-split\"><div class=\"pc-split-text\">");
    hero_headline(out, ctx, &c.headline, &c.subheadline)?;
    ctx.button(out, &c.button_text, &c.button_url, c.hide_button, false)?;
    out.push_str("</div><div class=\"pc-split-media\">");
    video_frame(out, ctx, &c.video_url)?;
    out.push_str("</div></div>");
    Ok(())
}

pub(super) fn hero_image(out: &mut String, ctx: &Ctx<'_>, c: &HeroImageContent) -> std::fmt::Result {
    let reversed = c.image_position == "left";
    write!(
        out,
        "<div class=\"pc-split{}\"><div class=\"pc-split-text\">",
        if reversed { " pc-split-reverse" } else { "" }
    )?;
    hero_headline(out, ctx, &c.headline, &c.subheadline)?;
    ctx.button(out, &c.button_text, &c.button_url, c.hide_button, false)?;
    out.push_str("</div><div class=\"pc-split-media\">");
    if c.image_url.trim().is_empty() {
        ctx.placeholder(out, "Add an image URL")?;
    } else {
        write!(
            out,
            "<img class=\"pc-image\" src=\"{}\" alt=\"\" style=\"border-radius:{}px;\">",
            ctx.url(&c.image_url),
            ctx.style.border_radius
        )?;
    }
    out.push_str("</div></div>");
    Ok(())
}

pub(super) fn hero_form(out: &mut String, ctx: &Ctx<'_>, c: &HeroFormContent) -> std::fmt::Result {
    out.push_str("<div class=\"pc-split\"><div class=\"pc-split-text\">");
    hero_headline(out, ctx, &c.headline, &c.subheadline)?;
    out.push_str("</div><div class=\"pc-split-media pc-card\">");
    if !c.form_headline.trim().is_empty() {
        write!(out, "<h3>{}</h3>", ctx.inline(&c.form_headline))?;
    }
    form_body(out, ctx, &c.fields, &c.button_text, c.hide_button, &c.action_url)?;
    out.push_str("</div></div>");
    Ok(())
}

// ---------------------------------------------------------------------------
// Single-block extras
// ---------------------------------------------------------------------------

pub(super) fn newsletter(out: &mut String, ctx: &Ctx<'_>, c: &NewsletterContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    ctx.subheading(out, &c.subheadline)?;
    let disabled = ctx.disabled();
    write!(
        out,
        "<form class=\"pc-newsletter\" method=\"post\" action=\"#\"><input type=\"email\" name=\"email\" placeholder=\"{}\" required{disabled}>",
        ctx.attr(&c.placeholder)
    )?;
    if !c.hide_button && !c.button_text.trim().is_empty() {
        write!(
            out,
            "<button type=\"submit\" class=\"pc-button\" style=\"{}\"{disabled}>{}</button>",
            ctx.style.button_css(false),
            ctx.inline(&c.button_text)
        )?;
    }
    out.push_str("</form>");
    if !c.disclaimer.trim().is_empty() {
        write!(out, "<p class=\"pc-fine-print\">{}</p>", ctx.inline(&c.disclaimer))?;
    }
    Ok(())
}

pub(super) fn quote(out: &mut String, ctx: &Ctx<'_>, c: &QuoteContent) -> std::fmt::Result {
    write!(
        out,
        "<blockquote class=\"pc-quote\" style=\"{}\">{}</blockquote>",
        ctx.style.text_css(),
        ctx.rich(&c.quote)
    )?;
    if !c.author.trim().is_empty() {
        write!(out, "<cite class=\"pc-cite\">{}", ctx.inline(&c.author))?;
        if !c.role.trim().is_empty() {
            write!(out, ", {}", ctx.inline(&c.role))?;
        }
        out.push_str("</cite>");
    }
    Ok(())
}

/// Server-side snapshot of the countdown; the page script keeps it ticking
/// from `data-target`.
pub(super) fn countdown(out: &mut String, ctx: &Ctx<'_>, c: &CountdownContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    let Some(target) = parse_target(&c.target_date) else {
        return ctx.placeholder(out, "Pick an end date for the countdown");
    };
    let remaining = time_remaining(target, ctx.now());
    if remaining.is_zero() {
        return write!(out, "<p class=\"pc-countdown-expired\">{}</p>", ctx.inline(&c.expired_message));
    }
    write!(
        out,
        "<div class=\"pc-countdown\" data-target=\"{}\">",
        target.to_rfc3339()
    )?;
    for (value, unit) in [
        (remaining.days, "Days"),
        (remaining.hours, "Hours"),
        (remaining.minutes, "Minutes"),
        (remaining.seconds, "Seconds"),
    ] {
        write!(
            out,
            "<div class=\"pc-countdown-unit\"><span class=\"pc-countdown-value\" style=\"color:{};\">{value:02}</span><span>{unit}</span></div>",
            ctx.style.accent_color
        )?;
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn qr_code(out: &mut String, ctx: &Ctx<'_>, c: &QrCodeContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    let target = substitute_opt(&c.url, ctx.opts.personalization);
    let target = target.trim();
    if target.is_empty() || target.contains("{{") {
        ctx.placeholder(out, "The QR code appears on each recipient's page")?;
    } else {
        let src = format!("{QR_ENDPOINT}{}", utf8_percent_encode(target, NON_ALPHANUMERIC));
        write!(
            out,
            "<img class=\"pc-qr\" src=\"{}\" alt=\"QR code\" width=\"220\" height=\"220\">",
            html_escape::encode_double_quoted_attribute(&src)
        )?;
    }
    caption(out, ctx, &c.caption)
}

fn caption(out: &mut String, ctx: &Ctx<'_>, text: &str) -> std::fmt::Result {
    if text.trim().is_empty() {
        return Ok(());
    }
    write!(out, "<p class=\"pc-caption\">{}</p>", ctx.inline(text))
}
