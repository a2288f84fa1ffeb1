//! Writers for repeated-item sections laid out as grids, lists, or tables.

use std::fmt::Write;

use super::Ctx;
use crate::section::content::*;

fn grid_open(out: &mut String, ctx: &Ctx<'_>, columns: Option<u32>) -> std::fmt::Result {
    let css = match columns {
        Some(n) => format!(
            "display:grid;grid-template-columns:repeat({},minmax(0,1fr));gap:24px;",
            n.clamp(1, ctx.style.columns.max(1))
        ),
        None => ctx.style.grid_css(),
    };
    write!(out, "<div class=\"pc-grid\" style=\"{css}\">")
}

fn empty_list(out: &mut String, ctx: &Ctx<'_>, what: &str) -> std::fmt::Result {
    ctx.placeholder(out, &format!("Add {what} to this section"))
}

pub(super) fn features(out: &mut String, ctx: &Ctx<'_>, c: &FeaturesContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    ctx.subheading(out, &c.subheadline)?;
    if c.feature_items.is_empty() {
        return empty_list(out, ctx, "features");
    }
    grid_open(out, ctx, None)?;
    for item in &c.feature_items {
        out.push_str("<div class=\"pc-card\">");
        if !item.icon.trim().is_empty() {
            write!(
                out,
                "<div class=\"pc-icon\" style=\"color:{};\">{}</div>",
                ctx.style.accent_color,
                html_escape::encode_text(&item.icon)
            )?;
        }
        write!(
            out,
            "<h3>{}</h3>{}</div>",
            ctx.inline(&item.title),
            ctx.rich(&item.description)
        )?;
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn testimonials(
    out: &mut String,
    ctx: &Ctx<'_>,
    c: &TestimonialsContent,
) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    if c.testimonials.is_empty() {
        return empty_list(out, ctx, "testimonials");
    }
    grid_open(out, ctx, Some(c.testimonials.len() as u32))?;
    for t in &c.testimonials {
        write!(
            out,
            "<figure class=\"pc-card pc-testimonial\"><blockquote>{}</blockquote><figcaption>",
            ctx.rich(&t.quote)
        )?;
        if !t.avatar_url.trim().is_empty() {
            write!(
                out,
                "<img class=\"pc-avatar\" src=\"{}\" alt=\"{}\">",
                ctx.url(&t.avatar_url),
                ctx.attr(&t.author)
            )?;
        }
        write!(out, "<strong>{}</strong>", ctx.inline(&t.author))?;
        if !t.role.trim().is_empty() {
            write!(out, "<span>{}</span>", ctx.inline(&t.role))?;
        }
        out.push_str("</figcaption></figure>");
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn pricing(out: &mut String, ctx: &Ctx<'_>, c: &PricingContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    ctx.subheading(out, &c.subheadline)?;
    if c.pricing_items.is_empty() {
        return empty_list(out, ctx, "plans");
    }
    grid_open(out, ctx, Some(c.pricing_items.len() as u32))?;
    for plan in &c.pricing_items {
        let highlight = if plan.highlighted {
            format!(" style=\"border:2px solid {};\"", ctx.style.accent_color)
        } else {
            String::new()
        };
        write!(
            out,
            "<div class=\"pc-card pc-plan{}\"{highlight}><h3>{}</h3><p class=\"pc-price\">{}",
            if plan.highlighted { " pc-plan-highlighted" } else { "" },
            ctx.inline(&plan.name),
            ctx.inline(&plan.price)
        )?;
        if !plan.period.trim().is_empty() {
            write!(out, "<span class=\"pc-period\">{}</span>", ctx.inline(&plan.period))?;
        }
        out.push_str("</p><ul class=\"pc-plan-features\">");
        for feature in &plan.features {
            write!(out, "<li>{}</li>", ctx.inline(feature))?;
        }
        out.push_str("</ul>");
        ctx.button(out, &plan.button_text, &plan.button_url, false, !plan.highlighted)?;
        out.push_str("</div>");
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn faq(out: &mut String, ctx: &Ctx<'_>, c: &FaqContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    if c.faq_items.is_empty() {
        return empty_list(out, ctx, "questions");
    }
    out.push_str("<div class=\"pc-faq\">");
    for item in &c.faq_items {
        write!(
            out,
            "<details class=\"pc-faq-item\"><summary>{}</summary>{}</details>",
            ctx.inline(&item.question),
            ctx.rich(&item.answer)
        )?;
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn stats(out: &mut String, ctx: &Ctx<'_>, c: &StatsContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    if c.stats.is_empty() {
        return empty_list(out, ctx, "stats");
    }
    grid_open(out, ctx, Some(c.stats.len() as u32))?;
    for stat in &c.stats {
        write!(
            out,
            "<div class=\"pc-stat\"><div class=\"pc-stat-value\" style=\"color:{};\">{}</div><div class=\"pc-stat-label\">{}</div></div>",
            ctx.style.accent_color,
            ctx.inline(&stat.value),
            ctx.inline(&stat.label)
        )?;
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn team(out: &mut String, ctx: &Ctx<'_>, c: &TeamContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    if c.members.is_empty() {
        return empty_list(out, ctx, "team members");
    }
    grid_open(out, ctx, None)?;
    for member in &c.members {
        out.push_str("<div class=\"pc-card pc-member\">");
        if !member.image_url.trim().is_empty() {
            write!(
                out,
                "<img class=\"pc-avatar\" src=\"{}\" alt=\"{}\">",
                ctx.url(&member.image_url),
                ctx.attr(&member.name)
            )?;
        }
        write!(
            out,
            "<h3>{}</h3><p class=\"pc-role\">{}</p>",
            ctx.inline(&member.name),
            ctx.inline(&member.role)
        )?;
        if !member.bio.trim().is_empty() {
            out.push_str(&ctx.rich(&member.bio));
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn logo_cloud(out: &mut String, ctx: &Ctx<'_>, c: &LogoCloudContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    if c.logos.is_empty() {
        return empty_list(out, ctx, "logos");
    }
    out.push_str("<div class=\"pc-logo-cloud\">");
    for logo in &c.logos {
        if logo.image_url.trim().is_empty() {
            write!(out, "<span class=\"pc-logo-name\">{}</span>", ctx.inline(&logo.name))?;
        } else {
            write!(
                out,
                "<img class=\"pc-logo\" src=\"{}\" alt=\"{}\">",
                ctx.url(&logo.image_url),
                ctx.attr(&logo.name)
            )?;
        }
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn comparison(out: &mut String, ctx: &Ctx<'_>, c: &ComparisonContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    if c.rows.is_empty() {
        return empty_list(out, ctx, "rows");
    }
    write!(
        out,
        "<table class=\"pc-comparison\"><thead><tr><th></th><th style=\"color:{};\">{}</th><th>{}</th></tr></thead><tbody>",
        ctx.style.accent_color,
        ctx.inline(&c.us_label),
        ctx.inline(&c.them_label)
    )?;
    for row in &c.rows {
        write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            ctx.inline(&row.feature),
            ctx.inline(&row.us),
            ctx.inline(&row.them)
        )?;
    }
    out.push_str("</tbody></table>");
    Ok(())
}

pub(super) fn steps(out: &mut String, ctx: &Ctx<'_>, c: &StepsContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    if c.steps.is_empty() {
        return empty_list(out, ctx, "steps");
    }
    out.push_str("<ol class=\"pc-steps\">");
    for (i, step) in c.steps.iter().enumerate() {
        write!(
            out,
            "<li><span class=\"pc-step-number\" style=\"background:{};\">{}</span><h3>{}</h3>{}</li>",
            ctx.style.accent_color,
            i + 1,
            ctx.inline(&step.title),
            ctx.rich(&step.description)
        )?;
    }
    out.push_str("</ol>");
    Ok(())
}

pub(super) fn gallery(out: &mut String, ctx: &Ctx<'_>, c: &GalleryContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    let images: Vec<_> = c.images.iter().filter(|i| !i.url.trim().is_empty()).collect();
    if images.is_empty() {
        return empty_list(out, ctx, "images");
    }
    grid_open(out, ctx, None)?;
    for image in images {
        write!(
            out,
            "<figure class=\"pc-gallery-item\"><img src=\"{}\" alt=\"{}\" style=\"border-radius:{}px;\">",
            ctx.url(&image.url),
            ctx.attr(&image.caption),
            ctx.style.border_radius
        )?;
        if !image.caption.trim().is_empty() {
            write!(out, "<figcaption>{}</figcaption>", ctx.inline(&image.caption))?;
        }
        out.push_str("</figure>");
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn footer(out: &mut String, ctx: &Ctx<'_>, c: &FooterContent) -> std::fmt::Result {
    out.push_str("<footer class=\"pc-footer\">");
    if !c.company_name.trim().is_empty() {
        write!(out, "<strong>{}</strong>", ctx.inline(&c.company_name))?;
    }
    if !c.tagline.trim().is_empty() {
        write!(out, "<p>{}</p>", ctx.inline(&c.tagline))?;
    }
    if !c.links.is_empty() {
        out.push_str("<nav class=\"pc-footer-links\">");
        for link in &c.links {
            write!(
                out,
                "<a href=\"{}\">{}</a>",
                ctx.url(&link.url),
                ctx.inline(&link.label)
            )?;
        }
        out.push_str("</nav>");
    }
    if !c.copyright.trim().is_empty() {
        write!(out, "<p class=\"pc-fine-print\">{}</p>", ctx.inline(&c.copyright))?;
    }
    out.push_str("</footer>");
    Ok(())
}

pub(super) fn social_proof(
    out: &mut String,
    ctx: &Ctx<'_>,
    c: &SocialProofContent,
) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    out.push_str("<div class=\"pc-social-proof\">");
    let rating = c.rating.clamp(0.0, 5.0);
    if rating > 0.0 {
        let full = rating.round() as usize;
        write!(
            out,
            "<span class=\"pc-stars\" style=\"color:{};\" aria-label=\"{rating:.1} out of 5\">{}{}</span><span class=\"pc-rating\">{rating:.1}</span>",
            ctx.style.accent_color,
            "\u{2605}".repeat(full),
            "\u{2606}".repeat(5 - full)
        )?;
    }
    if !c.review_count.trim().is_empty() {
        write!(out, "<span class=\"pc-review-count\">{}</span>", ctx.inline(&c.review_count))?;
    }
    if !c.text.trim().is_empty() {
        write!(out, "<p>{}</p>", ctx.inline(&c.text))?;
    }
    out.push_str("</div>");
    Ok(())
}

pub(super) fn benefits(out: &mut String, ctx: &Ctx<'_>, c: &BenefitsContent) -> std::fmt::Result {
    let has_image = !c.image_url.trim().is_empty();
    if has_image {
        out.push_str("<div class=\"pc-split\"><div class=\"pc-split-text\">");
    }
    ctx.heading(out, &c.headline)?;
    ctx.subheading(out, &c.subheadline)?;
    if c.benefits.is_empty() {
        empty_list(out, ctx, "benefits")?;
    } else {
        out.push_str("<ul class=\"pc-benefits\">");
        for benefit in &c.benefits {
            write!(
                out,
                "<li><span class=\"pc-check\" style=\"color:{};\">\u{2713}</span>{}</li>",
                ctx.style.accent_color,
                ctx.inline(benefit)
            )?;
        }
        out.push_str("</ul>");
    }
    if has_image {
        write!(
            out,
            "</div><div class=\"pc-split-media\"><img class=\"pc-image\" src=\"{}\" alt=\"\" style=\"border-radius:{}px;\"></div></div>",
            ctx.url(&c.image_url),
            ctx.style.border_radius
        )?;
    }
    Ok(())
}

pub(super) fn cards(out: &mut String, ctx: &Ctx<'_>, c: &CardsContent) -> std::fmt::Result {
    ctx.heading(out, &c.headline)?;
    if c.cards.is_empty() {
        return empty_list(out, ctx, "cards");
    }
    grid_open(out, ctx, None)?;
    for card in &c.cards {
        out.push_str("<div class=\"pc-card\">");
        if !card.image_url.trim().is_empty() {
            write!(
                out,
                "<img class=\"pc-card-image\" src=\"{}\" alt=\"\">",
                ctx.url(&card.image_url)
            )?;
        }
        write!(
            out,
            "<h3>{}</h3>{}",
            ctx.inline(&card.title),
            ctx.rich(&card.description)
        )?;
        if !card.link_text.trim().is_empty() {
            let href = if card.link_url.trim().is_empty() { "#" } else { card.link_url.as_str() };
            write!(
                out,
                "<a class=\"pc-card-link\" href=\"{}\" style=\"color:{};\">{}</a>",
                ctx.url(href),
                ctx.style.accent_color,
                ctx.inline(&card.link_text)
            )?;
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
    Ok(())
}
