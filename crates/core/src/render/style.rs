//! Section style resolution: every absent or unusable attribute takes a
//! hardcoded fallback, then the result is written out as inline CSS.

use std::fmt::Write;

use crate::section::{SectionStyle, BRAND_COLOR};

const FALLBACK_BACKGROUND: &str = "#ffffff";
const FALLBACK_TEXT: &str = "#111827";
const FALLBACK_BUTTON_TEXT: &str = "#ffffff";
const FALLBACK_PADDING_Y: u32 = 48;
const FALLBACK_PADDING_X: u32 = 24;
const FALLBACK_MAX_WIDTH: u32 = 1100;
const FALLBACK_COLUMNS: u32 = 3;
const FALLBACK_OVERLAY: f64 = 0.5;
const MAX_COLUMNS: u32 = 6;

/// A [`SectionStyle`] with every fallback applied and every value made safe
/// to embed in a `style` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub background: String,
    pub text_color: String,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_align: &'static str,
    pub padding_y: u32,
    pub padding_x: u32,
    pub max_width: u32,
    pub button_color: String,
    pub button_text_color: String,
    pub accent_color: String,
    pub columns: u32,
    pub height: Option<u32>,
    pub overlay_opacity: f64,
    pub border_radius: u32,
}

impl ResolvedStyle {
    pub fn resolve(style: &SectionStyle) -> Self {
        let color = |value: &Option<String>, fallback: &str| {
            value
                .as_deref()
                .and_then(css_color)
                .unwrap_or(fallback)
                .to_string()
        };
        let accent = color(&style.accent_color, BRAND_COLOR);

        ResolvedStyle {
            background: color(&style.background_color, FALLBACK_BACKGROUND),
            text_color: color(&style.text_color, FALLBACK_TEXT),
            font_size: style.font_size.as_deref().and_then(font_size_css),
            font_weight: style.font_weight.as_deref().and_then(font_weight_css),
            font_style: style
                .font_style
                .as_deref()
                .filter(|s| matches!(*s, "normal" | "italic"))
                .map(str::to_string),
            text_align: match style.text_align.as_deref() {
                Some("left") => "left",
                Some("right") => "right",
                Some("justify") => "justify",
                _ => "center",
            },
            padding_y: style.padding_y.unwrap_or(FALLBACK_PADDING_Y),
            padding_x: style.padding_x.unwrap_or(FALLBACK_PADDING_X),
            max_width: style.max_width.unwrap_or(FALLBACK_MAX_WIDTH),
            button_color: color(&style.button_color, accent.as_str()),
            button_text_color: color(&style.button_text_color, FALLBACK_BUTTON_TEXT),
            columns: style
                .columns
                .filter(|c| *c > 0)
                .unwrap_or(FALLBACK_COLUMNS)
                .min(MAX_COLUMNS),
            height: style.height,
            overlay_opacity: style
                .overlay_opacity
                .unwrap_or(FALLBACK_OVERLAY)
                .clamp(0.0, 1.0),
            border_radius: style.border_radius.unwrap_or(8),
            accent_color: accent,
        }
    }

    /// CSS for the outer `<section>` element.
    pub fn section_css(&self) -> String {
        format!(
            "background:{};color:{};padding:{}px {}px;text-align:{};",
            self.background, self.text_color, self.padding_y, self.padding_x, self.text_align
        )
    }

    /// CSS for the primary text element (headline, quote).
    pub fn text_css(&self) -> String {
        let mut css = String::new();
        if let Some(size) = &self.font_size {
            let _ = write!(css, "font-size:{size};");
        }
        if let Some(weight) = &self.font_weight {
            let _ = write!(css, "font-weight:{weight};");
        }
        if let Some(font_style) = &self.font_style {
            let _ = write!(css, "font-style:{font_style};");
        }
        css
    }

    pub fn button_css(&self, secondary: bool) -> String {
        if secondary {
            format!(
                "background:transparent;color:{};border:2px solid {};border-radius:{}px;",
                self.button_color, self.button_color, self.border_radius
            )
        } else {
            format!(
                "background:{};color:{};border-radius:{}px;",
                self.button_color, self.button_text_color, self.border_radius
            )
        }
    }

    pub fn grid_css(&self) -> String {
        format!(
            "display:grid;grid-template-columns:repeat({},minmax(0,1fr));gap:24px;",
            self.columns
        )
    }
}

/// Accept a color value only if it cannot break out of a style declaration.
pub fn css_color(value: &str) -> Option<&str> {
    let value = value.trim();
    let safe = !value.is_empty()
        && value.len() <= 64
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '));
    safe.then_some(value)
}

fn font_size_css(value: &str) -> Option<String> {
    let scaled = match value {
        "xs" => "0.75rem",
        "sm" => "0.875rem",
        "base" => "1rem",
        "lg" => "1.125rem",
        "xl" => "1.25rem",
        "2xl" => "1.5rem",
        "3xl" => "1.875rem",
        "4xl" => "2.25rem",
        "5xl" => "3rem",
        "6xl" => "3.75rem",
        other => return css_length(other),
    };
    Some(scaled.to_string())
}

fn css_length(value: &str) -> Option<String> {
    let value = value.trim();
    if value.parse::<f64>().is_ok_and(|n| n > 0.0) {
        return Some(format!("{value}px"));
    }
    let unit_start = value.find(|c: char| c.is_ascii_alphabetic() || c == '%')?;
    let (number, unit) = value.split_at(unit_start);
    let valid_number = number.parse::<f64>().is_ok_and(|n| n > 0.0);
    let valid_unit = matches!(unit, "px" | "rem" | "em" | "%" | "vw" | "vh");
    (valid_number && valid_unit).then(|| value.to_string())
}

fn font_weight_css(value: &str) -> Option<String> {
    let weight = match value {
        "light" => "300",
        "normal" => "400",
        "medium" => "500",
        "semibold" => "600",
        "bold" => "700",
        "extrabold" => "800",
        other => {
            let n: u32 = other.parse().ok()?;
            return (100..=900).contains(&n).then(|| n.to_string());
        }
    };
    Some(weight.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_style_uses_fallbacks() {
        let resolved = ResolvedStyle::resolve(&SectionStyle::default());
        assert_eq!(resolved.background, FALLBACK_BACKGROUND);
        assert_eq!(resolved.button_color, BRAND_COLOR);
        assert_eq!(resolved.columns, FALLBACK_COLUMNS);
        assert_eq!(resolved.text_align, "center");
        assert!(resolved.text_css().is_empty());
    }

    #[test]
    fn unsafe_values_are_rejected() {
        let style = SectionStyle {
            background_color: Some("red;position:fixed".into()),
            text_color: Some("rgb(1, 2, 3)".into()),
            font_size: Some("12px;}".into()),
            columns: Some(40),
            overlay_opacity: Some(3.0),
            ..Default::default()
        };
        let resolved = ResolvedStyle::resolve(&style);
        assert_eq!(resolved.background, FALLBACK_BACKGROUND);
        assert_eq!(resolved.text_color, "rgb(1, 2, 3)");
        assert_eq!(resolved.font_size, None);
        assert_eq!(resolved.columns, MAX_COLUMNS);
        assert_eq!(resolved.overlay_opacity, 1.0);
    }

    #[test]
    fn font_scale_and_lengths() {
        assert_eq!(font_size_css("4xl").as_deref(), Some("2.25rem"));
        assert_eq!(font_size_css("18").as_deref(), Some("18px"));
        assert_eq!(font_size_css("1.5em").as_deref(), Some("1.5em"));
        assert_eq!(font_size_css("big"), None);
        assert_eq!(font_weight_css("semibold").as_deref(), Some("600"));
        assert_eq!(font_weight_css("950"), None);
    }
}
