//! Presentation attributes shared by every section type.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Optional presentation attributes. `None` means "use the renderer's
/// fallback", never "unset".
///
/// Numeric fields accept numbers or numeric strings; anything else reads as
/// `None` rather than failing the whole record. Keys this build does not
/// know are kept in `extra` so a save round-trips them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Scale step (`sm` .. `5xl`) or a CSS length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_u32"
    )]
    pub padding_y: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_u32"
    )]
    pub padding_x: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_u32"
    )]
    pub max_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_u32"
    )]
    pub columns: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_u32"
    )]
    pub height: Option<u32>,
    /// 0.0 ..= 1.0 darkening over a background image or video.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_f64"
    )]
    pub overlay_opacity: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_u32"
    )]
    pub border_radius: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_number(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches("px").trim().parse().ok(),
        _ => None,
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(lenient_number(value)
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n.round() as u32))
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(lenient_number(value).filter(|n| n.is_finite()))
}
