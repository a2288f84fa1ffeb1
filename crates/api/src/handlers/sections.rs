//! Handlers for section type metadata.

use axum::response::IntoResponse;
use axum::Json;
use pagecraft_core::section::{default_content, default_style, SectionCategory, SectionStyle, SectionType};
use serde::Serialize;

use crate::response::DataResponse;

/// One entry of the add-section menu.
#[derive(Debug, Serialize)]
pub struct SectionTypeInfo {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub label: &'static str,
    pub category: SectionCategory,
    pub content: serde_json::Value,
    pub style: SectionStyle,
}

// ---------------------------------------------------------------------------
// GET /api/v1/sections/types
// ---------------------------------------------------------------------------

pub async fn list_types() -> impl IntoResponse {
    let data: Vec<SectionTypeInfo> = SectionType::ALL
        .iter()
        .map(|&ty| SectionTypeInfo {
            section_type: ty,
            label: ty.label(),
            category: ty.category(),
            content: default_content(ty).to_value(),
            style: default_style(ty),
        })
        .collect();
    Json(DataResponse { data })
}
