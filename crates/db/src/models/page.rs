//! Page entity model and DTOs.

use pagecraft_core::delivery::{LegacyTemplate, PageTemplate};
use pagecraft_core::section::Section;
use pagecraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A page row from the `pages` table.
///
/// `sections` holds the stored section array. Individual sections decode
/// leniently: unknown types survive as-is and malformed payloads fall back
/// to defaults.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub sections: serde_json::Value,
    pub is_builder_template: bool,
    pub legacy_content: Option<serde_json::Value>,
    pub thumbnail_url: Option<String>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    /// Decode the stored section list. Entries that are not section objects
    /// at all are dropped.
    pub fn section_list(&self) -> Vec<Section> {
        decode_sections(&self.sections)
    }

    pub fn legacy_template(&self) -> LegacyTemplate {
        match &self.legacy_content {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                tracing::warn!(page_id = self.id, error = %e, "Malformed legacy content, using blanks");
                LegacyTemplate::default()
            }),
            None => LegacyTemplate::default(),
        }
    }

    /// The renderable form of this page.
    pub fn template(&self) -> PageTemplate {
        if self.is_builder_template {
            PageTemplate::Builder {
                name: self.name.clone(),
                sections: self.section_list(),
            }
        } else {
            PageTemplate::Legacy {
                name: self.name.clone(),
                content: self.legacy_template(),
            }
        }
    }
}

pub fn decode_sections(value: &serde_json::Value) -> Vec<Section> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Section>(item.clone()) {
            Ok(section) => Some(section),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping unreadable stored section");
                None
            }
        })
        .collect()
}

pub fn encode_sections(sections: &[Section]) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(sections)
}

/// DTO for creating a new page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Defaults to `true` if omitted.
    pub is_builder_template: Option<bool>,
    pub legacy_content: Option<LegacyTemplate>,
    pub thumbnail_url: Option<String>,
    pub user_id: Option<DbId>,
}
