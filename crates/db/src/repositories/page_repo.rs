//! Repository for the `pages` table.

use pagecraft_core::section::Section;
use pagecraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::{encode_sections, CreatePage, Page};

const COLUMNS: &str = "id, name, slug, sections, is_builder_template, legacy_content, \
    thumbnail_url, user_id, created_at, updated_at";

/// Provides storage operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePage) -> Result<Page, sqlx::Error> {
        let sections = encode_sections(&input.sections).map_err(|e| sqlx::Error::Encode(e.into()))?;
        let legacy = input
            .legacy_content
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| sqlx::Error::Encode(e.into()))?;
        let query = format!(
            "INSERT INTO pages \
                (name, slug, sections, is_builder_template, legacy_content, thumbnail_url, user_id) \
             VALUES ($1, $2, $3, COALESCE($4, true), $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(sections)
            .bind(input.is_builder_template)
            .bind(legacy)
            .bind(&input.thumbnail_url)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// The page a campaign currently points at, if any.
    pub async fn find_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM pages p JOIN campaigns c ON c.page_id = p.id WHERE c.id = $1",
            prefixed_columns("p")
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the section list of a page.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_sections(
        pool: &PgPool,
        id: DbId,
        sections: &[Section],
    ) -> Result<Option<Page>, sqlx::Error> {
        let sections = encode_sections(sections).map_err(|e| sqlx::Error::Encode(e.into()))?;
        let query = format!("UPDATE pages SET sections = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(sections)
            .fetch_optional(pool)
            .await
    }
}

fn prefixed_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
