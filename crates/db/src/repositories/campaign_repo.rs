//! Repository for the `campaigns` table.

use pagecraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::{Campaign, CreateCampaign};

const COLUMNS: &str = "id, name, page_id, user_id, created_at, updated_at";

/// Provides storage operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new campaign, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCampaign) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (name, page_id, user_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(&input.name)
            .bind(input.page_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
