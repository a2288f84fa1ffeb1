//! Campaign entity model and DTOs.

use pagecraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A campaign row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub name: String,
    pub page_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new campaign.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaign {
    pub name: String,
    pub page_id: Option<DbId>,
    pub user_id: Option<DbId>,
}
