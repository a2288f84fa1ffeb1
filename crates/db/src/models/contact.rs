//! Contact entity model.

use pagecraft_core::delivery::ResolvedContact;
use pagecraft_core::generation::CreatedContact;
use pagecraft_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A contact row from the `contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub campaign_id: DbId,
    pub token: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub custom_message: Option<String>,
    pub view_count: i32,
    pub last_viewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<Contact> for CreatedContact {
    fn from(c: Contact) -> Self {
        CreatedContact {
            id: c.id,
            token: c.token,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            company: c.company,
        }
    }
}

impl From<Contact> for ResolvedContact {
    fn from(c: Contact) -> Self {
        ResolvedContact {
            id: c.id,
            token: c.token,
            first_name: c.first_name,
            last_name: c.last_name,
            company: c.company,
            custom_message: c.custom_message,
        }
    }
}
