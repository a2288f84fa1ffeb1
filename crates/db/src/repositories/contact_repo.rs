//! Repository for the `contacts` table.

use pagecraft_core::generation::NewContact;
use pagecraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact::Contact;

const COLUMNS: &str = "id, campaign_id, token, first_name, last_name, email, company, \
    custom_message, view_count, last_viewed_at, created_at";

/// Provides storage operations for contacts.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a batch of contacts in one statement. Either every row is
    /// written or none is.
    pub async fn insert_batch(
        pool: &PgPool,
        campaign_id: DbId,
        contacts: &[NewContact],
    ) -> Result<Vec<Contact>, sqlx::Error> {
        if contacts.is_empty() {
            return Ok(vec![]);
        }

        let tokens: Vec<&str> = contacts.iter().map(|c| c.token.as_str()).collect();
        let first_names: Vec<&str> = contacts.iter().map(|c| c.first_name.as_str()).collect();
        let last_names: Vec<Option<&str>> = contacts.iter().map(|c| c.last_name.as_deref()).collect();
        let emails: Vec<&str> = contacts.iter().map(|c| c.email.as_str()).collect();
        let companies: Vec<Option<&str>> = contacts.iter().map(|c| c.company.as_deref()).collect();
        let messages: Vec<Option<&str>> =
            contacts.iter().map(|c| c.custom_message.as_deref()).collect();

        let query = format!(
            "INSERT INTO contacts \
                (campaign_id, token, first_name, last_name, email, company, custom_message) \
             SELECT $1, * FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[], $6::text[], $7::text[]) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(campaign_id)
            .bind(&tokens)
            .bind(&first_names)
            .bind(&last_names)
            .bind(&emails)
            .bind(&companies)
            .bind(&messages)
            .fetch_all(pool)
            .await
    }

    /// Non-null emails already stored for a campaign.
    pub async fn existing_emails(pool: &PgPool, campaign_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT email FROM contacts WHERE campaign_id = $1 AND email IS NOT NULL",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE token = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's contacts in insertion order.
    pub async fn list_by_campaign(pool: &PgPool, campaign_id: DbId) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE campaign_id = $1 ORDER BY id");
        sqlx::query_as::<_, Contact>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Bump the view counter. Returns `true` if a row was updated.
    pub async fn record_view(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contacts SET view_count = view_count + 1, last_viewed_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
