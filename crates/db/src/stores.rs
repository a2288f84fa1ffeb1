//! PostgreSQL implementations of the core storage seams.

use async_trait::async_trait;
use pagecraft_core::delivery::{PageResolver, ResolvedPage};
use pagecraft_core::generation::{ContactStore, CreatedContact, NewContact};
use pagecraft_core::types::DbId;
use sqlx::PgPool;

use crate::repositories::{ContactRepo, PageRepo};

/// Contact writes for bulk generation.
#[derive(Debug, Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    type Error = sqlx::Error;

    async fn existing_emails(&self, campaign_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        ContactRepo::existing_emails(&self.pool, campaign_id).await
    }

    async fn insert_contacts(
        &self,
        campaign_id: DbId,
        contacts: &[NewContact],
    ) -> Result<Vec<CreatedContact>, sqlx::Error> {
        let rows = ContactRepo::insert_batch(&self.pool, campaign_id, contacts).await?;
        Ok(rows.into_iter().map(CreatedContact::from).collect())
    }
}

/// Token lookup for personalized delivery: contact, then its campaign's page.
#[derive(Debug, Clone)]
pub struct PgPageResolver {
    pool: PgPool,
}

impl PgPageResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageResolver for PgPageResolver {
    type Error = sqlx::Error;

    async fn resolve(&self, token: &str) -> Result<Option<ResolvedPage>, sqlx::Error> {
        let Some(contact) = ContactRepo::find_by_token(&self.pool, token).await? else {
            return Ok(None);
        };
        let Some(page) = PageRepo::find_by_campaign(&self.pool, contact.campaign_id).await? else {
            return Ok(None);
        };
        Ok(Some(ResolvedPage {
            contact: contact.into(),
            template: page.template(),
        }))
    }
}
