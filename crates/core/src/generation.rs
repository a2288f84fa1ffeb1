//! Bulk generation of personalized contacts from mapped import rows.
//!
//! Storage is reached through the [`ContactStore`] seam so the flow can run
//! against PostgreSQL in production and an in-memory store in tests.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::contact_import::MappedRow;
use crate::error::CoreError;
use crate::types::DbId;

/// Length of a generated access token.
pub const ACCESS_TOKEN_LEN: usize = 22;

/// Default number of contacts per insert batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Random URL-safe access token.
pub fn generate_access_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(ACCESS_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Which delivery route a personalized URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Builder,
    Legacy,
}

impl PageKind {
    pub fn from_builder_flag(is_builder_template: bool) -> Self {
        if is_builder_template {
            PageKind::Builder
        } else {
            PageKind::Legacy
        }
    }

    pub fn route_prefix(self) -> &'static str {
        match self {
            PageKind::Builder => "/p/",
            PageKind::Legacy => "/view/",
        }
    }
}

/// `<base>/p/<token>` or `<base>/view/<token>`.
pub fn personalized_url(base_url: &str, kind: PageKind, token: &str) -> String {
    format!("{}{}{token}", base_url.trim_end_matches('/'), kind.route_prefix())
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// A contact ready to insert, token already assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub token: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub company: Option<String>,
    pub custom_message: Option<String>,
}

/// The columns a bulk insert returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedContact {
    pub id: DbId,
    pub token: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    type Error: Display + Send;

    /// Emails already present in the campaign.
    async fn existing_emails(&self, campaign_id: DbId) -> Result<Vec<String>, Self::Error>;

    /// Insert one batch atomically.
    async fn insert_contacts(
        &self,
        campaign_id: DbId,
        contacts: &[NewContact],
    ) -> Result<Vec<CreatedContact>, Self::Error>;
}

// ---------------------------------------------------------------------------
// Run guard
// ---------------------------------------------------------------------------

/// Tracks which campaigns have a generation in flight.
#[derive(Debug, Default, Clone)]
pub struct GenerationGuard {
    running: Arc<Mutex<HashMap<DbId, Uuid>>>,
}

/// Proof that this caller owns the campaign's run; released on drop.
#[derive(Debug)]
pub struct RunTicket {
    campaign_id: DbId,
    run_id: Uuid,
    running: Arc<Mutex<HashMap<DbId, Uuid>>>,
}

impl GenerationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the campaign, or `None` if another run already holds it.
    pub fn try_begin(&self, campaign_id: DbId) -> Option<RunTicket> {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if running.contains_key(&campaign_id) {
            return None;
        }
        let run_id = Uuid::new_v4();
        running.insert(campaign_id, run_id);
        Some(RunTicket {
            campaign_id,
            run_id,
            running: Arc::clone(&self.running),
        })
    }

    pub fn is_running(&self, campaign_id: DbId) -> bool {
        self.running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&campaign_id)
    }

    /// Campaigns with a run in flight right now.
    pub fn running_count(&self) -> usize {
        self.running.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl RunTicket {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn campaign_id(&self) -> DbId {
        self.campaign_id
    }
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if running.get(&self.campaign_id) == Some(&self.run_id) {
            running.remove(&self.campaign_id);
        }
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Every remaining row was written.
    Completed,
    /// At least one batch failed.
    Partial,
    /// Every row's email already existed in the campaign; nothing written.
    AllExist,
    /// No importable rows were supplied.
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedContact {
    #[serde(flatten)]
    pub contact: CreatedContact,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub status: GenerationStatus,
    pub created: Vec<GeneratedContact>,
    pub failed: usize,
    pub skipped_existing: usize,
    pub skipped_duplicate_in_import: usize,
}

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOptions<'a> {
    pub batch_size: usize,
    pub base_url: &'a str,
    pub page_kind: PageKind,
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create one contact per new email in `rows` and report the outcome.
///
/// Rows whose email already exists in the campaign, or repeats an earlier
/// row, are skipped. Batches are written in order; a failed batch counts
/// its rows as failed and the run continues with the next one.
pub async fn generate<S: ContactStore>(
    store: &S,
    ticket: &RunTicket,
    rows: Vec<MappedRow>,
    opts: &GenerationOptions<'_>,
) -> Result<GenerationReport, CoreError> {
    let campaign_id = ticket.campaign_id();
    let mut report = GenerationReport {
        run_id: ticket.run_id(),
        status: GenerationStatus::Empty,
        created: Vec::new(),
        failed: 0,
        skipped_existing: 0,
        skipped_duplicate_in_import: 0,
    };
    if rows.is_empty() {
        return Ok(report);
    }

    let existing: HashSet<String> = store
        .existing_emails(campaign_id)
        .await
        .map_err(|e| CoreError::Internal(format!("failed to load existing contacts: {e}")))?
        .iter()
        .map(|e| email_key(e))
        .collect();

    let mut seen = HashSet::new();
    let mut pending = Vec::with_capacity(rows.len());
    for row in rows {
        let key = email_key(&row.email);
        if existing.contains(&key) {
            report.skipped_existing += 1;
        } else if !seen.insert(key) {
            report.skipped_duplicate_in_import += 1;
        } else {
            pending.push(NewContact {
                token: generate_access_token(),
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email.trim().to_string(),
                company: row.company,
                custom_message: row.custom_message,
            });
        }
    }

    if pending.is_empty() {
        report.status = if report.skipped_existing > 0 {
            GenerationStatus::AllExist
        } else {
            GenerationStatus::Empty
        };
        tracing::info!(campaign_id, run_id = %report.run_id, "All contacts already exist, nothing to generate");
        return Ok(report);
    }

    for (index, batch) in pending.chunks(opts.batch_size.max(1)).enumerate() {
        match store.insert_contacts(campaign_id, batch).await {
            Ok(created) => {
                report.created.extend(created.into_iter().map(|contact| GeneratedContact {
                    url: personalized_url(opts.base_url, opts.page_kind, &contact.token),
                    contact,
                }));
            }
            Err(e) => {
                tracing::warn!(
                    campaign_id,
                    run_id = %report.run_id,
                    batch = index,
                    rows = batch.len(),
                    error = %e,
                    "Contact batch insert failed",
                );
                report.failed += batch.len();
            }
        }
    }

    report.status = if report.failed == 0 {
        GenerationStatus::Completed
    } else {
        GenerationStatus::Partial
    };
    tracing::info!(
        campaign_id,
        run_id = %report.run_id,
        created = report.created.len(),
        failed = report.failed,
        skipped_existing = report.skipped_existing,
        "Generation finished",
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        contacts: Mutex<Vec<(DbId, NewContact)>>,
        fail_batches: Vec<usize>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContactStore for MemoryStore {
        type Error = String;

        async fn existing_emails(&self, campaign_id: DbId) -> Result<Vec<String>, String> {
            Ok(self
                .contacts
                .lock()
                .unwrap()
                .iter()
                .filter(|(c, _)| *c == campaign_id)
                .map(|(_, n)| n.email.clone())
                .collect())
        }

        async fn insert_contacts(
            &self,
            campaign_id: DbId,
            contacts: &[NewContact],
        ) -> Result<Vec<CreatedContact>, String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_batches.contains(&call) {
                return Err(format!("batch {call} rejected"));
            }
            let mut stored = self.contacts.lock().unwrap();
            Ok(contacts
                .iter()
                .map(|c| {
                    stored.push((campaign_id, c.clone()));
                    CreatedContact {
                        id: stored.len() as DbId,
                        token: c.token.clone(),
                        first_name: c.first_name.clone(),
                        last_name: c.last_name.clone(),
                        email: Some(c.email.clone()),
                        company: c.company.clone(),
                    }
                })
                .collect())
        }
    }

    fn row(email: &str) -> MappedRow {
        MappedRow {
            email: email.to_string(),
            first_name: "Ann".to_string(),
            last_name: None,
            company: None,
            custom_message: None,
        }
    }

    fn opts(batch_size: usize) -> GenerationOptions<'static> {
        GenerationOptions {
            batch_size,
            base_url: "https://pages.test/",
            page_kind: PageKind::Builder,
        }
    }

    #[test]
    fn tokens_are_url_safe_and_distinct() {
        let a = generate_access_token();
        let b = generate_access_token();
        assert_eq!(a.len(), ACCESS_TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn urls_by_page_kind() {
        assert_eq!(personalized_url("https://x.test/", PageKind::Builder, "t1"), "https://x.test/p/t1");
        assert_eq!(personalized_url("https://x.test", PageKind::Legacy, "t1"), "https://x.test/view/t1");
    }

    #[test]
    fn guard_blocks_second_run_until_ticket_drops() {
        let guard = GenerationGuard::new();
        let ticket = guard.try_begin(7).unwrap();
        assert!(guard.try_begin(7).is_none());
        assert!(guard.try_begin(8).is_some());
        assert!(guard.is_running(7));
        assert_eq!(guard.running_count(), 1);
        drop(ticket);
        assert!(!guard.is_running(7));
        assert_eq!(guard.running_count(), 0);
        assert!(guard.try_begin(7).is_some());
    }

    #[tokio::test]
    async fn creates_contacts_with_urls() {
        let store = MemoryStore::default();
        let guard = GenerationGuard::new();
        let ticket = guard.try_begin(1).unwrap();

        let report = generate(&store, &ticket, vec![row("a@x.com"), row("b@x.com")], &opts(50))
            .await
            .unwrap();
        assert_eq!(report.status, GenerationStatus::Completed);
        assert_eq!(report.run_id, ticket.run_id());
        assert_eq!(report.created.len(), 2);
        let first = &report.created[0];
        assert_eq!(first.url, format!("https://pages.test/p/{}", first.contact.token));
    }

    #[tokio::test]
    async fn existing_emails_are_skipped_per_campaign() {
        let store = MemoryStore::default();
        let guard = GenerationGuard::new();

        let ticket = guard.try_begin(1).unwrap();
        generate(&store, &ticket, vec![row("dup@x.com")], &opts(50)).await.unwrap();

        let again = generate(&store, &ticket, vec![row(" DUP@x.com ")], &opts(50)).await.unwrap();
        assert_eq!(again.status, GenerationStatus::AllExist);
        assert!(again.created.is_empty());
        assert_eq!(again.skipped_existing, 1);
        drop(ticket);

        let other = guard.try_begin(2).unwrap();
        let report = generate(&store, &other, vec![row("dup@x.com")], &opts(50)).await.unwrap();
        assert_eq!(report.status, GenerationStatus::Completed);
        assert_eq!(report.created.len(), 1);
        assert_eq!(store.contacts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicates_within_import_are_skipped() {
        let store = MemoryStore::default();
        let ticket = GenerationGuard::new().try_begin(1).unwrap();
        let report = generate(
            &store,
            &ticket,
            vec![row("a@x.com"), row("A@X.com"), row("b@x.com")],
            &opts(50),
        )
        .await
        .unwrap();
        assert_eq!(report.created.len(), 2);
        assert_eq!(report.skipped_duplicate_in_import, 1);
    }

    #[tokio::test]
    async fn failed_batch_does_not_abort_the_rest() {
        let store = MemoryStore {
            fail_batches: vec![1],
            ..Default::default()
        };
        let ticket = GenerationGuard::new().try_begin(1).unwrap();
        let rows = (0..5).map(|i| row(&format!("u{i}@x.com"))).collect();

        let report = generate(&store, &ticket, rows, &opts(2)).await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.status, GenerationStatus::Partial);
        assert_eq!(report.failed, 2);
        assert_eq!(report.created.len(), 3);
    }

    #[tokio::test]
    async fn no_rows_is_empty() {
        let store = MemoryStore::default();
        let ticket = GenerationGuard::new().try_begin(1).unwrap();
        let report = generate(&store, &ticket, Vec::new(), &opts(50)).await.unwrap();
        assert_matches!(report.status, GenerationStatus::Empty);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }
}
