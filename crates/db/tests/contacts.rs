//! Integration tests for contact storage and the core storage seams.

use pagecraft_core::delivery::{PageResolver, PageTemplate};
use pagecraft_core::generation::{generate_access_token, ContactStore, NewContact};
use pagecraft_core::section::{Section, SectionType};
use pagecraft_db::models::campaign::CreateCampaign;
use pagecraft_db::models::page::CreatePage;
use pagecraft_db::repositories::{CampaignRepo, ContactRepo, PageRepo};
use pagecraft_db::stores::{PgContactStore, PgPageResolver};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn campaign_with_page(pool: &PgPool) -> i64 {
    let page = PageRepo::create(
        pool,
        &CreatePage {
            name: "Hello {{first_name}}".to_string(),
            slug: format!("page-{}", generate_access_token().to_lowercase()),
            sections: vec![Section::new(SectionType::Headline)],
            is_builder_template: None,
            legacy_content: None,
            thumbnail_url: None,
            user_id: None,
        },
    )
    .await
    .unwrap();
    CampaignRepo::create(
        pool,
        &CreateCampaign {
            name: "Spring outreach".to_string(),
            page_id: Some(page.id),
            user_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_contact(first_name: &str, email: &str) -> NewContact {
    NewContact {
        token: generate_access_token(),
        first_name: first_name.to_string(),
        last_name: None,
        email: email.to_string(),
        company: Some("Acme".to_string()),
        custom_message: None,
    }
}

// ---------------------------------------------------------------------------
// Test: batch insert keeps order and shows up in existing emails
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_batch_and_existing_emails(pool: PgPool) {
    let campaign_id = campaign_with_page(&pool).await;
    let store = PgContactStore::new(pool.clone());

    let created = store
        .insert_contacts(
            campaign_id,
            &[new_contact("Ann", "ann@acme.test"), new_contact("Bo", "bo@acme.test")],
        )
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].first_name, "Ann");
    assert_eq!(created[1].email.as_deref(), Some("bo@acme.test"));

    let mut emails = store.existing_emails(campaign_id).await.unwrap();
    emails.sort();
    assert_eq!(emails, vec!["ann@acme.test", "bo@acme.test"]);

    let listed = ContactRepo::list_by_campaign(&pool, campaign_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|c| c.view_count == 0));
}

// ---------------------------------------------------------------------------
// Test: a duplicate token rolls back the whole batch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn batch_is_atomic(pool: PgPool) {
    let campaign_id = campaign_with_page(&pool).await;
    let first = new_contact("Ann", "ann@acme.test");
    let mut clash = new_contact("Bo", "bo@acme.test");
    clash.token = first.token.clone();

    let result = ContactRepo::insert_batch(&pool, campaign_id, &[first, clash]).await;
    assert!(result.is_err(), "Duplicate token should fail");
    assert!(ContactRepo::list_by_campaign(&pool, campaign_id)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Test: resolver joins contact, campaign, and page
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolver_finds_page_by_token(pool: PgPool) {
    let campaign_id = campaign_with_page(&pool).await;
    let contact = ContactRepo::insert_batch(&pool, campaign_id, &[new_contact("Ann", "ann@acme.test")])
        .await
        .unwrap()
        .remove(0);

    let resolver = PgPageResolver::new(pool.clone());
    let resolved = resolver.resolve(&contact.token).await.unwrap().unwrap();
    assert_eq!(resolved.contact.first_name, "Ann");
    assert!(matches!(resolved.template, PageTemplate::Builder { ref sections, .. } if sections.len() == 1));

    assert!(resolver.resolve("unknown-token").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: view tracking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_view_increments(pool: PgPool) {
    let campaign_id = campaign_with_page(&pool).await;
    let contact = ContactRepo::insert_batch(&pool, campaign_id, &[new_contact("Ann", "ann@acme.test")])
        .await
        .unwrap()
        .remove(0);

    assert!(ContactRepo::record_view(&pool, contact.id).await.unwrap());
    assert!(ContactRepo::record_view(&pool, contact.id).await.unwrap());

    let stored = ContactRepo::find_by_token(&pool, &contact.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.view_count, 2);
    assert!(stored.last_viewed_at.is_some());
}
