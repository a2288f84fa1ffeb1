//! Integration tests for page storage.

use pagecraft_core::section::{Section, SectionContent, SectionType};
use pagecraft_db::models::page::CreatePage;
use pagecraft_db::repositories::PageRepo;
use serde_json::json;
use sqlx::PgPool;

fn new_page(slug: &str, sections: Vec<Section>) -> CreatePage {
    CreatePage {
        name: "Welcome".to_string(),
        slug: slug.to_string(),
        sections,
        is_builder_template: None,
        legacy_content: None,
        thumbnail_url: None,
        user_id: None,
    }
}

// ---------------------------------------------------------------------------
// Test: create and fetch by id and slug
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_fetch(pool: PgPool) {
    let sections = vec![Section::new(SectionType::Headline), Section::new(SectionType::Cta)];
    let page = PageRepo::create(&pool, &new_page("welcome", sections.clone()))
        .await
        .unwrap();
    assert!(page.is_builder_template);
    assert_eq!(page.section_list(), sections);

    let by_id = PageRepo::find_by_id(&pool, page.id).await.unwrap().unwrap();
    assert_eq!(by_id.slug, "welcome");

    let by_slug = PageRepo::find_by_slug(&pool, "welcome").await.unwrap().unwrap();
    assert_eq!(by_slug.id, page.id);

    assert!(PageRepo::find_by_slug(&pool, "missing").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: slugs are unique
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_slug_is_rejected(pool: PgPool) {
    PageRepo::create(&pool, &new_page("taken", vec![])).await.unwrap();
    let result = PageRepo::create(&pool, &new_page("taken", vec![])).await;
    assert!(result.is_err(), "Duplicate slug should fail");
}

// ---------------------------------------------------------------------------
// Test: update overwrites the section list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_sections_overwrites(pool: PgPool) {
    let page = PageRepo::create(&pool, &new_page("edit-me", vec![Section::new(SectionType::Body)]))
        .await
        .unwrap();

    let replacement = vec![Section::new(SectionType::Faq)];
    let updated = PageRepo::update_sections(&pool, page.id, &replacement)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.section_list(), replacement);

    assert!(PageRepo::update_sections(&pool, 999_999, &replacement)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: stored sections from another client decode leniently
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_stored_types_survive(pool: PgPool) {
    let page = PageRepo::create(&pool, &new_page("mixed", vec![])).await.unwrap();
    sqlx::query("UPDATE pages SET sections = $2 WHERE id = $1")
        .bind(page.id)
        .bind(json!([
            {"id": "a", "type": "hologram", "content": {"beam": 1}},
            {"id": "b", "type": "headline", "content": {"text": "Hi"}},
            "not a section"
        ]))
        .execute(&pool)
        .await
        .unwrap();

    let page = PageRepo::find_by_id(&pool, page.id).await.unwrap().unwrap();
    let sections = page.section_list();
    assert_eq!(sections.len(), 2);
    assert!(matches!(&sections[0].content, SectionContent::Unknown { type_tag, .. } if type_tag == "hologram"));
    assert_eq!(sections[1].section_type(), Some(SectionType::Headline));
}
