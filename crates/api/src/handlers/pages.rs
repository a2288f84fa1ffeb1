//! Handlers for the `/pages` resource: storage, canvas edits, and preview.

use std::sync::LazyLock;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use pagecraft_core::builder::{Canvas, CanvasOp};
use pagecraft_core::delivery::{LegacyTemplate, PageTemplate};
use pagecraft_core::error::CoreError;
use pagecraft_core::render::{render_editing_page, RenderOptions};
use pagecraft_core::section::{Section, SectionId};
use pagecraft_core::substitution::RecipientData;
use pagecraft_core::types::DbId;
use pagecraft_db::models::page::{CreatePage, Page};
use pagecraft_db::repositories::PageRepo;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("must be lowercase letters, digits, and single hyphens".into()))
    }
}

async fn load_page(state: &AppState, id: DbId) -> AppResult<Page> {
    PageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", id)))
}

// ---------------------------------------------------------------------------
// POST /api/v1/pages
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePageRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 120), custom(function = "validate_slug"))]
    pub slug: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    pub is_builder_template: Option<bool>,
    pub legacy_content: Option<LegacyTemplate>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
    pub user_id: Option<DbId>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePageRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let page = PageRepo::create(
        &state.pool,
        &CreatePage {
            name: input.name,
            slug: input.slug,
            sections: input.sections,
            is_builder_template: input.is_builder_template,
            legacy_content: input.legacy_content,
            thumbnail_url: input.thumbnail_url,
            user_id: input.user_id,
        },
    )
    .await?;
    tracing::info!(page_id = page.id, slug = %page.slug, "Page created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

// ---------------------------------------------------------------------------
// GET /api/v1/pages/{id}
// ---------------------------------------------------------------------------

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = load_page(&state, id).await?;
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/pages/by-slug/{slug}
// ---------------------------------------------------------------------------

pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", &slug)))?;
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// PUT /api/v1/pages/{id}/sections
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReplaceSections {
    pub sections: Vec<Section>,
}

/// Save a whole section list from the builder. Each save overwrites.
pub async fn replace_sections(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReplaceSections>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::update_sections(&state.pool, id, &input.sections)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", id)))?;
    tracing::info!(page_id = id, count = input.sections.len(), "Page sections saved");
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// PATCH /api/v1/pages/{id}/sections
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ApplyOps {
    pub ops: Vec<CanvasOp>,
}

#[derive(Debug, Serialize)]
pub struct CanvasState {
    pub sections: Vec<Section>,
    pub selected: Option<SectionId>,
}

/// Replay a batch of editor operations on the stored list and save it.
///
/// Operations apply in order. The first failing operation rejects the whole
/// batch and nothing is saved.
pub async fn apply_ops(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApplyOps>,
) -> AppResult<impl IntoResponse> {
    let page = load_page(&state, id).await?;
    let mut canvas = Canvas::new(page.section_list());
    let op_count = input.ops.len();
    for op in input.ops {
        canvas.apply(op)?;
    }

    let selected = canvas.selected().cloned();
    let sections = canvas.into_sections();
    PageRepo::update_sections(&state.pool, id, &sections)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", id)))?;
    tracing::debug!(page_id = id, op_count, "Canvas operations applied");

    Ok(Json(DataResponse {
        data: CanvasState { sections, selected },
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/pages/{id}/preview
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    /// Sample recipient values. Without them, tokens show unfilled.
    pub personalization: Option<RecipientData>,
    /// Section to outline as selected.
    pub selected: Option<SectionId>,
}

/// Render the stored page as the builder shows it.
pub async fn preview(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PreviewRequest>,
) -> AppResult<Html<String>> {
    let page = load_page(&state, id).await?;
    let opts = RenderOptions {
        personalization: input.personalization.as_ref(),
        ..Default::default()
    };
    let html = match page.template() {
        PageTemplate::Builder { name, sections } => {
            render_editing_page(&name, &sections, input.selected.as_ref(), &opts)
        }
        PageTemplate::Legacy { name, content } => {
            render_editing_page(&name, &content.to_sections(), None, &opts)
        }
    };
    Ok(Html(html))
}
