//! Handlers for the `/campaigns` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagecraft_core::error::CoreError;
use pagecraft_core::generation::{personalized_url, PageKind};
use pagecraft_core::types::{DbId, Timestamp};
use pagecraft_db::models::campaign::{Campaign, CreateCampaign};
use pagecraft_db::repositories::{CampaignRepo, ContactRepo, PageRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) async fn load_campaign(state: &AppState, id: DbId) -> AppResult<Campaign> {
    CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Campaign", id)))
}

/// Route family for a campaign's contacts. Campaigns without a page use
/// builder routes.
pub(crate) async fn campaign_page_kind(state: &AppState, campaign_id: DbId) -> AppResult<PageKind> {
    let page = PageRepo::find_by_campaign(&state.pool, campaign_id).await?;
    Ok(page.map_or(PageKind::Builder, |p| PageKind::from_builder_flag(p.is_builder_template)))
}

// ---------------------------------------------------------------------------
// POST /api/v1/campaigns
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub page_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCampaignRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(page_id) = input.page_id {
        if PageRepo::find_by_id(&state.pool, page_id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Page {page_id} does not exist"
            ))));
        }
    }
    let campaign = CampaignRepo::create(
        &state.pool,
        &CreateCampaign {
            name: input.name,
            page_id: input.page_id,
            user_id: input.user_id,
        },
    )
    .await?;
    tracing::info!(campaign_id = campaign.id, "Campaign created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

// ---------------------------------------------------------------------------
// GET /api/v1/campaigns/{id}
// ---------------------------------------------------------------------------

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = load_campaign(&state, id).await?;
    Ok(Json(DataResponse { data: campaign }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/campaigns/{id}/contacts
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ContactSummary {
    pub id: DbId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub view_count: i32,
    pub last_viewed_at: Option<Timestamp>,
    pub url: String,
}

pub async fn list_contacts(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_campaign(&state, id).await?;
    let kind = campaign_page_kind(&state, id).await?;
    let base_url = &state.config.public_base_url;

    let data: Vec<ContactSummary> = ContactRepo::list_by_campaign(&state.pool, id)
        .await?
        .into_iter()
        .map(|c| ContactSummary {
            url: personalized_url(base_url, kind, &c.token),
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            company: c.company,
            view_count: c.view_count,
            last_viewed_at: c.last_viewed_at,
        })
        .collect();
    Ok(Json(DataResponse { data }))
}
