//! Campaign membership endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use canvass_core::repository::CampaignRepository;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JoinRequest {
    user_id: Uuid,
}

pub async fn join(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JoinRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // The campaign must exist before the membership write.
    let campaign = state.campaigns.get_by_id(id).await?;
    state
        .accounts
        .join_campaign(payload.user_id, campaign.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
