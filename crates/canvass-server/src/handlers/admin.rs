//! Admin endpoints: submission reports and mass mailing.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use canvass_core::error::CanvassError;
use canvass_core::mail::{MailMessage, Mailer};
use canvass_core::models::user::PublicUser;
use canvass_core::repository::{CampaignRepository, Pagination, UserRepository};
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Cap on concurrent user lookups while assembling a report.
const REPORT_LOOKUP_CONCURRENCY: usize = 30;

/// Page size when collecting recipient addresses.
const MAIL_PAGE_SIZE: u64 = 100;

fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<(), ApiError> {
    let supplied = headers
        .get("x-admin-key")
        .and_then(|value| value.to_str().ok());
    if supplied != Some(state.admin_key.as_str()) {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct ReportQuery {
    version: u32,
}

#[derive(Serialize)]
struct ReportRow {
    user: PublicUser,
    version: u32,
    answers: serde_json::Value,
    submitted_at: DateTime<Utc>,
}

/// Submission report for one campaign version.
///
/// User lookups fan out with a fixed concurrency cap and keep submission
/// order; a single failed lookup aborts the whole batch.
pub async fn submission_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&headers, &state)?;

    let campaign = state.campaigns.get_by_id(id).await?;
    let submissions = state
        .campaigns
        .submissions_for_version(campaign.id, query.version)
        .await?;

    let rows: Vec<ReportRow> = stream::iter(submissions.into_iter().map(|submission| {
        let users = state.users.clone();
        async move {
            let user = users.get_by_id(submission.user_id).await?;
            Ok::<_, CanvassError>(ReportRow {
                user: user.into_public(),
                version: submission.version,
                answers: submission.answers,
                submitted_at: submission.submitted_at,
            })
        }
    }))
    .buffered(REPORT_LOOKUP_CONCURRENCY)
    .try_collect()
    .await?;

    Ok(Json(serde_json::json!({
        "campaign": campaign,
        "submissions": rows,
    })))
}

#[derive(Deserialize)]
pub struct BroadcastRequest {
    subject: String,
    html: String,
}

/// Send a templated update mail to every registered address.
pub async fn broadcast_mail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<BroadcastRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&headers, &state)?;

    let mut recipients = Vec::new();
    let mut offset = 0;
    loop {
        let page = state
            .users
            .list(Pagination {
                offset,
                limit: MAIL_PAGE_SIZE,
            })
            .await?;
        let fetched = page.items.len() as u64;
        recipients.extend(page.items.into_iter().map(|user| user.email));
        offset += fetched;
        if fetched == 0 || offset >= page.total {
            break;
        }
    }

    if recipients.is_empty() {
        return Ok(Json(serde_json::json!({ "recipients": 0 })));
    }

    let count = recipients.len();
    state
        .mailer
        .send(&MailMessage {
            to: recipients,
            subject: payload.subject,
            html: payload.html,
        })
        .await?;

    info!(recipients = count, "Broadcast mail sent");

    Ok(Json(serde_json::json!({ "recipients": count })))
}
