//! Account endpoints: registration, login, profile completion and
//! update, password recovery.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use canvass_core::mail::{MailMessage, Mailer};
use canvass_core::models::user::{CompleteProfile, CreateAccount, UpdateProfile};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAccount>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.create_account(payload).await?;
    Ok((StatusCode::CREATED, Json(user.into_public())))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .accounts
        .authenticate(&payload.email, &payload.password)
        .await?;
    Ok(Json(user))
}

pub async fn complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CompleteProfile>,
) -> Result<impl IntoResponse, ApiError> {
    state.accounts.complete_profile(&id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProfile>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.update_profile(&id, payload).await?;
    Ok(Json(user.into_public()))
}

#[derive(Deserialize)]
pub struct BeginResetRequest {
    email: String,
}

pub async fn begin_password_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BeginResetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let code = state.accounts.begin_password_reset(&payload.email).await?;

    state
        .mailer
        .send(&MailMessage {
            to: vec![payload.email.trim().to_lowercase()],
            subject: "Reset your password".into(),
            html: format!(
                "<p>Use this code to reset your password: <strong>{code}</strong></p>"
            ),
        })
        .await?;

    Ok(StatusCode::ACCEPTED)
}

#[derive(Deserialize)]
pub struct ConfirmResetRequest {
    email: String,
    code: String,
    new_password: String,
}

pub async fn confirm_password_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ConfirmResetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .accounts
        .reset_password(&payload.email, &payload.code, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
