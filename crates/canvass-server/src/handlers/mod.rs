//! HTTP controllers: thin adapters translating requests into account
//! service and repository calls.

pub mod account;
pub mod admin;
pub mod campaign;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/accounts", post(account::register))
        .route("/accounts/login", post(account::login))
        .route("/accounts/{id}", patch(account::update))
        .route("/accounts/{id}/complete", post(account::complete))
        .route("/accounts/password-reset", post(account::begin_password_reset))
        .route(
            "/accounts/password-reset/confirm",
            post(account::confirm_password_reset),
        )
        .route("/campaigns/{id}/join", post(campaign::join))
        .route("/admin/campaigns/{id}/report", get(admin::submission_report))
        .route("/admin/mail", post(admin::broadcast_mail))
        .with_state(state)
}
