//! CANVASS Server — application entry point.

mod config;
mod country;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use canvass_account::{AccountConfig, AccountService};
use canvass_db::{DbManager, SurrealCampaignRepository, SurrealUserRepository};
use canvass_mail::ResendMailer;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;
use crate::country::RestCountriesClient;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("canvass=info".parse().unwrap()),
        )
        .json()
        .init();

    let config = EnvConfig::from_env();

    let db = DbManager::connect(&config.db)
        .await
        .expect("failed to connect to SurrealDB");
    canvass_db::run_migrations(db.client())
        .await
        .expect("failed to run migrations");

    let users = match config.pepper.clone() {
        Some(pepper) => SurrealUserRepository::with_pepper(db.client().clone(), pepper),
        None => SurrealUserRepository::new(db.client().clone()),
    };
    let campaigns = SurrealCampaignRepository::new(db.client().clone());
    let countries = RestCountriesClient::new().expect("failed to build country client");
    let mailer = ResendMailer::new(config.resend_key.clone(), config.mail_from.clone())
        .expect("failed to build mail client");

    let accounts = AccountService::new(
        users.clone(),
        countries,
        AccountConfig {
            pepper: config.pepper.clone(),
            ..AccountConfig::default()
        },
    );

    let state = Arc::new(AppState {
        accounts,
        users,
        campaigns,
        mailer,
        admin_key: config.admin_key.clone(),
    });

    let app = handlers::router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    info!(%addr, "Starting CANVASS server");

    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
