//! Web UI for the claim verification demo.
//!
//! Serves a single page: pick a sample document or paste text, click
//! Analyze, and read per-claim verdicts with highlighted evidence.

pub mod handlers;
pub mod page;

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};

use crate::adapters::{ClaimAnalyzer, ClaimsApiClient};
use crate::config::ResolvedConfig;
use crate::core::SessionStore;
use crate::domain::{ExampleSet, MAX_TEXT_CHARS};

/// Largest accepted form body: every allowed character may take four UTF-8
/// bytes, each percent-encoded to three, plus room for the other fields
pub const FORM_LIMIT: usize = MAX_TEXT_CHARS * 4 * 3 + 8 * 1024;

/// Shared state for all handlers
pub struct AppState {
    pub examples: ExampleSet,
    pub analyzer: Arc<dyn ClaimAnalyzer>,
    pub sessions: SessionStore,
    /// Path of the page icon
    pub favicon: PathBuf,
}

impl AppState {
    pub fn new(
        examples: ExampleSet,
        analyzer: Arc<dyn ClaimAnalyzer>,
        sessions: SessionStore,
        favicon: PathBuf,
    ) -> Self {
        Self {
            examples,
            analyzer,
            sessions,
            favicon,
        }
    }

    /// Build state from configuration: load examples and create the API client
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let examples = ExampleSet::load(&config.examples_path())?;
        let analyzer = ClaimsApiClient::new(&config.api)
            .context("Failed to create claim analysis client")?;

        Ok(Self::new(
            examples,
            Arc::new(analyzer),
            SessionStore::new(config.session_idle_minutes),
            config.favicon_path(),
        ))
    }
}

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .limit(FORM_LIMIT)
            .error_handler(handlers::form_error),
    )
    .service(handlers::index)
    .service(handlers::analyze)
    .service(handlers::favicon)
    .service(handlers::liveness);
}

/// Run the web UI until the server shuts down
pub async fn serve(config: &ResolvedConfig) -> Result<()> {
    let state = web::Data::new(AppState::from_config(config)?);
    let bind_addr = config.bind_addr();

    tracing::info!(
        addr = %bind_addr,
        endpoint = %config.api.claims,
        examples = state.examples.len(),
        "Starting SciClaims demo server"
    );

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind {}", bind_addr))?
        .run()
        .await
        .context("Server error")
}
