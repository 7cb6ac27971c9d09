//! HTTP surface: one word-pair endpoint plus a health check.
//!
//! | Route | Input |
//! |-------|-------|
//! | `POST /generate-word-pair` | JSON `{minLevel?, maxLevel?, domain?}` |
//! | `GET /generate-word-pair` | query `minLevel`, `maxLevel`, `domain=a,b` |
//! | `GET /health` | none |
//!
//! Every failure is answered with `{"error": "..."}`.

use crate::config::toml_config::ServiceConfig;
use crate::core::engine::PairEngine;
use crate::domain::ports::{ModelSettingsProvider, TextGenerator};
use crate::utils::error::{ErrorCategory, Result, WordWolfError};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const PAIR_ROUTE: &str = "/generate-word-pair";

pub struct AppState<G: TextGenerator, C: ModelSettingsProvider> {
    pub engine: PairEngine<G, C>,
    pub config: ServiceConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRequest {
    pub min_level: Option<u8>,
    pub max_level: Option<u8>,
    pub domain: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairQuery {
    pub min_level: Option<u8>,
    pub max_level: Option<u8>,
    /// Comma-separated.
    pub domain: Option<String>,
}

impl From<PairQuery> for PairRequest {
    fn from(query: PairQuery) -> Self {
        Self {
            min_level: query.min_level,
            max_level: query.max_level,
            domain: query
                .domain
                .map(|d| d.split(',').map(str::to_string).collect()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for WordWolfError {
    fn into_response(self) -> Response {
        let status = match self.category() {
            ErrorCategory::Configuration => StatusCode::BAD_REQUEST,
            ErrorCategory::ExternalService | ErrorCategory::InvalidResponse => {
                StatusCode::BAD_GATEWAY
            }
            ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.user_friendly_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router<G, C>(state: Arc<AppState<G, C>>) -> Router
where
    G: TextGenerator + 'static,
    C: ModelSettingsProvider + 'static,
{
    Router::new()
        .route(PAIR_ROUTE, get(generate_from_query::<G, C>).post(generate_from_body::<G, C>))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate_from_query<G, C>(
    State(state): State<Arc<AppState<G, C>>>,
    query: std::result::Result<Query<PairQuery>, axum::extract::rejection::QueryRejection>,
) -> Response
where
    G: TextGenerator + 'static,
    C: ModelSettingsProvider + 'static,
{
    match query {
        Ok(Query(query)) => respond(handle(&state, query.into()).await),
        Err(rejection) => bad_request(rejection.body_text()),
    }
}

async fn generate_from_body<G, C>(
    State(state): State<Arc<AppState<G, C>>>,
    body: std::result::Result<Json<PairRequest>, axum::extract::rejection::JsonRejection>,
) -> Response
where
    G: TextGenerator + 'static,
    C: ModelSettingsProvider + 'static,
{
    match body {
        Ok(Json(request)) => respond(handle(&state, request).await),
        Err(rejection) => bad_request(rejection.body_text()),
    }
}

async fn handle<G, C>(state: &AppState<G, C>, request: PairRequest) -> Result<crate::WordPair>
where
    G: TextGenerator,
    C: ModelSettingsProvider,
{
    tracing::info!(
        "Word pair requested: minLevel={:?}, maxLevel={:?}, domain={:?}",
        request.min_level,
        request.max_level,
        request.domain
    );
    let config = state
        .config
        .resolve_request(request.min_level, request.max_level, request.domain)?;
    state.engine.generate_pair(&config).await
}

fn respond(result: Result<crate::WordPair>) -> Response {
    match result {
        Ok(pair) => Json(pair).into_response(),
        Err(e) => {
            tracing::error!(
                "Word pair generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            e.into_response()
        }
    }
}

fn bad_request(detail: String) -> Response {
    tracing::warn!("Rejected malformed request: {}", detail);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: format!("Invalid request: {}", detail),
        }),
    )
        .into_response()
}

/// Binds and serves until the process is stopped.
pub async fn serve<G, C>(state: Arc<AppState<G, C>>) -> Result<()>
where
    G: TextGenerator + 'static,
    C: ModelSettingsProvider + 'static,
{
    let address = state.config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Listening on http://{}", address);
    axum::serve(listener, router(state))
        .await
        .map_err(|e| WordWolfError::ServerError {
            message: e.to_string(),
        })
}
