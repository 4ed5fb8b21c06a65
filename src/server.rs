//! JSON HTTP API for the browser front end.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST` | `/ask` | Answer a free-text question |
//! | `POST` | `/resolve` | Raw resolver match for a question |
//! | `GET`  | `/topics` | List topic ids and triggers |
//! | `GET`  | `/topics/{id}` | Full topic entry |
//! | `GET`  | `/topics/{id}/related` | Related topic ids |
//! | `GET`  | `/weather` | Current weather in Banjul |
//! | `GET`  | `/rates` | Dalasi exchange rates |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must be a string" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404).
//!
//! "Nothing found" is not an error: `/ask` answers `200` with
//! `{"kind": "not_found", ...}`.

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::assistant::{Answer, Assistant};
use crate::config::Config;
use crate::exchange::ExchangeClient;
use crate::models::{ExchangeRates, MatchResult, TopicEntry, WeatherReport};
use crate::resolver::create_resolver;
use crate::summary::{create_summary_provider, SummaryProvider};
use crate::weather::{weather_icon, WeatherClient};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    assistant: Arc<Assistant>,
    weather: Arc<WeatherClient>,
    exchange: Arc<ExchangeClient>,
}

impl AppState {
    /// Build the resolver, summary provider and upstream clients from config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let resolver = create_resolver(config);
        let summaries: Arc<dyn SummaryProvider> =
            Arc::from(create_summary_provider(&config.summary)?);

        Ok(Self {
            assistant: Arc::new(Assistant::new(resolver, summaries, config)),
            weather: Arc::new(WeatherClient::new(&config.weather)?),
            exchange: Arc::new(ExchangeClient::new(&config.exchange)?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/ask", post(handle_ask))
        .route("/resolve", post(handle_resolve))
        .route("/topics", get(handle_list_topics))
        .route("/topics/{id}", get(handle_get_topic))
        .route("/topics/{id}/related", get(handle_related))
        .route("/weather", get(handle_weather))
        .route("/rates", get(handle_rates))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind` and runs until the process is
/// terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    tracing::info!(
        bind = %config.server.bind,
        summaries = config.summary.is_enabled(),
        "travel assistant listening"
    );
    println!("Travel assistant listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Pull the `query` string out of a request body.
///
/// Body rejections (malformed JSON, wrong content type) and a missing or
/// non-string `query` all map to `bad_request`.
fn query_param(body: Result<Json<Value>, JsonRejection>) -> Result<String, AppError> {
    let Json(body) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    match body.get("query") {
        Some(Value::String(q)) => Ok(q.clone()),
        Some(_) => Err(bad_request("query must be a string")),
        None => Err(bad_request("missing field: query")),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /ask, POST /resolve ============

async fn handle_ask(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Answer>, AppError> {
    let query = query_param(body)?;
    Ok(Json(state.assistant.answer(&query).await))
}

async fn handle_resolve(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MatchResult>, AppError> {
    let query = query_param(body)?;
    Ok(Json(state.assistant.resolve(&query)))
}

// ============ /topics ============

#[derive(Serialize)]
struct TopicSummary {
    id: String,
    triggers: Vec<String>,
}

#[derive(Serialize)]
struct TopicListResponse {
    topics: Vec<TopicSummary>,
}

async fn handle_list_topics(State(state): State<AppState>) -> Json<TopicListResponse> {
    let topics = state
        .assistant
        .resolver()
        .topics()
        .iter()
        .map(|t| TopicSummary {
            id: t.id.clone(),
            triggers: t.triggers.clone(),
        })
        .collect();
    Json(TopicListResponse { topics })
}

async fn handle_get_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TopicEntry>, AppError> {
    state
        .assistant
        .resolver()
        .topic(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("topic not found: {}", id)))
}

#[derive(Serialize)]
struct RelatedResponse {
    id: String,
    related: Vec<String>,
}

async fn handle_related(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<RelatedResponse> {
    let related = state.assistant.resolver().suggest_related(&id);
    Json(RelatedResponse { id, related })
}

// ============ GET /weather, GET /rates ============

#[derive(Serialize)]
struct WeatherResponse {
    #[serde(flatten)]
    report: WeatherReport,
    icon: &'static str,
}

async fn handle_weather(State(state): State<AppState>) -> Json<WeatherResponse> {
    let report = state.weather.current().await;
    let icon = weather_icon(report.weather_code);
    Json(WeatherResponse { report, icon })
}

async fn handle_rates(State(state): State<AppState>) -> Json<ExchangeRates> {
    Json(state.exchange.rates().await)
}
