// HTTP surface: chat, direct product queries, catalog reload and health
pub mod reply;

use crate::agent::ProductAgent;
use crate::catalog::CatalogStore;
use crate::model::FilterQuery;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reply::parse_agent_reply;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub agent: Arc<dyn ProductAgent>,
    pub data_path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/products", get(list_products))
        .route("/catalog/reload", post(reload_catalog))
        .route("/health", get(health))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    let message = request.message.trim();
    if message.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Message is required");
    }

    match state.agent.respond(message).await {
        Ok(text) => Json(parse_agent_reply(&text)).into_response(),
        Err(e) => {
            error!("Agent failed: {}", e);
            json_error(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Response {
    Json(json!({ "products": state.store.filter_products(&query) })).into_response()
}

async fn reload_catalog(State(state): State<AppState>) -> Response {
    let store = state.store.clone();
    let path = state.data_path.clone();

    // File I/O stays off the async workers.
    let result = tokio::task::spawn_blocking(move || store.initialize_catalog(&path)).await;

    match result {
        Ok(Ok(catalog)) => {
            info!("Catalog reloaded with {} products", catalog.len());
            Json(json!({
                "products": catalog.len(),
                "loaded_at": catalog.loaded_at,
            }))
            .into_response()
        }
        Ok(Err(e)) => {
            error!("Catalog reload failed: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!("Catalog reload task failed: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "catalog reload task failed")
        }
    }
}

async fn health(State(state): State<AppState>) -> Response {
    let snapshot = state.store.snapshot();
    Json(json!({
        "status": "ok",
        "products": snapshot.len(),
        "source": snapshot.source,
        "loaded_at": snapshot.loaded_at,
    }))
    .into_response()
}
