//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API under `/api`, a health check, and optionally the built front-end
//! served from `STATIC_DIR` as the fallback for every other path.

pub mod classify;
pub mod commands;
pub mod prompts;

use std::path::Path;

use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::CorsOrigins;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub version: &'static str,
}

/// Build the application router.
pub fn app(state: AppState, cors_origins: &CorsOrigins, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api", get(api_info))
        .route("/healthz", get(healthz))
        .route("/api/commands", get(commands::list_commands))
        .route("/api/commands/{name}", post(commands::build_command))
        .route("/api/commands/{name}/setup", post(commands::setup_command))
        .route("/api/architecture/regenerate", get(commands::regenerate_architecture))
        .route("/api/graph", get(prompts::get_graph))
        .route("/api/prompts", get(prompts::list_prompts))
        .route("/api/prompt", get(prompts::get_prompt))
        .route("/api/prd", get(prompts::get_prd))
        .route("/api/classify", post(classify::classify_change))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match static_dir {
        Some(dir) if dir.is_dir() => {
            info!(dir = %dir.display(), "serving static front-end");
            router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        }
        Some(dir) => {
            warn!(dir = %dir.display(), "STATIC_DIR is not a directory; static serving disabled");
            router
        }
        None => router,
    }
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(%origin, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}

/// `GET /api`: service banner.
async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo { message: "promptdeck API", version: env!("CARGO_PKG_VERSION") })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
