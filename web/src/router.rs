use crate::{
    controller::{broadcast_controller, health_check_controller},
    sse, AppState,
};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use log::*;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use utoipa::OpenApi;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Chat Broadcast API"
        ),
        paths(
            broadcast_controller::broadcast,
            health_check_controller::health_check,
            sse::handler::stream_handler,
        ),
        components(
            schemas(
                domain::Message,
                domain::Close,
            )
        ),
        tags(
            (name = "chat_broadcast", description = "Broadcast chat messages to every connected client")
        )
    )]
pub struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.allowed_origins);

    Router::new()
        .merge(broadcast_routes(app_state.clone()))
        .merge(health_routes())
        .merge(openapi_routes())
        .merge(stream_routes(app_state))
        .layer(cors)
}

fn broadcast_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/broadcast", post(broadcast_controller::broadcast))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn openapi_routes() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

fn stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/stream", get(sse::handler::stream_handler))
        .with_state(app_state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Only the configured origins may read responses. Origins that are not valid header
/// values are skipped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();
    debug!("CORS allowed origins: {origins:?}");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
