use crate::controller::ApiResponse;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{Close, Message};

use log::*;

/// POST a chat message to every connected client
///
/// Responds once every delivery attempt has finished. Individual delivery failures are
/// never reported back to the sender.
#[utoipa::path(
    post,
    path = "/broadcast",
    request_body = domain::Message,
    responses(
        (status = 200, description = "Message was offered to every active connection", body = domain::Close),
        (status = 400, description = "Bad Request"),
        (status = 415, description = "Unsupported Media Type"),
        (status = 422, description = "Unprocessable Entity"),
    )
)]
pub async fn broadcast(
    State(app_state): State<AppState>,
    Json(message): Json<Message>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST broadcast from sender: {}", message.sender_id);

    let outcome = app_state.broadcast_manager().broadcast(message).await;

    debug!(
        "Broadcast finished: {} dispatched, {} delivered, {} failed",
        outcome.dispatched, outcome.delivered, outcome.failed
    );

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), Close::default())))
}
