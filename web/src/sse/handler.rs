use crate::params::connect::ConnectParams;
use crate::{AppState, Error};
use async_stream::stream;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use domain::{error::Error as DomainError, Message};
use futures::Stream;
use log::*;
use std::convert::Infallible;
use tokio::sync::mpsc;

/// GET a long-lived stream of every message broadcast while the client stays connected
#[utoipa::path(
    get,
    path = "/stream",
    params(ConnectParams),
    responses(
        (status = 200, description = "Server-sent event stream of `message` events", body = domain::Message, content_type = "text/event-stream"),
        (status = 400, description = "Bad Request"),
        (status = 502, description = "Client stream could not be registered"),
    )
)]
pub(crate) async fn stream_handler(
    State(app_state): State<AppState>,
    Query(params): Query<ConnectParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    let name = params.name.as_deref().unwrap_or("Anon").to_string();
    debug!("Opening stream for {} ({})", name, params.user_id);

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    // Registered before the response starts so a refused stream surfaces as an HTTP error
    let session = app_state
        .broadcast_manager()
        .open_stream(params.user_id, Box::new(tx))?;
    let connection_id = session.id();

    tokio::spawn(async move {
        let error = session.terminated().await;
        debug!("Stream {connection_id} for {name} released after: {error}");
    });

    let stream = stream! {
        while let Some(message) = rx.recv().await {
            match message_event(&message) {
                Ok(event) => yield Ok::<_, Infallible>(event),
                Err(e) => warn!("Dropping message from {} on {connection_id}: {e}", message.sender_id),
            }
        }
        debug!("Stream {connection_id} has no more messages");
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(app_state.config.keep_alive_interval())))
}

fn message_event(message: &Message) -> Result<Event, DomainError> {
    let json = serde_json::to_string(message)?;
    Ok(Event::default().event("message").data(json))
}

