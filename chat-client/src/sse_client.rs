use anyhow::Result;
use domain::{Message, User};
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use reqwest::Url;

use crate::output::{print_error, print_incoming};

/// The server-sent event name every chat message arrives under.
const MESSAGE_EVENT: &str = "message";

/// A client's subscription to every message broadcast by the server.
pub struct Connection {
    user_label: String,
    client: Box<dyn Client>,
}

impl Connection {
    pub fn establish(base_url: &str, user: &User) -> Result<Self> {
        let url = stream_url(base_url, user)?;
        debug!("Opening message stream at {url}");

        // A dropped stream ends the receive loop instead of being retried
        let client = es::ClientBuilder::for_url(url.as_str())?
            .reconnect(es::ReconnectOptions::reconnect(false).build())
            .build();

        Ok(Self {
            user_label: user.name.clone(),
            client: Box::new(client),
        })
    }

    /// Prints every received message until the stream fails or ends.
    pub async fn receive_loop(self) {
        let mut stream = self.client.stream();

        loop {
            match stream.next().await {
                Some(Ok(es::SSE::Event(event))) => match parse_message(&event) {
                    Some(Ok(message)) => print_incoming(&message),
                    Some(Err(e)) => warn!("Ignoring malformed message: {e}"),
                    None => debug!("Ignoring {} event", event.event_type),
                },
                Some(Ok(_)) => {
                    // Ignore comments (keep-alive)
                }
                Some(Err(e)) => {
                    print_error(&format!("Error reading message: {e}"));
                    break;
                }
                None => {
                    debug!("Message stream ended for {}", self.user_label);
                    break;
                }
            }
        }
    }
}

fn stream_url(base_url: &str, user: &User) -> Result<Url> {
    let url = Url::parse_with_params(
        &format!("{}/stream", base_url.trim_end_matches('/')),
        &[("user_id", user.id.as_str()), ("name", user.name.as_str())],
    )?;
    Ok(url)
}

/// `None` for events other than chat messages.
fn parse_message(event: &es::Event) -> Option<serde_json::Result<Message>> {
    if event.event_type != MESSAGE_EVENT {
        return None;
    }
    Some(serde_json::from_str(&event.data))
}
