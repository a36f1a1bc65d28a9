use anyhow::{Context, Result};
use domain::{Message, User};
use reqwest::Client;

/// Posts chat messages to the server's broadcast endpoint.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one message. Resolves once the server has offered it to every connected client.
    pub async fn broadcast(&self, message: &Message) -> Result<()> {
        let url = format!("{}/broadcast", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(message)
            .send()
            .await
            .context("Failed to send broadcast request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Broadcast failed with status {}: {}", status, body);
        }

        Ok(())
    }
}

/// The message a typed line becomes. Every message carries the client's start timestamp.
pub fn outgoing_message(user: &User, started_at: &str, line: &str) -> Message {
    Message::new(user.id.clone(), line, started_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_message_uses_user_id_and_start_timestamp() {
        let user = User::new("alice", "2024-05-01T12:00:00+00:00");

        let message = outgoing_message(&user, "2024-05-01T12:00:00+00:00", "hi all");

        assert_eq!(message.sender_id, user.id);
        assert_eq!(message.content, "hi all");
        assert_eq!(message.timestamp, "2024-05-01T12:00:00+00:00");
    }
}
