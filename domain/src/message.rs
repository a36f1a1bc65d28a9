use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A chat message fanned out to every connected client.
///
/// Messages are ephemeral: they exist only for the duration of one broadcast call.
/// `timestamp` is opaque and is never used for ordering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    /// Identity of the user that sent the message.
    #[schema(example = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8")]
    pub sender_id: String,
    #[schema(example = "hi")]
    pub content: String,
    #[schema(example = "2024-05-01T12:00:00+00:00")]
    pub timestamp: String,
}

impl Message {
    pub fn new(
        sender_id: impl Into<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Empty acknowledgment returned once a broadcast attempt has finished.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Close {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_json_field_names() {
        let message = Message::new("alice", "hi", "now");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({"sender_id": "alice", "content": "hi", "timestamp": "now"})
        );
    }

    #[test]
    fn test_close_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&Close {}).unwrap(), "{}");
    }
}
