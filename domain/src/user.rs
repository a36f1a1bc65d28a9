use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

/// A chat participant. The `id` is what every broadcast message carries as its sender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    /// Creates a user whose id is derived from the moment the client started and its name.
    pub fn new(name: impl Into<String>, timestamp: &str) -> Self {
        let name = name.into();
        Self {
            id: generate_id(&name, timestamp),
            name,
        }
    }
}

/// Hex encoded SHA-256 of `timestamp` followed by `name`.
///
/// Ids are not guaranteed unique; two clients started with the same name at the same
/// timestamp share an id.
pub fn generate_id(name: &str, timestamp: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(timestamp.as_bytes());
    hasher.update(name.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_is_hex_sha256() {
        let id = generate_id("Anon", "2024-05-01");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generate_id_hashes_timestamp_then_name() {
        // sha256("") is a well known value
        assert_eq!(
            generate_id("", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(generate_id("b", "a"), generate_id("", "ab"));
        assert_ne!(generate_id("a", "b"), generate_id("b", "a"));
    }

    #[test]
    fn test_same_inputs_produce_same_user() {
        let alice = User::new("alice", "t0");
        assert_eq!(alice, User::new("alice", "t0"));
        assert_ne!(alice.id, User::new("alice", "t1").id);
        assert_eq!(alice.name, "alice");
    }
}
