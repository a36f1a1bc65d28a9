//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors are modeled as a tree with `domain::error::Error` as the root type holding a tree
/// of `error_kind` enums. The `source` field holds the original error that caused the domain
/// error, if there was one. `broadcast` and `web` translate from these kinds; `web` uses them
/// to pick HTTP status codes.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Other(String),
}

/// Enum representing the various kinds of external errors, i.e. failures of something
/// outside of this process such as a remote peer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Transport(TransportErrorKind),
}

/// Failures of a single client's outbound delivery path.
#[derive(Debug, PartialEq)]
pub enum TransportErrorKind {
    /// Sending one message to a connected client failed (peer gone, network error).
    SendFailed,
    /// The client's outbound stream was unusable before it could be registered.
    RegistrationFailed,
    /// The termination channel closed without a failure being reported.
    Closed,
}

impl Error {
    pub fn send_failed(detail: &str) -> Self {
        Error {
            source: Some(format!("send failed: {detail}").into()),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Transport(
                TransportErrorKind::SendFailed,
            )),
        }
    }

    pub fn registration_failed(identity: &str) -> Self {
        Error {
            source: Some(format!("outbound stream for {identity} is already closed").into()),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Transport(
                TransportErrorKind::RegistrationFailed,
            )),
        }
    }

    pub fn closed() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Transport(
                TransportErrorKind::Closed,
            )),
        }
    }

    /// Returns the transport error kind, if this is a transport error.
    pub fn transport_kind(&self) -> Option<&TransportErrorKind> {
        match &self.error_kind {
            DomainErrorKind::External(ExternalErrorKind::Transport(kind)) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Domain Error: {:?} ({source})", self.error_kind),
            None => write!(f, "Domain Error: {:?}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Failed to encode or decode JSON".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_failed_is_a_transport_error() {
        let err = Error::send_failed("alice");
        assert_eq!(err.transport_kind(), Some(&TransportErrorKind::SendFailed));
        assert!(err.to_string().contains("alice"));
    }

    #[test]
    fn test_registration_failed_is_a_transport_error() {
        let err = Error::registration_failed("bob");
        assert_eq!(
            err.transport_kind(),
            Some(&TransportErrorKind::RegistrationFailed)
        );
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_closed_has_no_source() {
        let err = Error::closed();
        assert_eq!(err.transport_kind(), Some(&TransportErrorKind::Closed));
        assert!(StdError::source(&err).is_none());
    }

    #[test]
    fn test_json_error_is_internal() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.transport_kind().is_none());
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Other(_))
        ));
    }
}
