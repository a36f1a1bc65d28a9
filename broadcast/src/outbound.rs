use async_trait::async_trait;
use domain::{error::Error, Message};
use tokio::sync::mpsc::UnboundedSender;

/// One-directional capability to push messages to a single remote client.
///
/// A record owns its outbound stream exclusively; concurrent broadcasts may call `send`
/// on the same stream at the same time.
#[async_trait]
pub trait OutboundStream: Send + Sync {
    /// Send one message, failing with a transport error when the peer is unreachable or closed.
    async fn send(&self, message: &Message) -> Result<(), Error>;

    /// Whether the remote end is already known to be gone.
    fn is_closed(&self) -> bool {
        false
    }
}

/// The transport layer hands the hub the sending half of a channel and streams the
/// receiving half to the client. Once the client goes away the receiver is dropped and
/// every further send fails.
#[async_trait]
impl OutboundStream for UnboundedSender<Message> {
    async fn send(&self, message: &Message) -> Result<(), Error> {
        UnboundedSender::send(self, message.clone())
            .map_err(|_| Error::send_failed("client stream closed"))
    }

    fn is_closed(&self) -> bool {
        UnboundedSender::is_closed(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::error::TransportErrorKind;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_channel_send_reaches_receiver() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        let outbound: Box<dyn OutboundStream> = Box::new(tx);

        outbound
            .send(&Message::new("alice", "hi", "t0"))
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().content, "hi");
        assert!(!outbound.is_closed());
    }

    #[tokio::test]
    async fn test_channel_send_fails_once_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel::<Message>();
        let outbound: Box<dyn OutboundStream> = Box::new(tx);
        drop(rx);

        assert!(outbound.is_closed());
        let err = outbound
            .send(&Message::new("alice", "hi", "t0"))
            .await
            .unwrap_err();
        assert_eq!(err.transport_kind(), Some(&TransportErrorKind::SendFailed));
    }
}
