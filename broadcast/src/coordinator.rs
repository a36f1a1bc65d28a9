use crate::connection::{ConnectionRecord, ConnectionRegistry};
use domain::Message;
use log::*;
use futures::future::join_all;
use std::sync::Arc;

/// Tally of one broadcast call. Every dispatched attempt ends up either delivered or failed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastOutcome {
    pub dispatched: usize,
    pub delivered: usize,
    pub failed: usize,
}

enum Delivery {
    Delivered,
    Failed,
}

/// Fans one message out to every active connection and waits for all attempts to finish.
#[derive(Clone, Debug)]
pub struct BroadcastCoordinator {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastCoordinator {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Dispatches one concurrent delivery per active connection, then joins them all.
    ///
    /// A failing connection is marked inactive and its registration handler is signalled;
    /// deliveries to the other connections are unaffected. Inactive connections are skipped.
    pub async fn broadcast(&self, message: Message) -> BroadcastOutcome {
        let connections = self.registry.snapshot();

        if connections.is_empty() {
            warn!("No active connections to broadcast message");
            return BroadcastOutcome::default();
        }

        let message = Arc::new(message);

        // Handles are joined, never aborted: dropping this future detaches the deliveries
        // instead of cancelling them.
        let deliveries: Vec<_> = connections
            .into_iter()
            .filter(|record| record.is_active())
            .map(|record| tokio::spawn(deliver(record, Arc::clone(&message))))
            .collect();

        let mut outcome = BroadcastOutcome {
            dispatched: deliveries.len(),
            ..Default::default()
        };

        for result in join_all(deliveries).await {
            match result {
                Ok(Delivery::Delivered) => outcome.delivered += 1,
                Ok(Delivery::Failed) => outcome.failed += 1,
                Err(e) => {
                    error!("Delivery task did not complete: {e}");
                    outcome.failed += 1;
                }
            }
        }

        debug!(
            "Broadcast from {} finished: {} dispatched, {} delivered, {} failed",
            message.sender_id, outcome.dispatched, outcome.delivered, outcome.failed
        );

        outcome
    }
}

async fn deliver(record: Arc<ConnectionRecord>, message: Arc<Message>) -> Delivery {
    info!("Sending message to: {}", record.identity());
    match record.deliver(&message).await {
        Ok(()) => Delivery::Delivered,
        Err(e) => {
            error!("Error sending to {}: {e}", record.identity());
            record.terminate(e);
            Delivery::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockOutbound;
    use domain::error::{Error, TransportErrorKind};
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn register(
        registry: &ConnectionRegistry,
        identity: &str,
        outbound: &MockOutbound,
    ) -> (Arc<ConnectionRecord>, oneshot::Receiver<Error>) {
        let (record, rx) = ConnectionRecord::new(identity.to_string(), Box::new(outbound.clone()));
        (registry.register(record), rx)
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_registry_is_noop() {
        let registry = Arc::new(ConnectionRegistry::new());
        let coordinator = BroadcastCoordinator::new(registry);

        let outcome = coordinator
            .broadcast(Message::new("alice", "hi", "t0"))
            .await;

        assert_eq!(outcome, BroadcastOutcome::default());
    }

    #[tokio::test]
    async fn test_broadcast_attempts_every_active_connection() {
        let registry = Arc::new(ConnectionRegistry::new());
        let outbounds: Vec<MockOutbound> = (0..5).map(|_| MockOutbound::new()).collect();
        let _records: Vec<_> = outbounds
            .iter()
            .enumerate()
            .map(|(i, outbound)| register(&registry, &format!("user-{i}"), outbound))
            .collect();

        let outcome = BroadcastCoordinator::new(Arc::clone(&registry))
            .broadcast(Message::new("user-0", "hello", "t0"))
            .await;

        assert_eq!(
            outcome,
            BroadcastOutcome {
                dispatched: 5,
                delivered: 5,
                failed: 0
            }
        );
        for outbound in &outbounds {
            assert_eq!(outbound.attempts(), 1);
            assert_eq!(outbound.delivered()[0].content, "hello");
        }
    }

    #[tokio::test]
    async fn test_broadcast_waits_for_slow_deliveries() {
        let registry = Arc::new(ConnectionRegistry::new());
        let slow = MockOutbound::new();
        slow.set_delay(Duration::from_millis(50));
        let fast = MockOutbound::new();
        let _slow = register(&registry, "slow", &slow);
        let _fast = register(&registry, "fast", &fast);

        BroadcastCoordinator::new(registry)
            .broadcast(Message::new("fast", "hi", "t0"))
            .await;

        // Both deliveries must have completed by the time broadcast returns
        assert_eq!(slow.delivered().len(), 1);
        assert_eq!(fast.delivered().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delivery_terminates_only_that_connection() {
        let registry = Arc::new(ConnectionRegistry::new());
        let alice = MockOutbound::new();
        let bob = MockOutbound::failing();
        let (alice_record, mut alice_rx) = register(&registry, "alice", &alice);
        let (bob_record, bob_rx) = register(&registry, "bob", &bob);

        let outcome = BroadcastCoordinator::new(registry)
            .broadcast(Message::new("alice", "hi", "t0"))
            .await;

        assert_eq!(outcome.delivered, 1);
        assert_eq!(outcome.failed, 1);
        assert!(alice_record.is_active());
        assert!(!bob_record.is_active());
        assert!(alice_rx.try_recv().is_err());

        let error = bob_rx.await.expect("bob's handler should be signalled");
        assert_eq!(error.transport_kind(), Some(&TransportErrorKind::SendFailed));
    }

    #[tokio::test]
    async fn test_deliveries_finish_after_caller_gives_up() {
        let registry = Arc::new(ConnectionRegistry::new());
        let slow = MockOutbound::new();
        slow.set_delay(Duration::from_millis(50));
        let fast = MockOutbound::new();
        let _slow = register(&registry, "slow", &slow);
        let _fast = register(&registry, "fast", &fast);
        let coordinator = BroadcastCoordinator::new(registry);

        let result = tokio::time::timeout(
            Duration::from_millis(5),
            coordinator.broadcast(Message::new("fast", "hi", "t0")),
        )
        .await;
        assert!(result.is_err(), "broadcast should still be waiting on the slow client");

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(slow.attempts(), 1);
        assert_eq!(slow.delivered().len(), 1);
        assert_eq!(fast.delivered().len(), 1);
    }

    #[tokio::test]
    async fn test_inactive_connection_is_not_retried() {
        let registry = Arc::new(ConnectionRegistry::new());
        let bob = MockOutbound::failing();
        let (_bob_record, _bob_rx) = register(&registry, "bob", &bob);
        let coordinator = BroadcastCoordinator::new(registry);

        coordinator.broadcast(Message::new("x", "1", "t0")).await;
        let second = coordinator.broadcast(Message::new("x", "2", "t0")).await;

        assert_eq!(bob.attempts(), 1);
        assert_eq!(second.dispatched, 0);
    }
}
