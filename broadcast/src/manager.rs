use crate::connection::{ConnectionRegistry, UserId};
use crate::coordinator::{BroadcastCoordinator, BroadcastOutcome};
use crate::outbound::OutboundStream;
use crate::registration::{Session, StreamRegistrationHandler};
use domain::{error::Error, Message};
use log::*;
use std::sync::Arc;

/// Entry point to the hub: owns the registry and hands it to the coordinator and the
/// registration handler.
#[derive(Debug)]
pub struct Manager {
    registry: Arc<ConnectionRegistry>,
    coordinator: BroadcastCoordinator,
    registration: StreamRegistrationHandler,
}

impl Manager {
    pub fn new() -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            coordinator: BroadcastCoordinator::new(Arc::clone(&registry)),
            registration: StreamRegistrationHandler::new(Arc::clone(&registry)),
            registry,
        }
    }

    /// Register a client's outbound stream and return its session.
    pub fn open_stream(
        &self,
        identity: UserId,
        outbound: Box<dyn OutboundStream>,
    ) -> Result<Session, Error> {
        self.registration.open(identity, outbound)
    }

    /// Register a client's outbound stream and block until a delivery to it fails.
    pub async fn serve_stream(
        &self,
        identity: UserId,
        outbound: Box<dyn OutboundStream>,
    ) -> Result<(), Error> {
        self.registration.serve(identity, outbound).await
    }

    /// Send a message to every active connection.
    pub async fn broadcast(&self, message: Message) -> BroadcastOutcome {
        debug!("Broadcasting message from {}", message.sender_id);
        self.coordinator.broadcast(message).await
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
