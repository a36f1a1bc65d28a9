use crate::connection::{ConnectionId, ConnectionRecord, ConnectionRegistry, UserId};
use crate::outbound::OutboundStream;
use domain::error::Error;
use log::*;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Registers new client streams and holds each client's session open until its delivery fails.
#[derive(Clone, Debug)]
pub struct StreamRegistrationHandler {
    registry: Arc<ConnectionRegistry>,
}

impl StreamRegistrationHandler {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Registers `outbound` for `identity`, returning the live session.
    ///
    /// Fails without touching the registry when the outbound stream is already closed.
    pub fn open(
        &self,
        identity: UserId,
        outbound: Box<dyn OutboundStream>,
    ) -> Result<Session, Error> {
        if outbound.is_closed() {
            warn!("Refusing to register closed stream for {identity}");
            return Err(Error::registration_failed(&identity));
        }

        let (record, termination) = ConnectionRecord::new(identity, outbound);
        let record = self.registry.register(record);

        info!(
            "New connection established: {} ({})",
            record.identity(),
            record.id()
        );

        Ok(Session {
            record,
            termination,
            registry: Arc::clone(&self.registry),
        })
    }

    /// Registers the stream and blocks until a delivery to it fails.
    ///
    /// The delivery error is returned as this session's own failure; the caller is expected
    /// to tear down the underlying transport.
    pub async fn serve(
        &self,
        identity: UserId,
        outbound: Box<dyn OutboundStream>,
    ) -> Result<(), Error> {
        let session = self.open(identity, outbound)?;
        Err(session.terminated().await)
    }
}

/// One registered client. Dropping the session removes its record from the registry.
#[derive(Debug)]
pub struct Session {
    record: Arc<ConnectionRecord>,
    termination: oneshot::Receiver<Error>,
    registry: Arc<ConnectionRegistry>,
}

impl Session {
    pub fn id(&self) -> ConnectionId {
        self.record.id()
    }

    pub fn identity(&self) -> &str {
        self.record.identity()
    }

    pub fn is_active(&self) -> bool {
        self.record.is_active()
    }

    /// Waits for the first failed delivery to this client and returns its error.
    pub async fn terminated(mut self) -> Error {
        let error = match (&mut self.termination).await {
            Ok(error) => error,
            Err(_) => Error::closed(),
        };
        info!(
            "Connection terminated: {} ({}): {error}",
            self.record.identity(),
            self.record.id()
        );
        error
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.registry.unregister(&self.record.id()).is_some() {
            debug!(
                "Removed connection {} ({}) from registry",
                self.record.identity(),
                self.record.id()
            );
        }
    }
}
