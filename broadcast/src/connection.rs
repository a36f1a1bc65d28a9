use crate::outbound::OutboundStream;
use domain::{error::Error, Message};
use log::*;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;

// Type alias for client identities: opaque, caller supplied and not necessarily unique
pub type UserId = String;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection (server-generated, increases with each new connection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One connected client's delivery path and liveness state.
pub struct ConnectionRecord {
    id: ConnectionId,
    identity: UserId,
    outbound: Box<dyn OutboundStream>,
    active: AtomicBool,
    termination: Mutex<Option<oneshot::Sender<Error>>>,
}

impl ConnectionRecord {
    /// Creates an active record together with the receiving half of its termination signal.
    pub fn new(
        identity: UserId,
        outbound: Box<dyn OutboundStream>,
    ) -> (Self, oneshot::Receiver<Error>) {
        let (tx, rx) = oneshot::channel();
        let record = Self {
            id: ConnectionId::new(),
            identity,
            outbound,
            active: AtomicBool::new(true),
            termination: Mutex::new(Some(tx)),
        };
        (record, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Pushes one message over this connection's outbound stream.
    pub async fn deliver(&self, message: &Message) -> Result<(), Error> {
        self.outbound.send(message).await
    }

    /// Marks the connection inactive and hands `error` to its registration handler.
    ///
    /// Only the first call wins; later calls (e.g. from a concurrent broadcast that also saw
    /// this connection as active) do nothing. Never blocks, even if the handler is gone.
    /// Returns whether this call performed the termination.
    pub fn terminate(&self, error: Error) -> bool {
        if self
            .active
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let sender = self
            .termination
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(sender) = sender {
            if sender.send(error).is_err() {
                debug!(
                    "Registration handler for {} ({}) already gone",
                    self.identity, self.id
                );
            }
        }
        true
    }
}

impl fmt::Debug for ConnectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ConnectionRecord")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

/// Registry of connected clients, keyed and ordered by connection id.
///
/// A single mutex guards the map. It is held only to insert, remove or copy entries,
/// never across a send.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: Mutex<BTreeMap<ConnectionId, Arc<ConnectionRecord>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register a new connection - O(log n)
    pub fn register(&self, record: ConnectionRecord) -> Arc<ConnectionRecord> {
        let record = Arc::new(record);
        let mut connections = self.lock();
        connections.insert(record.id(), Arc::clone(&record));
        trace!("Registered {}. Total connections: {}", record.id(), connections.len());
        record
    }

    /// Unregister a connection, returning its record if it was still registered.
    pub fn unregister(&self, id: &ConnectionId) -> Option<Arc<ConnectionRecord>> {
        let mut connections = self.lock();
        let removed = connections.remove(id);
        if removed.is_some() {
            trace!("Unregistered {id}. Total connections: {}", connections.len());
        }
        removed
    }

    /// Independent copy of every registered record (active or not), in registration order.
    pub fn snapshot(&self) -> Vec<Arc<ConnectionRecord>> {
        self.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<ConnectionId, Arc<ConnectionRecord>>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
