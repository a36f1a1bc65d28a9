//! Broadcast hub for the chat server.
//!
//! Clients hold a long-lived outbound stream; every chat message is fanned out to all of
//! them concurrently, and one client's failure never disturbs delivery to the others.
//!
//! # Architecture
//!
//! - **ConnectionRegistry**: mutex-guarded map from connection id to record. Broadcasts work
//!   on a snapshot so the lock is never held across I/O.
//! - **BroadcastCoordinator**: spawns one delivery task per active connection and joins them
//!   all before returning (scatter, then join).
//! - **StreamRegistrationHandler**: registers a client and keeps its session open until a
//!   delivery to it fails. The failure is the session's result; its record is then removed.
//! - **Manager**: facade the web layer holds in its state.
//!
//! # Message Flow
//!
//! 1. A client opens its stream; the web layer calls `Manager::open_stream` with the
//!    sending half of a channel and streams the receiving half back to the client
//! 2. Some client sends a message; the web layer calls `Manager::broadcast`
//! 3. The coordinator snapshots the registry and delivers to every active record in parallel
//! 4. A failed send flips that record to inactive and signals its session exactly once
//!
//! There is no heartbeat: a client that silently stops reading is noticed the next time a
//! broadcast fails to reach it.
//!
//! # Modules
//!
//! - `connection`: `ConnectionRecord`, `ConnectionRegistry` and `ConnectionId`
//! - `outbound`: the `OutboundStream` delivery capability
//! - `coordinator`: the fan-out and join
//! - `registration`: stream registration and `Session`
//! - `manager`: `Manager`, the facade over all of the above

pub mod connection;
pub mod coordinator;
pub mod manager;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod outbound;
pub mod registration;

pub use connection::{ConnectionId, UserId};
pub use coordinator::BroadcastOutcome;
pub use manager::Manager;
pub use outbound::OutboundStream;
pub use registration::Session;
