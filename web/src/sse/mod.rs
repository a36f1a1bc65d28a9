//! Server-sent event endpoint that carries broadcast messages to chat clients.
//!
//! The hub itself (registry, fan-out and sessions) lives in the `broadcast` crate; this
//! module only adapts an HTTP response body into an outbound stream for it.

pub(crate) mod handler;
