//! Core domain types shared by the server, the broadcast hub and the chat client.

pub mod error;
pub mod message;
pub mod user;

pub use message::{Close, Message};
pub use user::User;
