//! # chatrelay_core
//!
//! Core chat domain logic for Chatrelay.

pub mod client;
pub mod completion;
pub mod conversation;
pub mod models;

pub use client::{ChatTransport, ClientError, RelayClient};
pub use conversation::{ChatSession, Conversation, SubmitRejected};
pub use models::{Message, Role};
