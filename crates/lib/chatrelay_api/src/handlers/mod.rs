//! Request handlers.

pub mod chat;
pub mod completion;
pub mod health;
