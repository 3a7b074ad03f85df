//! Business logic services.

pub mod upstream;
