//! CLI command implementations.

pub mod analyze;
pub mod health;
pub mod interactive;
pub mod upload;
