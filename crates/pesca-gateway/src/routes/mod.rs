//! HTTP route handlers.

pub mod documents;
pub mod health;
pub mod records;
pub mod seasons;
pub mod species;
pub mod stats;
pub mod suggestions;
