//! # agriwaste-store
//!
//! Recommendation record store for agriwaste (SQLite-backed).

pub mod store;

pub use store::SqliteStore;
