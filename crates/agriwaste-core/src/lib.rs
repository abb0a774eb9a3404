//! # agriwaste-core
//!
//! Core types, traits, configuration, and error handling for the agriwaste
//! recommendation service.

pub mod config;
pub mod error;
pub mod lang;
pub mod record;
pub mod resolver;
pub mod traits;

pub use resolver::RecommendationResolver;
