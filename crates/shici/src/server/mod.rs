//! HTTP search API
//!
//! Exposes the query service over axum; ingestion stays a CLI concern.

pub mod handlers;
pub mod routing;
pub mod startup;
pub mod types;
