//! Shici - semantic search over classical Chinese poetry
//!
//! Ingests poem analyses from JSON-Lines files into a vector collection and answers
//! natural-language queries by embedding similarity.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod services;

pub use config::ShiciConfig;
pub use error::{Result, ShiciError};
