//! Command-line surface: ingestion, one-shot search and the interactive loop

pub mod commands;
pub mod display;
pub mod repl;
