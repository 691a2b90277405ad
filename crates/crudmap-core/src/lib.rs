//! Core types, errors, configuration and tracing for the crudmap analyzer.
//!
//! `crudmap-analysis` builds on these to trace entry classes through their
//! call graphs and report which database tables each one touches.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;
