//! # Guardian Application Library
//!
//! The HTTP API, CLI and configuration layer around `guardian-core`.
//! Exposed as a library so integration tests can drive the router directly.

pub mod api;
pub mod cli;
pub mod config;
