//! # System Module
//!
//! Construction stages and the gate that decides when a project may leave one.
//!
//! The gate logic is pure and deterministic: it reads a requirement snapshot
//! and returns classifications. Recording an override, persisting a stage
//! change and fetching requirements all belong to the caller.

mod gate;
mod stage;

pub use gate::*;
pub use stage::*;
