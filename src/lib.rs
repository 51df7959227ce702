//! Azul rules engine with terminal display helpers
//!
//! This crate re-exports the engine crate for convenience and adds the
//! terminal rendering used by the `play` binary.

pub use azul_engine::*;

pub mod display;
