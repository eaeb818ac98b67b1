//! nomad-run: ensure a Nomad job is running, refusing port conflicts.
//!
//! The binary is a thin wrapper over [`commands::Cli`]; the pipeline pieces
//! are exposed here so integration tests can drive them against a fake
//! scheduler.

pub mod actions;
pub mod client;
pub mod commands;
pub mod config;
pub mod definition;
pub mod error;
pub mod inventory;
pub mod output;
pub mod pipeline;
pub mod submit;
