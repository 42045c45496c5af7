//! StandUp tracker CLI library.
//!
//! This crate provides the command-line surface and renderers for day reports.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
