//! Command-line interface for the installer.
//!
//! - [`args`] - Argument definitions using clap's derive macros
//! - [`commands`] - Command implementations and dispatch

pub mod args;
pub mod commands;

pub use args::{Action, Cli};
pub use commands::{Command, CommandDispatcher, CommandResult};
