//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. The
//! [`CommandDispatcher`] loads configuration once and routes the action
//! selected by the flags to its command.

pub mod bindings;
pub mod dispatcher;
pub mod gpus;
pub mod install;

pub use bindings::BindingsVersionCommand;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use gpus::ListGpusCommand;
pub use install::InstallCommand;
