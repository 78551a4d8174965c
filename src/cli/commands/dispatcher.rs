//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing the selected action

use std::path::{Path, PathBuf};

use crate::cli::args::{Action, Cli};
use crate::config::{load_config, InstallerConfig};
use crate::error::Result;
use crate::ui::UserInterface;

use super::bindings::BindingsVersionCommand;
use super::gpus::ListGpusCommand;
use super::install::InstallCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] carrying the exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Exit code to use (0 for success).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }
}

/// Dispatches the selected action to its implementation.
pub struct CommandDispatcher {
    root: PathBuf,
    python: Option<String>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given installer root.
    pub fn new(root: PathBuf) -> Self {
        Self { root, python: None }
    }

    /// Override the configured interpreter.
    pub fn with_python(mut self, python: Option<String>) -> Self {
        self.python = python;
        self
    }

    /// Get the installer root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load install.yml from the root and apply CLI overrides.
    pub fn config(&self) -> Result<InstallerConfig> {
        let mut config = load_config(&self.root)?;
        if let Some(python) = &self.python {
            config.python = python.clone();
        }
        tracing::debug!("Using interpreter {} in {}", config.python, self.root.display());
        Ok(config)
    }

    /// Dispatch and execute the action selected by `cli`.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.config()?;
        match cli.action() {
            Action::Install => InstallCommand::new(config).execute(ui),
            Action::BindingsVersion => BindingsVersionCommand::new(config).execute(ui),
            Action::ListGpus => ListGpusCommand::new(config).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn success_exits_zero() {
        assert_eq!(CommandResult::success().exit_code, 0);
    }

    #[test]
    fn config_applies_python_override() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("install.yml"), "python: python3.6\n").unwrap();

        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        assert_eq!(dispatcher.config().unwrap().python, "python3.6");

        let dispatcher = dispatcher.with_python(Some("/usr/bin/python3.8".to_string()));
        assert_eq!(dispatcher.config().unwrap().python, "/usr/bin/python3.8");
        assert_eq!(dispatcher.root(), temp.path());
    }

    #[test]
    fn config_surfaces_parse_errors() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("install.yml"), "no_such_key: 1\n").unwrap();

        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        assert!(dispatcher.config().is_err());
    }
}
