//! Deepdrive installer - prepares a Python environment for the simulator.
//!
//! The installer checks the interpreter, probes Tensorflow, installs helper,
//! platform and requirement packages, and pins the simulator bindings to a
//! validated version.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Installer configuration and install.yml overrides
//! - [`environment`] - Host, container and GPU runtime detection
//! - [`error`] - Error types and result aliases
//! - [`framework`] - Tensorflow version and device probes
//! - [`installer`] - Install steps and their orchestration
//! - [`shell`] - External command execution
//! - [`ui`] - Spinners, warnings and terminal output
//! - [`version`] - Version ordering and bindings version lookup
//!
//! # Example
//!
//! ```
//! use deepdrive_install::installer::check_interpreter_version;
//!
//! assert!(check_interpreter_version(3, 7, "/usr/bin/python3").is_ok());
//! assert!(check_interpreter_version(2, 7, "/usr/bin/python").is_err());
//! ```
//!
//! For full install runs against a mock runner, see the integration tests.

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod framework;
pub mod installer;
pub mod shell;
pub mod ui;
pub mod version;

pub use error::{InstallError, Result};
