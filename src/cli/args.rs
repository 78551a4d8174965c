//! CLI argument definitions.
//!
//! The installer has no subcommands. The default action installs; the
//! `--test-get-bindings-version` and `--list-gpus` flags select a
//! diagnostic action instead.

use clap::Parser;
use std::path::PathBuf;

/// Deepdrive installer - sets up the Python environment for the simulator.
#[derive(Debug, Parser)]
#[command(name = "deepdrive-install")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print the latest validated bindings version for this release and exit
    #[arg(long, conflicts_with = "list_gpus")]
    pub test_get_bindings_version: bool,

    /// Print the GPUs Tensorflow can see and exit
    #[arg(long)]
    pub list_gpus: bool,

    /// Installer root containing VERSION and the requirements files
    #[arg(long, env = "DEEPDRIVE_ROOT")]
    pub root: Option<PathBuf>,

    /// Python interpreter to install into
    #[arg(long, env = "DEEPDRIVE_PYTHON")]
    pub python: Option<String>,

    /// Echo captured commands and their output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// What a parsed command line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    BindingsVersion,
    ListGpus,
}

impl Cli {
    /// The action selected by the flags.
    pub fn action(&self) -> Action {
        if self.test_get_bindings_version {
            Action::BindingsVersion
        } else if self.list_gpus {
            Action::ListGpus
        } else {
            Action::Install
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_installs() {
        let cli = Cli::try_parse_from(["deepdrive-install"]).unwrap();
        assert_eq!(cli.action(), Action::Install);
        assert!(cli.root.is_none() || std::env::var("DEEPDRIVE_ROOT").is_ok());
    }

    #[test]
    fn bindings_version_flag() {
        let cli =
            Cli::try_parse_from(["deepdrive-install", "--test-get-bindings-version"]).unwrap();
        assert_eq!(cli.action(), Action::BindingsVersion);
    }

    #[test]
    fn list_gpus_flag() {
        let cli = Cli::try_parse_from(["deepdrive-install", "--list-gpus"]).unwrap();
        assert_eq!(cli.action(), Action::ListGpus);
    }

    #[test]
    fn diagnostic_flags_conflict() {
        let result = Cli::try_parse_from([
            "deepdrive-install",
            "--test-get-bindings-version",
            "--list-gpus",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn root_and_python_flags() {
        let cli = Cli::try_parse_from([
            "deepdrive-install",
            "--root",
            "/opt/deepdrive",
            "--python",
            "/usr/bin/python3.7",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/opt/deepdrive")));
        assert_eq!(cli.python.as_deref(), Some("/usr/bin/python3.7"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["deepdrive-install", "-v", "-q"]).is_err());
    }
}
