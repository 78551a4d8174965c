//! Install command implementation.
//!
//! Runs every install step against the configured interpreter.

use crate::config::InstallerConfig;
use crate::error::Result;
use crate::installer::{InstallReport, Installer};
use crate::shell::{CommandRunner, ProcessRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand {
    config: InstallerConfig,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    /// Run the install with the given command runner.
    pub fn run_with(
        &self,
        runner: &mut dyn CommandRunner,
        ui: &mut dyn UserInterface,
    ) -> Result<InstallReport> {
        ui.show_header("Deepdrive install");
        let verbose = ui.output_mode().shows_command_output();
        let mut installer = Installer::new(&self.config, runner).verbose(verbose);
        tracing::debug!("Host facts: {:?}", installer.facts());
        installer.run(ui)
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut runner = ProcessRunner::new();
        let report = self.run_with(&mut runner, ui)?;

        for warning in report.advisories() {
            tracing::debug!("Install finished with advisory: {}", warning);
        }
        ui.success("Install complete!");
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use crate::ui::MockUI;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn run_with_drives_all_steps() {
        let temp = TempDir::new().unwrap();
        let mut config = InstallerConfig::with_env(temp.path(), HashMap::new());
        config.container_marker = temp.path().join(".dockerenv");
        config.cgroup_path = temp.path().join("cgroup");

        let mut runner = MockRunner::new();
        runner
            .respond("sys.version_info", "3.8\n/usr/bin/python3.8", 0)
            .respond("tensorflow", "{\"version\": \"1.14.0\"}", 0);
        let mut ui = MockUI::new();

        let report = InstallCommand::new(config)
            .run_with(&mut runner, &mut ui)
            .unwrap();

        assert_eq!(report.outcomes().len(), 7);
        assert_eq!(ui.headers(), &["Deepdrive install".to_string()]);
        assert!(runner.ran("import deepdrive"));
    }
}
