//! `--list-gpus` implementation.

use crate::config::InstallerConfig;
use crate::error::Result;
use crate::framework::list_available_accelerators;
use crate::shell::{CommandRunner, ProcessRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Prints the GPU devices Tensorflow can see, one per line.
pub struct ListGpusCommand {
    config: InstallerConfig,
}

impl ListGpusCommand {
    /// Create a new GPU listing command.
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    /// List device names with the given command runner.
    pub fn list_with(&self, runner: &mut dyn CommandRunner) -> Result<Vec<String>> {
        list_available_accelerators(&self.config, runner)
    }
}

impl Command for ListGpusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let gpus = self.list_with(&mut ProcessRunner::new())?;
        if gpus.is_empty() {
            ui.warning("No GPUs visible to Tensorflow");
        }
        for gpu in gpus {
            println!("{}", gpu);
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use std::collections::HashMap;

    #[test]
    fn lists_gpu_names() {
        let config = InstallerConfig::with_env("/opt/deepdrive", HashMap::new());
        let mut runner = MockRunner::new();
        runner.respond(
            "device_lib",
            r#"[{"name": "/device:GPU:0", "device_type": "GPU"}, {"name": "/device:GPU:1", "device_type": "GPU"}]"#,
            0,
        );

        let gpus = ListGpusCommand::new(config).list_with(&mut runner).unwrap();
        assert_eq!(gpus, vec!["/device:GPU:0", "/device:GPU:1"]);
    }
}
