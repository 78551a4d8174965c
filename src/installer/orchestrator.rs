//! The install sequence.
//!
//! Steps run strictly in [`Step::ALL`] order. A failing step either aborts
//! the whole install or, when its policy allows, is recorded as an
//! advisory and the sequence continues.

use crate::config::InstallerConfig;
use crate::environment::{is_elevated, EnvironmentFacts};
use crate::error::Result;
use crate::framework::{check_gpu_runtime, GpuRuntimeStatus, ProbePhase};
use crate::shell::{CommandLine, CommandOptions, CommandRunner};
use crate::ui::{UserInterface, SUCCESS_BANNER};

use super::interpreter::check_interpreter;
use super::steps::{Step, StepOutcome};

/// Outcome of every step of a finished install.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    outcomes: Vec<(Step, StepOutcome)>,
}

impl InstallReport {
    /// Outcomes in execution order.
    pub fn outcomes(&self) -> &[(Step, StepOutcome)] {
        &self.outcomes
    }

    /// Outcome of a single step.
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, o)| o)
    }

    /// Warnings of all advisory outcomes.
    pub fn advisories(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|(_, o)| match o {
                StepOutcome::Advisory { warning } => Some(warning.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Runs the install sequence against one host.
pub struct Installer<'a> {
    config: &'a InstallerConfig,
    runner: &'a mut dyn CommandRunner,
    facts: EnvironmentFacts,
    verbose: bool,
    python: Option<String>,
}

impl<'a> Installer<'a> {
    /// Create an installer for the host described by `config`.
    pub fn new(config: &'a InstallerConfig, runner: &'a mut dyn CommandRunner) -> Self {
        let facts = EnvironmentFacts::probe(config);
        Self::with_facts(config, runner, facts)
    }

    /// Create an installer with explicitly provided host facts.
    pub fn with_facts(
        config: &'a InstallerConfig,
        runner: &'a mut dyn CommandRunner,
        facts: EnvironmentFacts,
    ) -> Self {
        Self {
            config,
            runner,
            facts,
            verbose: false,
            python: None,
        }
    }

    /// Echo captured commands and their output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Host facts this installer plans with.
    pub fn facts(&self) -> &EnvironmentFacts {
        &self.facts
    }

    /// Run every step.
    ///
    /// # Errors
    ///
    /// Returns the first error of a step whose policy aborts on failure.
    pub fn run(&mut self, ui: &mut dyn UserInterface) -> Result<InstallReport> {
        let mut report = InstallReport::default();
        let total = Step::ALL.len();

        for (index, step) in Step::ALL.iter().copied().enumerate() {
            ui.show_step(index + 1, total, step.title());

            let outcome = match self.execute(step, ui) {
                Ok(outcome) => outcome,
                Err(e) if !step.abort_on_failure() => {
                    tracing::warn!("Step {} failed, continuing: {}", step, e);
                    ui.warning(&e.to_string());
                    StepOutcome::Advisory {
                        warning: e.to_string(),
                    }
                }
                Err(e) => {
                    tracing::debug!("Step {} failed, aborting", step);
                    return Err(e);
                }
            };

            if let StepOutcome::Skipped { reason } = &outcome {
                tracing::debug!("Skipped {}: {}", step, reason);
            }
            report.outcomes.push((step, outcome));
        }

        Ok(report)
    }

    fn execute(&mut self, step: Step, ui: &mut dyn UserInterface) -> Result<StepOutcome> {
        match step {
            Step::CheckInterpreter => self.check_interpreter(ui),
            Step::CheckNumericFramework => self.check_numeric_framework(ui),
            Step::InstallHelperPackages => self.install_helper_packages(),
            Step::InstallPlatformPackages => self.install_platform_packages(),
            Step::InstallRequirements => self.install_requirements(),
            Step::InstallPinnedBinding => self.install_pinned_binding(),
            Step::Finish => {
                ui.show_banner(SUCCESS_BANNER);
                Ok(StepOutcome::Completed)
            }
        }
    }

    fn python(&self) -> &str {
        self.python.as_deref().unwrap_or(&self.config.python)
    }

    fn options(&self) -> CommandOptions {
        CommandOptions::default().envs(&self.config.env)
    }

    fn pip_install(&self) -> CommandLine {
        CommandLine::new([self.python(), "-m", "pip", "install"])
    }

    fn check_interpreter(&mut self, ui: &mut dyn UserInterface) -> Result<StepOutcome> {
        let mut spinner = ui.start_spinner("Checking python version...");
        match check_interpreter(self.config, self.runner) {
            Ok(executable) => {
                spinner.finish_success(&format!("check! ({})", executable));
                self.python = Some(executable);
                Ok(StepOutcome::Completed)
            }
            Err(e) => {
                spinner.finish_error("python check failed");
                Err(e)
            }
        }
    }

    fn check_numeric_framework(&mut self, ui: &mut dyn UserInterface) -> Result<StepOutcome> {
        // Docker images are built without the nvidia runtime.
        if self.facts.is_container {
            return Ok(StepOutcome::Skipped {
                reason: "running in a container".to_string(),
            });
        }

        let mut config = self.config.clone();
        config.python = self.python().to_string();

        match check_gpu_runtime(&config, self.runner, ui, ProbePhase::Install)? {
            GpuRuntimeStatus::Available { .. } => Ok(StepOutcome::Completed),
            GpuRuntimeStatus::Unavailable { reason } => {
                Ok(StepOutcome::Advisory { warning: reason })
            }
        }
    }

    fn install_helper_packages(&mut self) -> Result<StepOutcome> {
        let command = self.pip_install().args(self.config.helper_packages.iter().cloned());
        let options = self.options().verbose(self.verbose);
        self.runner.run(&command, &options)?;
        Ok(StepOutcome::Completed)
    }

    fn install_platform_packages(&mut self) -> Result<StepOutcome> {
        if !self.facts.wants_platform_packages() {
            return Ok(StepOutcome::Skipped {
                reason: format!("not an Ubuntu host ({})", self.facts.platform),
            });
        }
        if self.config.platform_packages.is_empty() {
            return Ok(StepOutcome::Skipped {
                reason: "no platform packages configured".to_string(),
            });
        }

        let mut command = CommandLine::new(Vec::<String>::new());
        if !is_elevated() {
            command = command.arg("sudo");
        }
        let command = command
            .args(["apt-get", "install", "-y"])
            .args(self.config.platform_packages.iter().cloned());

        self.runner.run_streaming(&command, &self.options())?;
        Ok(StepOutcome::Completed)
    }

    fn install_requirements(&mut self) -> Result<StepOutcome> {
        let file = if self.facts.os.is_windows() {
            &self.config.requirements_windows
        } else {
            &self.config.requirements
        };
        let path = self.config.root.join(file);

        let command = self
            .pip_install()
            .args(["-r".to_string(), path.display().to_string()]);
        let options = self.options().cwd(&self.config.root);
        self.runner.run_streaming(&command, &options)?;
        Ok(StepOutcome::Completed)
    }

    fn install_pinned_binding(&mut self) -> Result<StepOutcome> {
        let mut command = self.pip_install();
        if self.facts.is_container {
            command = command.arg("--no-cache-dir");
        }
        let command = command.arg(self.config.bindings_requirement());
        self.runner.run_streaming(&command, &self.options())?;

        let verify = CommandLine::new([self.python(), "-c"])
            .arg(format!("import {}", self.config.bindings_package));
        self.runner
            .run(&verify, &self.options().verbose(self.verbose))?;
        Ok(StepOutcome::Completed)
    }
}
