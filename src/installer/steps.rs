//! Install steps and their failure policy.

use std::fmt;

/// The install sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CheckInterpreter,
    CheckNumericFramework,
    InstallHelperPackages,
    InstallPlatformPackages,
    InstallRequirements,
    InstallPinnedBinding,
    Finish,
}

impl Step {
    /// Every step in execution order.
    pub const ALL: [Step; 7] = [
        Step::CheckInterpreter,
        Step::CheckNumericFramework,
        Step::InstallHelperPackages,
        Step::InstallPlatformPackages,
        Step::InstallRequirements,
        Step::InstallPinnedBinding,
        Step::Finish,
    ];

    /// Whether a failure of this step aborts the install.
    ///
    /// Steps returning `false` downgrade failures to an advisory warning.
    pub fn abort_on_failure(&self) -> bool {
        !matches!(
            self,
            Step::CheckNumericFramework | Step::InstallPlatformPackages
        )
    }

    /// Short description shown while the step runs.
    pub fn title(&self) -> &'static str {
        match self {
            Step::CheckInterpreter => "Checking python version",
            Step::CheckNumericFramework => "Checking Tensorflow",
            Step::InstallHelperPackages => "Installing helper packages",
            Step::InstallPlatformPackages => "Installing platform packages",
            Step::InstallRequirements => "Installing requirements",
            Step::InstallPinnedBinding => "Installing simulator bindings",
            Step::Finish => "Finishing",
        }
    }

    /// Stable identifier for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Step::CheckInterpreter => "check_interpreter",
            Step::CheckNumericFramework => "check_numeric_framework",
            Step::InstallHelperPackages => "install_helper_packages",
            Step::InstallPlatformPackages => "install_platform_packages",
            Step::InstallRequirements => "install_requirements",
            Step::InstallPinnedBinding => "install_pinned_binding",
            Step::Finish => "finish",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to a step that did not abort the install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran and succeeded.
    Completed,
    /// The step did not apply to this host.
    Skipped { reason: String },
    /// The step failed, but its policy tolerates failure.
    Advisory { warning: String },
}

impl StepOutcome {
    /// Whether the step ran to completion.
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed)
    }

    /// Whether the step was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped { .. })
    }

    /// Whether the step failed without aborting.
    pub fn is_advisory(&self) -> bool {
        matches!(self, StepOutcome::Advisory { .. })
    }
}
