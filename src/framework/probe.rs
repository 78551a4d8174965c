//! Tensorflow availability probe.
//!
//! The probe runs the configured Python interpreter and asks Tensorflow for
//! its version. It never imports anything into this process.
//!
//! # Import order
//!
//! Importing `h5py` after Tensorflow has been seen to crash the interpreter.
//! Outside the install phase the probe script therefore imports `h5py`
//! first, and callers that later load both libraries must do the same.
//! During the install phase `h5py` may not be installed yet, so the probe
//! imports Tensorflow alone.

use serde::Deserialize;

use crate::config::{FrameworkBounds, InstallerConfig};
use crate::environment::{has_gpu_container_runtime, is_container_execution};
use crate::error::{InstallError, Result};
use crate::shell::{CommandLine, CommandOptions, CommandRunner};
use crate::ui::UserInterface;
use crate::version::LooseVersion;

/// When the probe runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePhase {
    /// Before dependencies are installed. `h5py` is not imported.
    Install,
    /// After install. `h5py` is imported before Tensorflow.
    Runtime,
}

/// Outcome of the GPU runtime check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuRuntimeStatus {
    /// A supported Tensorflow is importable.
    Available { version: String },
    /// Tensorflow agents cannot run.
    Unavailable { reason: String },
}

impl GpuRuntimeStatus {
    /// Whether Tensorflow agents can run.
    pub fn is_available(&self) -> bool {
        matches!(self, GpuRuntimeStatus::Available { .. })
    }
}

#[derive(Debug, Deserialize)]
struct VersionReport {
    version: String,
}

#[derive(Debug, Deserialize)]
struct DeviceReport {
    name: String,
    device_type: String,
}

/// Python source that prints the Tensorflow version as JSON.
pub fn version_script(phase: ProbePhase) -> String {
    let mut script = String::new();
    if phase == ProbePhase::Runtime {
        script.push_str("import h5py\n");
    }
    script.push_str("import json\nimport tensorflow as tf\n");
    script.push_str("print(json.dumps({'version': tf.__version__}))\n");
    script
}

const DEVICE_SCRIPT: &str = "import json
from tensorflow.python.client import device_lib
print(json.dumps([{'name': d.name, 'device_type': d.device_type} for d in device_lib.list_local_devices()]))
";

/// Warning shown whenever Tensorflow agents will not be available.
pub fn unavailable_warning(reason: &str) -> String {
    format!(
        "{}, Tensorflow agents will not be available. \
         HINT: Install Tensorflow or use the python / virtualenv you have it already installed to. \
         If you install, check out our Tensorflow install tips on the README",
        reason
    )
}

/// Check `version` against the accepted bounds (`min <= version < max`).
pub fn evaluate_version(version: &str, bounds: &FrameworkBounds) -> GpuRuntimeStatus {
    let found = LooseVersion::parse(version);

    if found < LooseVersion::parse(&bounds.min) {
        GpuRuntimeStatus::Unavailable {
            reason: format!(
                "Tensorflow {} is less than the minimum required version ({})",
                version, bounds.min
            ),
        }
    } else if found >= LooseVersion::parse(&bounds.max) {
        GpuRuntimeStatus::Unavailable {
            reason: format!(
                "Tensorflow {} is greater or equal to the maximum required version ({})",
                version, bounds.max
            ),
        }
    } else {
        GpuRuntimeStatus::Available {
            version: version.to_string(),
        }
    }
}

/// Parse the last JSON line printed by a probe script.
fn parse_report<T: for<'de> Deserialize<'de>>(output: &str) -> Result<T> {
    let line = output
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();

    serde_json::from_str(line).map_err(|e| {
        InstallError::Other(anyhow::anyhow!(
            "Unexpected Tensorflow probe output '{}': {}",
            line,
            e
        ))
    })
}

/// Ask the interpreter for its Tensorflow version.
///
/// Returns `None` if Tensorflow cannot be imported.
pub fn detect_framework_version(
    config: &InstallerConfig,
    runner: &mut dyn CommandRunner,
    phase: ProbePhase,
) -> Result<Option<String>> {
    let command = CommandLine::new([config.python.as_str(), "-c"]).arg(version_script(phase));
    let options = CommandOptions::no_throw()
        .print_errors(false)
        .envs(&config.env);
    let result = runner.run(&command, &options)?;

    if !result.success() {
        tracing::debug!("Tensorflow import failed with exit code {}", result.code);
        return Ok(None);
    }

    let report: VersionReport = parse_report(&result.output)?;
    Ok(Some(report.version))
}

/// Decide whether Tensorflow agents can run on this host.
///
/// Inside a container without the nvidia runtime the interpreter is not
/// consulted at all. Every `Unavailable` outcome is reported through
/// `ui` as a warning.
pub fn check_gpu_runtime(
    config: &InstallerConfig,
    runner: &mut dyn CommandRunner,
    ui: &mut dyn UserInterface,
    phase: ProbePhase,
) -> Result<GpuRuntimeStatus> {
    ui.message("Checking for valid Tensorflow installation");

    let status = if is_container_execution(config) && !has_gpu_container_runtime(config) {
        ui.warning("No nvidia-docker runtime detected");
        GpuRuntimeStatus::Unavailable {
            reason: "Using Docker but not nvidia-docker runtime".to_string(),
        }
    } else {
        match detect_framework_version(config, runner, phase)? {
            None => GpuRuntimeStatus::Unavailable {
                reason: "Tensorflow not installed".to_string(),
            },
            Some(version) => evaluate_version(&version, &config.framework),
        }
    };

    match &status {
        GpuRuntimeStatus::Available { version } => ui.success(&format!(
            "Tensorflow {} detected - meets min version ({})",
            version, config.framework.min
        )),
        GpuRuntimeStatus::Unavailable { reason } => {
            tracing::warn!("Tensorflow unavailable: {}", reason);
            ui.warning(&unavailable_warning(reason));
        }
    }

    Ok(status)
}

/// Names of the GPU devices Tensorflow can see.
///
/// # Errors
///
/// Returns `CommandExecution` if Tensorflow cannot be imported.
pub fn list_available_accelerators(
    config: &InstallerConfig,
    runner: &mut dyn CommandRunner,
) -> Result<Vec<String>> {
    let command = CommandLine::new([config.python.as_str(), "-c", DEVICE_SCRIPT]);
    let result = runner.run(&command, &CommandOptions::default().envs(&config.env))?;
    let devices: Vec<DeviceReport> = parse_report(&result.output)?;

    Ok(devices
        .into_iter()
        .filter(|d| d.device_type == "GPU")
        .map(|d| d.name)
        .collect())
}
