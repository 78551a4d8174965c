//! Python interpreter check.

use crate::config::InstallerConfig;
use crate::error::{InstallError, Result};
use crate::shell::{CommandLine, CommandOptions, CommandRunner};

/// Oldest supported Python minor version (within major 3).
pub const MIN_PYTHON_MINOR: u64 = 5;

const INTERPRETER_SCRIPT: &str =
    "import sys; print('%d.%d' % sys.version_info[:2]); print(sys.executable)";

/// A Python interpreter found on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub major: u64,
    pub minor: u64,
    /// Absolute path reported by `sys.executable`.
    pub executable: String,
}

/// Accept Python 3.5 and later, returning the executable unchanged.
///
/// # Errors
///
/// Returns `UnsupportedRuntime` for any other version.
pub fn check_interpreter_version(major: u64, minor: u64, executable: &str) -> Result<String> {
    if major == 3 && minor >= MIN_PYTHON_MINOR {
        Ok(executable.to_string())
    } else {
        Err(InstallError::UnsupportedRuntime {
            found: format!("{}.{}", major, minor),
            required: format!("3.{}+", MIN_PYTHON_MINOR),
        })
    }
}

/// Ask the configured interpreter for its version and executable path.
pub fn probe_interpreter(
    config: &InstallerConfig,
    runner: &mut dyn CommandRunner,
) -> Result<Interpreter> {
    let command = CommandLine::new([config.python.as_str(), "-c", INTERPRETER_SCRIPT]);
    let result = runner.run(&command, &CommandOptions::default().envs(&config.env))?;

    let mut lines = result.output.lines().map(str::trim);
    let version = lines.next().unwrap_or_default();
    let executable = lines
        .next()
        .filter(|e| !e.is_empty())
        .unwrap_or(config.python.as_str());

    let (major, minor) = version
        .split_once('.')
        .and_then(|(major, minor)| Some((major.parse().ok()?, minor.parse().ok()?)))
        .ok_or_else(|| InstallError::InvalidVersion {
            value: version.to_string(),
        })?;

    Ok(Interpreter {
        major,
        minor,
        executable: executable.to_string(),
    })
}

/// Probe the interpreter and enforce the supported version range.
pub fn check_interpreter(config: &InstallerConfig, runner: &mut dyn CommandRunner) -> Result<String> {
    let interpreter = probe_interpreter(config, runner)?;
    tracing::debug!("Found interpreter {:?}", interpreter);
    check_interpreter_version(interpreter.major, interpreter.minor, &interpreter.executable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use std::collections::HashMap;

    fn config() -> InstallerConfig {
        InstallerConfig::with_env("/opt/deepdrive", HashMap::new())
    }

    #[test]
    fn python_3_5_and_later_pass() {
        for minor in [5, 6, 7, 8, 12] {
            assert_eq!(
                check_interpreter_version(3, minor, "/usr/bin/python3").unwrap(),
                "/usr/bin/python3"
            );
        }
    }

    #[test]
    fn python_before_3_5_fails() {
        for minor in 0..5 {
            let err = check_interpreter_version(3, minor, "/usr/bin/python3").unwrap_err();
            assert!(matches!(err, InstallError::UnsupportedRuntime { .. }));
        }
    }

    #[test]
    fn python_2_fails() {
        let err = check_interpreter_version(2, 7, "/usr/bin/python").unwrap_err();
        assert!(err.to_string().contains("2.7"));
    }

    #[test]
    fn probe_reads_version_and_executable() {
        let mut runner = MockRunner::new();
        runner.respond("sys.version_info", "3.7\n/usr/local/bin/python3.7", 0);

        let interpreter = probe_interpreter(&config(), &mut runner).unwrap();
        assert_eq!(
            interpreter,
            Interpreter {
                major: 3,
                minor: 7,
                executable: "/usr/local/bin/python3.7".to_string()
            }
        );
    }

    #[test]
    fn probe_falls_back_to_configured_python() {
        let mut runner = MockRunner::new();
        runner.respond("sys.version_info", "3.6", 0);

        let interpreter = probe_interpreter(&config(), &mut runner).unwrap();
        assert_eq!(interpreter.executable, config().python);
    }

    #[test]
    fn probe_rejects_garbage() {
        let mut runner = MockRunner::new();
        runner.respond("sys.version_info", "Python", 0);

        let err = probe_interpreter(&config(), &mut runner).unwrap_err();
        assert!(matches!(err, InstallError::InvalidVersion { .. }));
    }

    #[test]
    fn check_interpreter_rejects_old_python() {
        let mut runner = MockRunner::new();
        runner.respond("sys.version_info", "3.4\n/usr/bin/python3.4", 0);

        let err = check_interpreter(&config(), &mut runner).unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedRuntime { .. }));
    }
}
