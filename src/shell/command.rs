//! External command execution.

use crate::error::{InstallError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A command as an argument vector. The first element is the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    args: Vec<String>,
}

impl CommandLine {
    /// Create a command line from explicit arguments.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program to execute, if any.
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// All arguments including the program.
    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    /// Whether the command line has no program.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Tokenizes on whitespace. No quoting is understood.
impl From<&str> for CommandLine {
    fn from(command: &str) -> Self {
        Self::new(command.split_whitespace())
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(args: Vec<String>) -> Self {
        Self { args }
    }
}

impl From<&[&str]> for CommandLine {
    fn from(args: &[&str]) -> Self {
        Self::new(args.iter().copied())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Options for command execution.
#[derive(Debug, Clone)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with the inherited environment).
    pub env: HashMap<String, String>,

    /// Return an error when the command exits non-zero.
    pub throw: bool,

    /// Echo the command and its captured output.
    pub verbose: bool,

    /// Print the error text of a failed command when not throwing.
    pub print_errors: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            env: HashMap::new(),
            throw: true,
            verbose: false,
            print_errors: true,
        }
    }
}

impl CommandOptions {
    /// Options that report failure through the exit code instead of an error.
    pub fn no_throw() -> Self {
        Self {
            throw: false,
            ..Default::default()
        }
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Add environment variables for the child.
    pub fn envs(mut self, env: &HashMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Set echoing of commands and output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set printing of error text for failures that are not thrown.
    pub fn print_errors(mut self, print_errors: bool) -> Self {
        self.print_errors = print_errors;
        self
    }
}

/// Captured result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Trimmed standard output.
    pub output: String,

    /// Exit code (-1 if killed by signal).
    pub code: i32,
}

impl CommandOutput {
    /// Whether the command exited zero.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Executes external commands.
///
/// Production code uses [`ProcessRunner`]; tests substitute
/// [`MockRunner`](super::MockRunner).
pub trait CommandRunner {
    /// Run a command, capturing its output.
    ///
    /// # Errors
    ///
    /// Returns `CommandExecution` if the command cannot be started, or if it
    /// exits non-zero while `options.throw` is set.
    fn run(&mut self, command: &CommandLine, options: &CommandOptions) -> Result<CommandOutput>;

    /// Run a command with its output flowing straight to the console.
    ///
    /// # Errors
    ///
    /// Returns `CommandExecution` if the command cannot be started, or if it
    /// exits non-zero while `options.throw` is set.
    fn run_streaming(&mut self, command: &CommandLine, options: &CommandOptions) -> Result<()>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner.
    pub fn new() -> Self {
        Self
    }

    fn build(command: &CommandLine, options: &CommandOptions) -> Result<Command> {
        let (program, args) =
            command
                .as_slice()
                .split_first()
                .ok_or_else(|| InstallError::CommandExecution {
                    command: String::new(),
                    message: "empty command".to_string(),
                    code: None,
                })?;

        let mut cmd = Command::new(program);
        cmd.args(args);

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        Ok(cmd)
    }

    fn spawn_error(command: &CommandLine, err: std::io::Error) -> InstallError {
        InstallError::CommandExecution {
            command: command.to_string(),
            message: err.to_string(),
            code: None,
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, command: &CommandLine, options: &CommandOptions) -> Result<CommandOutput> {
        if options.verbose {
            println!("running command: {}", command);
        }
        tracing::debug!("Running {}", command);

        let mut cmd = Self::build(command, options)?;
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd
            .output()
            .map_err(|e| Self::spawn_error(command, e))?;

        let stdout = decode_output(&output.stdout).trim().to_string();
        if options.verbose && !stdout.is_empty() {
            println!("{}", stdout);
        }

        let code = output.status.code().unwrap_or(-1);
        if code != 0 {
            let stderr = decode_output(&output.stderr).trim().to_string();
            tracing::debug!("{} exited with {}", command, code);
            if options.throw {
                return Err(InstallError::CommandExecution {
                    command: command.to_string(),
                    message: stderr,
                    code: Some(code),
                });
            } else if options.print_errors {
                eprintln!("{} finished with error {}", command, stderr);
            }
        }

        Ok(CommandOutput {
            output: stdout,
            code,
        })
    }

    fn run_streaming(&mut self, command: &CommandLine, options: &CommandOptions) -> Result<()> {
        tracing::debug!("Streaming {}", command);

        let mut cmd = Self::build(command, options)?;
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd
            .status()
            .map_err(|e| Self::spawn_error(command, e))?;

        if !status.success() && options.throw {
            return Err(InstallError::CommandExecution {
                command: command.to_string(),
                message: "command failed, see output above".to_string(),
                code: status.code(),
            });
        }

        Ok(())
    }
}

/// Decode process output as UTF-8, falling back to one char per byte.
pub fn decode_output(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
