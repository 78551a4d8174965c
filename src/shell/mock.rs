//! Mock command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning processes.
//! Every invocation is recorded, and scripted responses are matched by
//! substring against the joined command line.
//!
//! # Example
//!
//! ```
//! use deepdrive_install::shell::{CommandLine, CommandOptions, CommandRunner, MockRunner};
//!
//! let mut runner = MockRunner::new();
//! runner.respond("--version", "pip 21.0", 0);
//!
//! let out = runner
//!     .run(&CommandLine::from("python3 -m pip --version"), &CommandOptions::default())
//!     .unwrap();
//! assert_eq!(out.output, "pip 21.0");
//! assert!(runner.ran("pip --version"));
//! ```

use std::collections::HashMap;

use crate::error::{InstallError, Result};

use super::command::{CommandLine, CommandOptions, CommandOutput, CommandRunner};

/// How a command was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    Captured,
    Streaming,
}

/// A recorded invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: CommandLine,
    pub kind: InvocationKind,
    pub throw: bool,
    pub env: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct Response {
    pattern: String,
    output: String,
    code: i32,
}

/// Command runner that records invocations and replays scripted results.
///
/// Unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: Vec<Response>,
    invocations: Vec<Invocation>,
}

impl MockRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result of any command containing `pattern`.
    ///
    /// Earlier rules win over later ones.
    pub fn respond(&mut self, pattern: &str, output: &str, code: i32) -> &mut Self {
        self.responses.push(Response {
            pattern: pattern.to_string(),
            output: output.to_string(),
            code,
        });
        self
    }

    /// Script a failure (exit code 1) for any command containing `pattern`.
    pub fn fail(&mut self, pattern: &str) -> &mut Self {
        self.respond(pattern, "", 1)
    }

    /// All recorded invocations in order.
    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// Joined command lines of all invocations in order.
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .iter()
            .map(|i| i.command.to_string())
            .collect()
    }

    /// Whether any invocation contains `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.invocations
            .iter()
            .any(|i| i.command.to_string().contains(pattern))
    }

    /// Index of the first invocation containing `pattern`.
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.invocations
            .iter()
            .position(|i| i.command.to_string().contains(pattern))
    }

    fn lookup(&self, command: &CommandLine) -> (String, i32) {
        let joined = command.to_string();
        self.responses
            .iter()
            .find(|r| joined.contains(&r.pattern))
            .map(|r| (r.output.clone(), r.code))
            .unwrap_or_default()
    }

    fn record(&mut self, command: &CommandLine, options: &CommandOptions, kind: InvocationKind) {
        self.invocations.push(Invocation {
            command: command.clone(),
            kind,
            throw: options.throw,
            env: options.env.clone(),
        });
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, command: &CommandLine, options: &CommandOptions) -> Result<CommandOutput> {
        self.record(command, options, InvocationKind::Captured);
        let (output, code) = self.lookup(command);

        if code != 0 && options.throw {
            return Err(InstallError::CommandExecution {
                command: command.to_string(),
                message: output,
                code: Some(code),
            });
        }

        Ok(CommandOutput {
            output: output.trim().to_string(),
            code,
        })
    }

    fn run_streaming(&mut self, command: &CommandLine, options: &CommandOptions) -> Result<()> {
        self.record(command, options, InvocationKind::Streaming);
        let (_, code) = self.lookup(command);

        if code != 0 && options.throw {
            return Err(InstallError::CommandExecution {
                command: command.to_string(),
                message: "command failed, see output above".to_string(),
                code: Some(code),
            });
        }

        Ok(())
    }
}
