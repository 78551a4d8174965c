//! External command execution.

pub mod command;
pub mod mock;

pub use command::{
    decode_output, CommandLine, CommandOptions, CommandOutput, CommandRunner, ProcessRunner,
};
pub use mock::{Invocation, InvocationKind, MockRunner};
