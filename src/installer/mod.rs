//! Install orchestration.
//!
//! - [`steps`] - The step sequence and per-step failure policy
//! - [`interpreter`] - Python interpreter version check
//! - [`orchestrator`] - [`Installer`], which runs the steps in order

pub mod interpreter;
pub mod orchestrator;
pub mod steps;

pub use interpreter::{
    check_interpreter, check_interpreter_version, probe_interpreter, Interpreter,
    MIN_PYTHON_MINOR,
};
pub use orchestrator::{InstallReport, Installer};
pub use steps::{Step, StepOutcome};
