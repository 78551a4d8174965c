//! Terminal output for the installer.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for terminal output with optional colors
//! - [`MockUI`] for capturing output in tests
//! - Spinners for short captured probes
//!
//! # Example
//!
//! ```
//! use deepdrive_install::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(OutputMode::Quiet, false);
//! ui.show_header("Deepdrive");
//! ui.success("Install complete!");
//! ```

pub mod mock;
pub mod output;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use output::OutputMode;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, InstallTheme};

/// Banner printed after a successful install.
pub const SUCCESS_BANNER: &str = r#"
   ___                  __    _
  / _ \___ ___ ___  ___/ /___(_)  _____
 / // / -_) -_) _ \/ _  / __/ / |/ / -_)
/____/\__/\__/ .__/\_,_/_/ /_/|___/\__/
  _______ __/_/___/ /_ __
 / __/ -_) _ `/ _  / // /
/_/  \__/\_,_/\_,_/\_, /
                  /___/
"#;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner line.
    fn show_header(&mut self, title: &str);

    /// Announce an install step (e.g., "[3/7] Installing helper packages").
    fn show_step(&mut self, current: usize, total: usize, title: &str);

    /// Print preformatted text verbatim.
    fn show_banner(&mut self, banner: &str);

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}
