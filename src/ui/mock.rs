//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use deepdrive_install::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//!
//! // Use ui in code under test...
//! ui.message("Checking python version");
//! ui.success("Done!");
//!
//! // Assert on captured interactions
//! assert!(ui.has_message("python version"));
//! assert!(ui.successes().contains(&"Done!".to_string()));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
///
/// Spinner finishes are captured too: a spinner finished with success lands
/// in `successes` and one finished with error in `errors`.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Rc<RefCell<Vec<String>>>,
    warnings: Vec<String>,
    errors: Rc<RefCell<Vec<String>>>,
    headers: Vec<String>,
    steps: Vec<(usize, usize, String)>,
    banners: Vec<String>,
    spinners: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> Vec<String> {
        self.successes.borrow().clone()
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all announced steps as (current, total, title).
    pub fn steps(&self) -> &[(usize, usize, String)] {
        &self.steps
    }

    /// Get all printed banners.
    pub fn banners(&self) -> &[String] {
        &self.banners
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.borrow().iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.borrow().iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.borrow_mut().push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.borrow_mut().push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        self.steps.push((current, total, title.to_string()));
    }

    fn show_banner(&mut self, banner: &str) {
        self.banners.push(banner.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner {
            successes: Rc::clone(&self.successes),
            errors: Rc::clone(&self.errors),
        })
    }
}

/// Mock spinner that forwards finish messages to its [`MockUI`].
#[derive(Debug)]
pub struct MockSpinner {
    successes: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<String>>>,
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.successes.borrow_mut().push(msg.to_string());
    }

    fn finish_error(&mut self, msg: &str) {
        self.errors.borrow_mut().push(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages_and_warnings() {
        let mut ui = MockUI::new();
        ui.message("hello");
        ui.warning("careful");
        ui.error("broken");
        assert!(ui.has_message("hello"));
        assert!(ui.has_warning("careful"));
        assert!(ui.has_error("broken"));
    }

    #[test]
    fn spinner_finishes_are_captured() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Checking python version");
        spinner.finish_success("Python 3.7");
        let mut failed = ui.start_spinner("Checking Tensorflow");
        failed.finish_error("import failed");

        assert_eq!(ui.spinners().len(), 2);
        assert!(ui.has_success("Python 3.7"));
        assert_eq!(ui.errors(), vec!["import failed"]);
    }

    #[test]
    fn captures_steps_and_banners() {
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        ui.show_step(1, 7, "Check");
        ui.show_banner("banner");
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        assert_eq!(ui.steps()[0], (1, 7, "Check".to_string()));
        assert_eq!(ui.banners(), &["banner".to_string()]);
    }
}
