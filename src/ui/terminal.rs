//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{
    should_use_colors, InstallTheme, OutputMode, ProgressSpinner, SpinnerHandle, UserInterface,
};

/// Terminal UI implementation.
///
/// Status goes to stdout; warnings and errors go to stderr so they survive
/// `--quiet` and output redirection.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: InstallTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, colors: bool) -> Self {
        let theme = if colors {
            InstallTheme::new()
        } else {
            InstallTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_step(current, total, title)).ok();
        }
    }

    fn show_banner(&mut self, banner: &str) {
        writeln!(self.out, "{}", self.theme.banner.apply_to(banner)).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() && self.out.is_term() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(PlainSpinner::new(message, self.theme.clone(), self.mode))
        }
    }
}

/// Line-based stand-in for a spinner when stdout is not a terminal.
struct PlainSpinner {
    out: Term,
    theme: InstallTheme,
    mode: OutputMode,
}

impl PlainSpinner {
    fn new(message: &str, theme: InstallTheme, mode: OutputMode) -> Self {
        let out = Term::stdout();
        if mode.shows_status() {
            writeln!(&out, "{}", message).ok();
        }
        Self { out, theme, mode }
    }

    fn line(&self, text: String) {
        if self.mode.shows_status() {
            writeln!(&self.out, "{}", text).ok();
        }
    }
}

impl SpinnerHandle for PlainSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.line(self.theme.format_success(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        writeln!(Term::stderr(), "{}", line).ok();
    }
}

/// Create the UI for this run.
///
/// Colors are used only when `no_color` is unset, `NO_COLOR` is absent and
/// stdout is a terminal.
pub fn create_ui(mode: OutputMode, no_color: bool) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode, !no_color && should_use_colors()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_reports_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet, false);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn create_ui_without_color() {
        let mut ui = create_ui(OutputMode::Quiet, true);
        ui.message("hidden in quiet mode");
        let mut spinner = ui.start_spinner("probe");
        spinner.finish_success("done");
    }
}
