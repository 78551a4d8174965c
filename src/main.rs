//! Deepdrive installer entry point.

use std::process::ExitCode;

use clap::Parser;
use deepdrive_install::cli::{Action, Cli, CommandDispatcher};
use deepdrive_install::config::default_root;
use deepdrive_install::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("deepdrive_install=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("deepdrive_install=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Installer starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    let root = cli.root.clone().unwrap_or_else(default_root);

    let mut ui = create_ui(output_mode, cli.no_color);

    let dispatcher = CommandDispatcher::new(root).with_python(cli.python.clone());

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            if cli.action() == Action::Install {
                ui.error("Install failed, fix issues below and rerun deepdrive-install");
            }
            ui.error(&e.to_string());
            ExitCode::from(1)
        }
    }
}
