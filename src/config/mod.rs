//! Installer configuration.
//!
//! - [`schema`] - The [`InstallerConfig`] value and install.yml overrides
//! - [`loader`] - Loading defaults plus the optional install.yml

pub mod loader;
pub mod schema;

pub use loader::{
    choose_root, config_path, default_root, load_config, load_config_with_env, CONFIG_FILE_NAME,
};
pub use schema::{ConfigOverrides, FrameworkBounds, InstallerConfig, DEFAULT_VERSION_FILE};
