//! Configuration loading.
//!
//! The installer works with built-in defaults. An optional `install.yml`
//! next to the installer may override any of them.

use crate::config::schema::{ConfigOverrides, InstallerConfig, DEFAULT_VERSION_FILE};
use crate::error::{InstallError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional overrides file in the installer root.
pub const CONFIG_FILE_NAME: &str = "install.yml";

/// Path of the overrides file for an installer root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Pick the installer root from candidate directories.
///
/// The current directory is used when it holds the VERSION file. Otherwise
/// the directory of the installer binary is used when it holds one. With
/// neither, the current directory is kept so errors name it.
pub fn choose_root(cwd: Option<PathBuf>, exe_dir: Option<PathBuf>) -> PathBuf {
    let has_version = |dir: &PathBuf| dir.join(DEFAULT_VERSION_FILE).is_file();

    match (cwd, exe_dir) {
        (Some(cwd), _) if has_version(&cwd) => cwd,
        (_, Some(exe_dir)) if has_version(&exe_dir) => exe_dir,
        (Some(cwd), _) => cwd,
        (None, Some(exe_dir)) => exe_dir,
        (None, None) => PathBuf::from("."),
    }
}

/// Installer root used when `--root` is not given.
pub fn default_root() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let root = choose_root(std::env::current_dir().ok(), exe_dir);
    tracing::debug!("Defaulting installer root to {}", root.display());
    root
}

/// Parse YAML content into overrides.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_overrides(content: &str, source_path: &Path) -> Result<ConfigOverrides> {
    if content.trim().is_empty() {
        return Ok(ConfigOverrides::default());
    }
    serde_yaml::from_str(content).map_err(|e| InstallError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the configuration for `root` with an explicit environment mapping.
///
/// # Errors
///
/// Returns `ConfigParse` if install.yml exists but is invalid.
pub fn load_config_with_env(root: &Path, env: HashMap<String, String>) -> Result<InstallerConfig> {
    let mut config = InstallerConfig::with_env(root, env);
    let path = config_path(root);

    match fs::read_to_string(&path) {
        Ok(content) => {
            tracing::debug!("Loading overrides from {}", path.display());
            config.apply(parse_overrides(&content, &path)?);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(InstallError::Io(e)),
    }

    Ok(config)
}

/// Load the configuration for `root` using the process environment.
pub fn load_config(root: &Path) -> Result<InstallerConfig> {
    load_config_with_env(root, std::env::vars().collect())
}
