//! The local VERSION marker.

use std::fs;

use crate::config::InstallerConfig;
use crate::error::{InstallError, Result};

use super::loose::LooseVersion;

/// Version read from the installer's VERSION file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVersion {
    /// The full version string, e.g. `3.1.20210202221642`.
    pub full: String,
    /// Numeric major and minor components.
    pub major_minor: (u64, u64),
    /// `major.minor`, e.g. `3.1`.
    pub major_minor_str: String,
}

impl LocalVersion {
    /// Parse a semantic version string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVersion` unless the first two components are numeric.
    pub fn parse(value: &str) -> Result<Self> {
        let full = value.trim().to_string();
        let (major, minor) = LooseVersion::parse(&full)
            .major_minor()
            .ok_or_else(|| InstallError::InvalidVersion {
                value: full.clone(),
            })?;

        Ok(Self {
            full,
            major_minor: (major, minor),
            major_minor_str: format!("{}.{}", major, minor),
        })
    }
}

/// Read the VERSION file next to the installer.
///
/// # Errors
///
/// Returns `VersionFile` if the file cannot be read, and `InvalidVersion`
/// if its first line is not a usable version.
pub fn read_local_version(config: &InstallerConfig) -> Result<LocalVersion> {
    let path = config.version_path();
    let content = fs::read_to_string(&path).map_err(|e| InstallError::VersionFile {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let line = content.lines().next().unwrap_or_default();
    LocalVersion::parse(line)
}
