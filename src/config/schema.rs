//! Installer configuration values.
//!
//! [`InstallerConfig`] is passed explicitly into every probe and install
//! step. Nothing reads the installer location or the process environment
//! ambiently; both live here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default S3 endpoint hosting the bindings bucket.
pub const DEFAULT_BUCKET_ENDPOINT: &str = "https://s3-us-west-1.amazonaws.com";

/// Bucket holding the validated bindings markers.
pub const DEFAULT_BUCKET: &str = "deepdrive";

/// Key prefix of the validated bindings markers.
pub const DEFAULT_BINDINGS_PREFIX: &str = "validated-bindings-versions";

/// The bindings release this installer is pinned to.
pub const DEFAULT_BINDINGS_VERSION: &str = "3.1.20210202221642.dev0";

/// Release marker file kept next to the installer.
pub const DEFAULT_VERSION_FILE: &str = "VERSION";

/// Inclusive lower and exclusive upper bound on the Tensorflow version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameworkBounds {
    /// Minimum supported version (inclusive).
    pub min: String,
    /// Maximum supported version (exclusive).
    pub max: String,
}

impl Default for FrameworkBounds {
    fn default() -> Self {
        Self {
            min: "1.7".to_string(),
            max: "2.0".to_string(),
        }
    }
}

/// Everything the installer needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// Directory holding VERSION, the requirements files and install.yml.
    pub root: PathBuf,

    /// Python interpreter used for probes and pip.
    pub python: String,

    /// Environment mapping consulted by probes and set on every child
    /// process the installer starts.
    pub env: HashMap<String, String>,

    /// Bucket name of the bindings listing.
    pub bucket: String,

    /// Base URL of the object storage endpoint.
    pub bucket_endpoint: String,

    /// Key prefix under which validated bindings versions are listed.
    pub bindings_prefix: String,

    /// Package name of the simulator bindings.
    pub bindings_package: String,

    /// Pinned bindings version to install.
    pub bindings_version: String,

    /// Helper packages installed before anything else.
    pub helper_packages: Vec<String>,

    /// System packages installed on Ubuntu hosts (dashboard toolkit).
    pub platform_packages: Vec<String>,

    /// Requirements file for non-Windows hosts.
    pub requirements: String,

    /// Requirements file for Windows hosts.
    pub requirements_windows: String,

    /// Accepted Tensorflow version range.
    pub framework: FrameworkBounds,

    /// Version marker file, relative to `root`.
    pub version_file: String,

    /// File whose existence marks a Docker container.
    pub container_marker: PathBuf,

    /// Control group file scanned for a Docker signature.
    pub cgroup_path: PathBuf,
}

impl InstallerConfig {
    /// Default configuration rooted at `root`, using the current process
    /// environment as the environment mapping.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_env(root, std::env::vars().collect())
    }

    /// Default configuration rooted at `root` with an explicit environment.
    pub fn with_env(root: impl Into<PathBuf>, env: HashMap<String, String>) -> Self {
        Self {
            root: root.into(),
            python: default_python().to_string(),
            env,
            bucket: DEFAULT_BUCKET.to_string(),
            bucket_endpoint: DEFAULT_BUCKET_ENDPOINT.to_string(),
            bindings_prefix: DEFAULT_BINDINGS_PREFIX.to_string(),
            bindings_package: "deepdrive".to_string(),
            bindings_version: DEFAULT_BINDINGS_VERSION.to_string(),
            helper_packages: ["sarge", "wheel", "requests", "boto"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            platform_packages: vec!["python3-tk".to_string()],
            requirements: "requirements.txt".to_string(),
            requirements_windows: "requirements-windows.txt".to_string(),
            framework: FrameworkBounds::default(),
            version_file: DEFAULT_VERSION_FILE.to_string(),
            container_marker: PathBuf::from("/.dockerenv"),
            cgroup_path: PathBuf::from("/proc/self/cgroup"),
        }
    }

    /// Absolute path of the version marker file.
    pub fn version_path(&self) -> PathBuf {
        self.root.join(&self.version_file)
    }

    /// Public URL of the bindings bucket.
    pub fn bucket_url(&self) -> String {
        format!(
            "{}/{}",
            self.bucket_endpoint.trim_end_matches('/'),
            self.bucket
        )
    }

    /// Pip requirement string for the pinned bindings.
    pub fn bindings_requirement(&self) -> String {
        format!("{}=={}", self.bindings_package, self.bindings_version)
    }

    /// Look up a variable in the configured environment mapping.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Apply overrides read from install.yml.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(python) = overrides.python {
            self.python = python;
        }
        if let Some(bucket) = overrides.bucket {
            self.bucket = bucket;
        }
        if let Some(endpoint) = overrides.bucket_endpoint {
            self.bucket_endpoint = endpoint;
        }
        if let Some(prefix) = overrides.bindings_prefix {
            self.bindings_prefix = prefix;
        }
        if let Some(package) = overrides.bindings_package {
            self.bindings_package = package;
        }
        if let Some(version) = overrides.bindings_version {
            self.bindings_version = version;
        }
        if let Some(packages) = overrides.helper_packages {
            self.helper_packages = packages;
        }
        if let Some(packages) = overrides.platform_packages {
            self.platform_packages = packages;
        }
        if let Some(requirements) = overrides.requirements {
            self.requirements = requirements;
        }
        if let Some(requirements) = overrides.requirements_windows {
            self.requirements_windows = requirements;
        }
        if let Some(framework) = overrides.framework {
            self.framework = framework;
        }
        if let Some(version_file) = overrides.version_file {
            self.version_file = version_file;
        }
    }
}

/// Optional keys accepted in install.yml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings_package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_packages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_packages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements_windows: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<FrameworkBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_file: Option<String>,
}

fn default_python() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> InstallerConfig {
        InstallerConfig::with_env("/opt/deepdrive", HashMap::new())
    }

    #[test]
    fn defaults_match_pinned_release() {
        let config = config();
        assert_eq!(config.bucket, "deepdrive");
        assert_eq!(config.bindings_version, "3.1.20210202221642.dev0");
        assert_eq!(config.framework.min, "1.7");
        assert_eq!(config.framework.max, "2.0");
        assert_eq!(
            config.helper_packages,
            vec!["sarge", "wheel", "requests", "boto"]
        );
    }

    #[test]
    fn version_path_is_relative_to_root() {
        let config = config();
        assert_eq!(config.version_path(), PathBuf::from("/opt/deepdrive/VERSION"));
    }

    #[test]
    fn bucket_url_joins_endpoint_and_bucket() {
        let mut config = config();
        assert_eq!(
            config.bucket_url(),
            "https://s3-us-west-1.amazonaws.com/deepdrive"
        );
        config.bucket_endpoint = "http://localhost:9000/".to_string();
        assert_eq!(config.bucket_url(), "http://localhost:9000/deepdrive");
    }

    #[test]
    fn bindings_requirement_pins_version() {
        assert_eq!(
            config().bindings_requirement(),
            "deepdrive==3.1.20210202221642.dev0"
        );
    }

    #[test]
    fn env_var_reads_explicit_mapping() {
        let mut env = HashMap::new();
        env.insert("NVIDIA_VISIBLE_DEVICES".to_string(), "all".to_string());
        let config = InstallerConfig::with_env("/tmp", env);
        assert_eq!(config.env_var("NVIDIA_VISIBLE_DEVICES"), Some("all"));
        assert_eq!(config.env_var("HOME_NOT_SET_HERE"), None);
    }

    #[test]
    fn apply_overrides_only_set_fields() {
        let mut config = config();
        config.apply(ConfigOverrides {
            python: Some("/usr/bin/python3.7".to_string()),
            framework: Some(FrameworkBounds {
                min: "1.8".to_string(),
                max: "1.15".to_string(),
            }),
            ..Default::default()
        });
        assert_eq!(config.python, "/usr/bin/python3.7");
        assert_eq!(config.framework.min, "1.8");
        assert_eq!(config.bucket, "deepdrive");
    }
}
