//! Container and GPU runtime detection.
//!
//! Detects Docker by its marker file or a `docker` entry in the process
//! control groups, and nvidia-docker by `NVIDIA_VISIBLE_DEVICES`. All
//! inputs come from [`InstallerConfig`], so probes are reproducible in tests.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::InstallerConfig;

use super::platform::{platform_description, OsFamily};

/// Variable set by the nvidia container runtime.
pub const GPU_VISIBILITY_VAR: &str = "NVIDIA_VISIBLE_DEVICES";

/// Signature searched for in the control group file.
const CONTAINER_SIGNATURE: &str = "docker";

/// Whether the installer runs inside a Docker container.
pub fn is_container_execution(config: &InstallerConfig) -> bool {
    config.container_marker.exists() || cgroup_mentions_container(&config.cgroup_path)
}

/// Whether the container runtime exposes GPUs.
pub fn has_gpu_container_runtime(config: &InstallerConfig) -> bool {
    config.env_var(GPU_VISIBILITY_VAR).is_some()
}

fn cgroup_mentions_container(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    match File::open(path) {
        Ok(file) => BufReader::new(file)
            .lines()
            .map_while(std::result::Result::ok)
            .any(|line| line.contains(CONTAINER_SIGNATURE)),
        Err(_) => false,
    }
}

/// Snapshot of host facts used to plan one install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentFacts {
    /// Operating system family.
    pub os: OsFamily,
    /// Human readable platform string, e.g. `Linux-Ubuntu 20.04.1 LTS-x86_64`.
    pub platform: String,
    /// Running inside a container.
    pub is_container: bool,
    /// Container runtime exposes GPUs.
    pub has_gpu_container_runtime: bool,
}

impl EnvironmentFacts {
    /// Probe the host described by `config`.
    pub fn probe(config: &InstallerConfig) -> Self {
        let facts = Self {
            os: OsFamily::current(),
            platform: platform_description(),
            is_container: is_container_execution(config),
            has_gpu_container_runtime: has_gpu_container_runtime(config),
        };
        tracing::debug!("Environment: {:?}", facts);
        facts
    }

    /// Whether the host is an Ubuntu machine.
    pub fn is_ubuntu(&self) -> bool {
        is_ubuntu_platform(&self.platform)
    }

    /// Whether the desktop toolkit for the dashboard should be installed.
    pub fn wants_platform_packages(&self) -> bool {
        self.is_ubuntu() && !self.is_container
    }
}

/// Whether a platform string names an Ubuntu host.
pub fn is_ubuntu_platform(platform: &str) -> bool {
    platform.to_lowercase().contains("ubuntu")
}
