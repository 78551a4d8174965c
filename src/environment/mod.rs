//! Host environment probing.
//!
//! Answers the questions the installer asks before touching the host:
//! which OS family it runs on, whether it runs inside a container, and
//! whether that container can see GPUs.

pub mod detection;
pub mod platform;

pub use detection::{
    has_gpu_container_runtime, is_container_execution, is_ubuntu_platform, EnvironmentFacts,
    GPU_VISIBILITY_VAR,
};
pub use platform::{is_elevated, parse_os_release, platform_description, OsFamily};
