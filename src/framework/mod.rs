//! Numeric framework (Tensorflow) detection.

pub mod probe;

pub use probe::{
    check_gpu_runtime, detect_framework_version, evaluate_version, list_available_accelerators,
    unavailable_warning, version_script, GpuRuntimeStatus, ProbePhase,
};
