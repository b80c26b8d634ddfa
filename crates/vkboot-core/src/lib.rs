// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
use thiserror::Error;

pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}

/// A setup step that cannot be recovered from. Any of these aborts the
/// whole initialisation sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("validation layers requested, but not available")]
    ValidationLayersUnavailable,
    #[error("failed to find GPUs with Vulkan support")]
    NoVulkanGpu,
    #[error("failed to find a suitable GPU")]
    NoSuitableGpu,
    #[error("surface reports no formats")]
    NoSurfaceFormat,
    #[error("failed to load the Vulkan library: {0}")]
    Loader(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            SetupError::NoSuitableGpu.to_string(),
            "failed to find a suitable GPU"
        );
        assert_eq!(
            SetupError::Loader("libvulkan.so.1 missing".into()).to_string(),
            "failed to load the Vulkan library: libvulkan.so.1 missing"
        );
    }

    #[test]
    fn converts_into_anyhow_and_back() {
        let err: anyhow::Error = SetupError::NoVulkanGpu.into();
        assert_eq!(
            err.downcast_ref::<SetupError>(),
            Some(&SetupError::NoVulkanGpu)
        );
    }
}
