// SPDX-License-Identifier: CEPL-1.0
use std::collections::BTreeSet;
use std::ffi::{CStr, CString};

use ash::vk;
use tracing::{debug, info};
use vkboot_core::SetupError;

use crate::queue::QueueFamilyIndices;

const DISCRETE_BONUS: u32 = 1000;

/// Everything the selector looks at, gathered from the driver up front so
/// scoring stays a pure function.
#[derive(Clone, Debug)]
pub struct DeviceCaps {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub geometry_shader: bool,
    pub max_image_dimension_2d: u32,
    pub queues: QueueFamilyIndices,
    pub missing_extensions: Vec<CString>,
    pub format_count: usize,
    pub present_mode_count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    NoGeometryShader,
    IncompleteQueues,
    MissingExtensions,
    NoSurfaceFormats,
    NoPresentModes,
}

impl DeviceCaps {
    pub fn rejection(&self) -> Option<Rejection> {
        if !self.geometry_shader {
            Some(Rejection::NoGeometryShader)
        } else if !self.queues.is_complete() {
            Some(Rejection::IncompleteQueues)
        } else if !self.missing_extensions.is_empty() {
            Some(Rejection::MissingExtensions)
        } else if self.format_count == 0 {
            Some(Rejection::NoSurfaceFormats)
        } else if self.present_mode_count == 0 {
            Some(Rejection::NoPresentModes)
        } else {
            None
        }
    }
}

/// 0 means disqualified.
pub fn score(caps: &DeviceCaps) -> u32 {
    if caps.rejection().is_some() {
        return 0;
    }
    let bonus = if caps.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        DISCRETE_BONUS
    } else {
        0
    };
    bonus.saturating_add(caps.max_image_dimension_2d)
}

/// Picks the highest scoring candidate. Equal scores keep the earlier one.
pub fn pick_best<T>(candidates: Vec<(T, DeviceCaps)>) -> Result<(T, DeviceCaps), SetupError> {
    if candidates.is_empty() {
        return Err(SetupError::NoVulkanGpu);
    }

    let mut best: Option<(u32, T, DeviceCaps)> = None;
    for (handle, caps) in candidates {
        let s = score(&caps);
        match caps.rejection() {
            Some(why) => debug!("device `{}` rejected: {:?}", caps.name, why),
            None => debug!("device `{}` scored {}", caps.name, s),
        }
        if best.as_ref().map_or(true, |(b, _, _)| s > *b) {
            best = Some((s, handle, caps));
        }
    }

    match best {
        Some((s, handle, caps)) if s > 0 => {
            info!("Selected physical device (`{}`, score {}).", caps.name, s);
            Ok((handle, caps))
        }
        _ => Err(SetupError::NoSuitableGpu),
    }
}

/// Format and present-mode counts for the surface. The driver is only asked
/// once the device can present and has the swapchain extension; a failed
/// query counts as nothing supported.
pub fn surface_counts<E: std::fmt::Display>(
    queues: &QueueFamilyIndices,
    missing_extensions: &[CString],
    query: impl FnOnce() -> Result<(usize, usize), E>,
) -> (usize, usize) {
    if !queues.is_complete() || !missing_extensions.is_empty() {
        return (0, 0);
    }
    query().unwrap_or_else(|e| {
        debug!("swapchain support query failed: {e}");
        (0, 0)
    })
}

/// Names from `required` that `available` does not list.
pub fn missing_extensions(
    required: &[&CStr],
    available: &[vk::ExtensionProperties],
) -> Vec<CString> {
    let mut wanted: BTreeSet<&CStr> = required.iter().copied().collect();
    for ext in available {
        if let Ok(name) = ext.extension_name_as_c_str() {
            wanted.remove(name);
        }
    }
    wanted.into_iter().map(CStr::to_owned).collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::os::raw::c_char;

    pub fn extension(name: &CStr) -> vk::ExtensionProperties {
        let mut props = vk::ExtensionProperties::default();
        for (dst, src) in props.extension_name.iter_mut().zip(name.to_bytes()) {
            *dst = *src as c_char;
        }
        props
    }

    pub fn capable(name: &str, device_type: vk::PhysicalDeviceType, dim: u32) -> DeviceCaps {
        DeviceCaps {
            name: name.to_owned(),
            device_type,
            geometry_shader: true,
            max_image_dimension_2d: dim,
            queues: QueueFamilyIndices {
                graphics: Some(0),
                present: Some(0),
            },
            missing_extensions: Vec::new(),
            format_count: 1,
            present_mode_count: 1,
        }
    }
}
