// SPDX-License-Identifier: CEPL-1.0
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use anyhow::{Context, Result};
use ash::khr::{portability_subset, surface, swapchain};
use ash::{vk, Instance};
use tracing::{debug, info};

use crate::instance::VALIDATION_LAYER;
use crate::queue::{QueueFamilyIndices, ResolvedQueues};
use crate::select::{self, DeviceCaps};
use crate::surface::SwapchainSupport;

pub const DEVICE_EXTENSIONS: &[&CStr] = &[swapchain::NAME];

/// Collects the selector's view of one physical device. A query that fails
/// disqualifies this device only; selection carries on with the rest.
pub unsafe fn describe(
    instance: &Instance,
    surface_loader: &surface::Instance,
    surface: vk::SurfaceKHR,
    phys: vk::PhysicalDevice,
) -> DeviceCaps {
    let props = unsafe { instance.get_physical_device_properties(phys) };
    let features = unsafe { instance.get_physical_device_features(phys) };
    let families = unsafe { instance.get_physical_device_queue_family_properties(phys) };

    let queues = QueueFamilyIndices::locate(&families, |i| unsafe {
        surface_loader
            .get_physical_device_surface_support(phys, i, surface)
            .unwrap_or(false)
    });

    let missing_extensions = match unsafe { instance.enumerate_device_extension_properties(phys) }
    {
        Ok(available) => select::missing_extensions(DEVICE_EXTENSIONS, &available),
        Err(e) => {
            debug!("device extension query failed: {e}");
            DEVICE_EXTENSIONS.iter().map(|e| CString::from(*e)).collect()
        }
    };

    let (format_count, present_mode_count) =
        select::surface_counts(&queues, &missing_extensions, || unsafe {
            SwapchainSupport::query(surface_loader, phys, surface)
                .map(|s| (s.formats.len(), s.present_modes.len()))
        });

    let name = props
        .device_name_as_c_str()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_owned());

    DeviceCaps {
        name,
        device_type: props.device_type,
        geometry_shader: features.geometry_shader == vk::TRUE,
        max_image_dimension_2d: props.limits.max_image_dimension2_d,
        queues,
        missing_extensions,
        format_count,
        present_mode_count,
    }
}

pub unsafe fn pick_physical_device(
    instance: &Instance,
    surface_loader: &surface::Instance,
    surface: vk::SurfaceKHR,
) -> Result<(vk::PhysicalDevice, DeviceCaps)> {
    let devices = unsafe { instance.enumerate_physical_devices() }
        .context("failed to enumerate physical devices")?;
    info!("{} physical device(s) enumerated", devices.len());

    let mut candidates = Vec::with_capacity(devices.len());
    for phys in devices {
        let caps = unsafe { describe(instance, surface_loader, surface, phys) };
        candidates.push((phys, caps));
    }
    Ok(select::pick_best(candidates)?)
}

pub struct LogicalDevice {
    pub device: ash::Device,
    pub graphics_queue: vk::Queue,
    pub present_queue: vk::Queue,
}

pub unsafe fn create_logical_device(
    instance: &Instance,
    phys: vk::PhysicalDevice,
    queues: ResolvedQueues,
    validation: bool,
) -> Result<LogicalDevice> {
    let priorities = [1.0_f32];
    let queue_infos: Vec<vk::DeviceQueueCreateInfo> = queues
        .unique()
        .into_iter()
        .map(|family| {
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(family)
                .queue_priorities(&priorities)
        })
        .collect();

    let mut exts: Vec<*const c_char> = DEVICE_EXTENSIONS.iter().map(|e| e.as_ptr()).collect();
    if cfg!(target_os = "macos") {
        let available = unsafe { instance.enumerate_device_extension_properties(phys) }
            .context("failed to enumerate device extensions")?;
        if available
            .iter()
            .any(|e| e.extension_name_as_c_str().is_ok_and(|n| n == portability_subset::NAME))
        {
            exts.push(portability_subset::NAME.as_ptr());
        }
    }

    // Device layers are ignored by current loaders but older ones still read them.
    let layers: Vec<*const c_char> = if validation {
        vec![VALIDATION_LAYER.as_ptr()]
    } else {
        Vec::new()
    };

    let features = vk::PhysicalDeviceFeatures::default();
    let create_info = vk::DeviceCreateInfo::default()
        .queue_create_infos(&queue_infos)
        .enabled_extension_names(&exts)
        .enabled_features(&features);
    #[allow(deprecated)]
    let create_info = create_info.enabled_layer_names(&layers);

    let device = unsafe { instance.create_device(phys, &create_info, None) }
        .context("failed to create logical device")?;
    let graphics_queue = unsafe { device.get_device_queue(queues.graphics, 0) };
    let present_queue = unsafe { device.get_device_queue(queues.present, 0) };

    info!(
        "Logical device ready (graphics family {}, present family {})",
        queues.graphics, queues.present
    );
    Ok(LogicalDevice {
        device,
        graphics_queue,
        present_queue,
    })
}
