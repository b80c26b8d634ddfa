// SPDX-License-Identifier: CEPL-1.0
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use anyhow::{Context, Result};
use ash::{vk, Entry, Instance};
use raw_window_handle::RawDisplayHandle;
use tracing::{debug, info};
use vkboot_core::SetupError;

use crate::debug::messenger_create_info;

pub const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";
const ENGINE_NAME: &CStr = c"No Engine";

/// Layers from `required` that the loader does not report.
pub fn missing_layers<'a>(required: &[&'a CStr], available: &[vk::LayerProperties]) -> Vec<&'a CStr> {
    required
        .iter()
        .copied()
        .filter(|want| {
            !available
                .iter()
                .any(|l| l.layer_name_as_c_str().is_ok_and(|have| have == *want))
        })
        .collect()
}

pub unsafe fn check_validation_layers(entry: &Entry) -> Result<()> {
    let available = unsafe { entry.enumerate_instance_layer_properties() }
        .context("failed to enumerate instance layers")?;
    let missing = missing_layers(&[VALIDATION_LAYER], &available);
    if !missing.is_empty() {
        debug!("missing layers: {:?}", missing);
        return Err(SetupError::ValidationLayersUnavailable.into());
    }
    Ok(())
}

/// Windowing extensions, plus debug utils when validating, plus portability
/// enumeration when the loader needs it.
pub fn instance_extensions(
    window_exts: &[*const c_char],
    validation: bool,
    portability: bool,
) -> Vec<*const c_char> {
    let mut exts = window_exts.to_vec();
    if validation {
        exts.push(ash::ext::debug_utils::NAME.as_ptr());
    }
    if portability {
        exts.push(ash::khr::portability_enumeration::NAME.as_ptr());
        exts.push(ash::khr::get_physical_device_properties2::NAME.as_ptr());
    }
    exts
}

unsafe fn has_instance_extension(entry: &Entry, name: &CStr) -> bool {
    unsafe { entry.enumerate_instance_extension_properties(None) }
        .unwrap_or_default()
        .iter()
        .any(|e| e.extension_name_as_c_str().is_ok_and(|n| n == name))
}

pub unsafe fn create_instance(
    entry: &Entry,
    display_raw: RawDisplayHandle,
    app_name: &str,
    validation: bool,
) -> Result<Instance> {
    if validation {
        unsafe { check_validation_layers(entry)? };
    }

    let app_name = CString::new(app_name).context("application name contains a NUL byte")?;
    let app_info = vk::ApplicationInfo::default()
        .application_name(&app_name)
        .application_version(vk::make_api_version(0, 1, 0, 0))
        .engine_name(ENGINE_NAME)
        .engine_version(vk::make_api_version(0, 1, 0, 0))
        .api_version(vk::API_VERSION_1_0);

    let window_exts = ash_window::enumerate_required_extensions(display_raw)
        .context("failed to query window system extensions")?;
    let portability = cfg!(target_os = "macos")
        && unsafe { has_instance_extension(entry, ash::khr::portability_enumeration::NAME) };
    let exts = instance_extensions(window_exts, validation, portability);

    let layers: Vec<*const c_char> = if validation {
        vec![VALIDATION_LAYER.as_ptr()]
    } else {
        Vec::new()
    };

    let flags = if portability {
        vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
    } else {
        vk::InstanceCreateFlags::empty()
    };

    let mut debug_info = messenger_create_info();
    let mut create_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_layer_names(&layers)
        .enabled_extension_names(&exts)
        .flags(flags);
    if validation {
        create_info = create_info.push_next(&mut debug_info);
    }

    let instance = unsafe { entry.create_instance(&create_info, None) }
        .context("failed to create instance")?;
    info!(
        "Vulkan instance created ({} extensions, validation={})",
        exts.len(),
        validation
    );
    Ok(instance)
}
