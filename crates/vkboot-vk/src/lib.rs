// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
use anyhow::{anyhow, Context, Result};
use ash::ext::debug_utils;
use ash::khr::{surface as khr_surface, swapchain as khr_swapchain};
use ash::{vk, Entry};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::info;
use vkboot_core::SetupError;

pub mod debug;
pub mod device;
pub mod instance;
pub mod queue;
pub mod select;
pub mod surface;
pub mod swapchain;
pub mod teardown;

pub use queue::{QueueFamilyIndices, ResolvedQueues};
pub use select::{DeviceCaps, Rejection};
pub use teardown::TeardownStack;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VkConfig {
    pub app_name: String,
    pub validation: bool,
}

impl Default for VkConfig {
    fn default() -> Self {
        Self {
            app_name: "Hello Triangle".to_owned(),
            validation: cfg!(debug_assertions),
        }
    }
}

/// Every driver object the program holds, from instance to image views.
/// Dropping it releases them newest first.
pub struct VkContext {
    device_name: String,
    physical_device: vk::PhysicalDevice,
    queues: ResolvedQueues,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
    format: vk::Format,
    extent: vk::Extent2D,
    present_mode: vk::PresentModeKHR,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
    teardown: TeardownStack,
    // Keeps the loader library mapped until the stack above has unwound.
    _entry: Entry,
}

impl VkContext {
    /// Runs every setup step in dependency order; the first failure aborts
    /// and whatever was created so far is destroyed on the way out.
    pub fn new(
        window: &dyn HasWindowHandle,
        display: &dyn HasDisplayHandle,
        framebuffer: (u32, u32),
        cfg: &VkConfig,
    ) -> Result<Self> {
        let dh = display
            .display_handle()
            .map_err(|e| anyhow!("{e}"))?
            .as_raw();
        let wh = window
            .window_handle()
            .map_err(|e| anyhow!("{e}"))?
            .as_raw();

        let entry = unsafe { Entry::load() }.map_err(|e| SetupError::Loader(e.to_string()))?;
        let mut teardown = TeardownStack::new();

        let instance = unsafe {
            instance::create_instance(&entry, dh, &cfg.app_name, cfg.validation)?
        };
        {
            let instance = instance.clone();
            teardown.push("instance", move || unsafe { instance.destroy_instance(None) });
        }

        if cfg.validation {
            let loader = debug_utils::Instance::new(&entry, &instance);
            let messenger = unsafe {
                loader.create_debug_utils_messenger(&debug::messenger_create_info(), None)
            }
            .context("failed to set up debug messenger")?;
            teardown.push("debug messenger", move || unsafe {
                loader.destroy_debug_utils_messenger(messenger, None)
            });
        }

        let surface_loader = khr_surface::Instance::new(&entry, &instance);
        let surface = unsafe { ash_window::create_surface(&entry, &instance, dh, wh, None) }
            .context("failed to create window surface")?;
        {
            let loader = surface_loader.clone();
            teardown.push("surface", move || unsafe { loader.destroy_surface(surface, None) });
        }

        let (physical_device, caps) =
            unsafe { device::pick_physical_device(&instance, &surface_loader, surface)? };
        let queues = caps.queues.complete().ok_or(SetupError::NoSuitableGpu)?;

        let logical = unsafe {
            device::create_logical_device(&instance, physical_device, queues, cfg.validation)?
        };
        {
            let device = logical.device.clone();
            teardown.push("logical device", move || unsafe { device.destroy_device(None) });
        }

        let swapchain_loader = khr_swapchain::Device::new(&instance, &logical.device);
        let bundle = unsafe {
            swapchain::create_swapchain(
                &surface_loader,
                &swapchain_loader,
                physical_device,
                surface,
                queues,
                framebuffer,
            )?
        };
        {
            let loader = swapchain_loader.clone();
            let handle = bundle.swapchain;
            teardown.push("swapchain", move || unsafe { loader.destroy_swapchain(handle, None) });
        }

        let image_views = unsafe {
            swapchain::create_image_views(&logical.device, &bundle.images, bundle.format)?
        };
        {
            let device = logical.device.clone();
            let views = image_views.clone();
            teardown.push("image views", move || {
                for view in views {
                    unsafe { device.destroy_image_view(view, None) };
                }
            });
        }

        info!(
            "Vulkan setup complete on `{}` ({} resources held)",
            caps.name,
            teardown.len()
        );

        Ok(Self {
            device_name: caps.name,
            physical_device,
            queues,
            graphics_queue: logical.graphics_queue,
            present_queue: logical.present_queue,
            format: bundle.format,
            extent: bundle.extent,
            present_mode: bundle.present_mode,
            images: bundle.images,
            image_views,
            teardown,
            _entry: entry,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub fn queues(&self) -> ResolvedQueues {
        self.queues
    }

    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    pub fn format(&self) -> vk::Format {
        self.format
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    pub fn present_mode(&self) -> vk::PresentModeKHR {
        self.present_mode
    }

    pub fn images(&self) -> &[vk::Image] {
        &self.images
    }

    pub fn image_views(&self) -> &[vk::ImageView] {
        &self.image_views
    }
}

impl Drop for VkContext {
    fn drop(&mut self) {
        info!("releasing {} Vulkan resources", self.teardown.len());
        self.teardown.unwind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_only_in_debug() {
        let cfg = VkConfig::default();
        assert_eq!(cfg.app_name, "Hello Triangle");
        assert_eq!(cfg.validation, cfg!(debug_assertions));
    }
}
