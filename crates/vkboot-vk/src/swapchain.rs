// SPDX-License-Identifier: CEPL-1.0
use anyhow::{Context, Result};
use ash::khr::{surface, swapchain};
use ash::vk;
use tracing::info;
use vkboot_core::SetupError;

use crate::queue::ResolvedQueues;
use crate::surface::{
    choose_extent, choose_image_count, choose_present_mode, choose_surface_format,
    SwapchainSupport,
};

pub struct SwapchainBundle {
    pub swapchain: vk::SwapchainKHR,
    pub images: Vec<vk::Image>,
    pub format: vk::Format,
    pub extent: vk::Extent2D,
    pub present_mode: vk::PresentModeKHR,
}

pub unsafe fn create_swapchain(
    surface_loader: &surface::Instance,
    swapchain_loader: &swapchain::Device,
    phys: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
    queues: ResolvedQueues,
    framebuffer: (u32, u32),
) -> Result<SwapchainBundle> {
    let support = unsafe { SwapchainSupport::query(surface_loader, phys, surface) }
        .context("failed to query swapchain support")?;

    let surface_format =
        choose_surface_format(&support.formats).ok_or(SetupError::NoSurfaceFormat)?;
    let present_mode = choose_present_mode(&support.present_modes);
    let extent = choose_extent(&support.capabilities, framebuffer);
    let image_count = choose_image_count(&support.capabilities);
    let (sharing_mode, families) = queues.sharing();

    let create_info = vk::SwapchainCreateInfoKHR::default()
        .surface(surface)
        .min_image_count(image_count)
        .image_format(surface_format.format)
        .image_color_space(surface_format.color_space)
        .image_extent(extent)
        .image_array_layers(1)
        .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
        .image_sharing_mode(sharing_mode)
        .queue_family_indices(&families)
        .pre_transform(support.capabilities.current_transform)
        .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
        .present_mode(present_mode)
        .clipped(true)
        .old_swapchain(vk::SwapchainKHR::null());

    let swapchain = unsafe { swapchain_loader.create_swapchain(&create_info, None) }
        .context("failed to create swapchain")?;
    let images = match unsafe { swapchain_loader.get_swapchain_images(swapchain) } {
        Ok(images) => images,
        Err(e) => {
            unsafe { swapchain_loader.destroy_swapchain(swapchain, None) };
            return Err(e).context("failed to get swapchain images");
        }
    };

    info!(
        "Vulkan swapchain ready ({}x{}, {} images, {:?}, {:?})",
        extent.width,
        extent.height,
        images.len(),
        surface_format.format,
        present_mode
    );
    Ok(SwapchainBundle {
        swapchain,
        images,
        format: surface_format.format,
        extent,
        present_mode,
    })
}

pub fn image_view_info(image: vk::Image, format: vk::Format) -> vk::ImageViewCreateInfo<'static> {
    vk::ImageViewCreateInfo::default()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .components(vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        })
        .subresource_range(vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        })
}

/// One view per image. A failure part way destroys the views already made.
pub unsafe fn create_image_views(
    device: &ash::Device,
    images: &[vk::Image],
    format: vk::Format,
) -> Result<Vec<vk::ImageView>> {
    let mut views = Vec::with_capacity(images.len());
    for &image in images {
        match unsafe { device.create_image_view(&image_view_info(image, format), None) } {
            Ok(view) => views.push(view),
            Err(e) => {
                for &view in &views {
                    unsafe { device.destroy_image_view(view, None) };
                }
                return Err(e).context("failed to create image views");
            }
        }
    }
    Ok(views)
}
