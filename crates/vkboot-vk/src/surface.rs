// SPDX-License-Identifier: CEPL-1.0
use ash::khr::surface;
use ash::vk;

/// What a device/surface pair offers for swapchain creation.
#[derive(Clone, Debug, Default)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    pub unsafe fn query(
        surface_loader: &surface::Instance,
        phys: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> ash::prelude::VkResult<Self> {
        unsafe {
            Ok(Self {
                capabilities: surface_loader
                    .get_physical_device_surface_capabilities(phys, surface)?,
                formats: surface_loader.get_physical_device_surface_formats(phys, surface)?,
                present_modes: surface_loader
                    .get_physical_device_surface_present_modes(phys, surface)?,
            })
        }
    }
}

/// BGRA8 sRGB with the sRGB non-linear colour space, else whatever comes first.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .copied()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_SRGB
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .or_else(|| formats.first().copied())
}

/// MAILBOX when offered. FIFO is always supported so it needs no lookup.
pub fn choose_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    if modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    }
}

/// `u32::MAX` as the current width means the surface lets us pick; the
/// framebuffer size is then clamped into the reported bounds.
pub fn choose_extent(caps: &vk::SurfaceCapabilitiesKHR, framebuffer: (u32, u32)) -> vk::Extent2D {
    if caps.current_extent.width != u32::MAX {
        caps.current_extent
    } else {
        vk::Extent2D {
            width: framebuffer
                .0
                .clamp(caps.min_image_extent.width, caps.max_image_extent.width),
            height: framebuffer
                .1
                .clamp(caps.min_image_extent.height, caps.max_image_extent.height),
        }
    }
}

pub fn choose_image_count(caps: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let want = caps.min_image_count.saturating_add(1);
    if caps.max_image_count > 0 {
        want.min(caps.max_image_count)
    } else {
        want
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR { format, color_space }
    }

    fn key(f: Option<vk::SurfaceFormatKHR>) -> Option<(vk::Format, vk::ColorSpaceKHR)> {
        f.map(|f| (f.format, f.color_space))
    }

    fn adaptive_caps() -> vk::SurfaceCapabilitiesKHR {
        vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            min_image_extent: vk::Extent2D {
                width: 64,
                height: 64,
            },
            max_image_extent: vk::Extent2D {
                width: 1920,
                height: 1080,
            },
            min_image_count: 2,
            max_image_count: 3,
            ..Default::default()
        }
    }

    #[test]
    fn preferred_format_found_anywhere() {
        let preferred = fmt(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR);
        let list = [
            fmt(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            fmt(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            preferred,
        ];
        assert_eq!(key(choose_surface_format(&list)), key(Some(preferred)));
    }

    #[test]
    fn colour_space_must_match_too() {
        let list = [
            fmt(vk::Format::R16G16B16A16_SFLOAT, vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT),
            fmt(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::DISPLAY_P3_NONLINEAR_EXT),
        ];
        assert_eq!(key(choose_surface_format(&list)), key(Some(list[0])));
    }

    #[test]
    fn no_formats_no_choice() {
        assert!(choose_surface_format(&[]).is_none());
    }

    #[test]
    fn mailbox_preferred_else_fifo() {
        assert_eq!(
            choose_present_mode(&[vk::PresentModeKHR::IMMEDIATE, vk::PresentModeKHR::MAILBOX]),
            vk::PresentModeKHR::MAILBOX
        );
        assert_eq!(
            choose_present_mode(&[vk::PresentModeKHR::IMMEDIATE]),
            vk::PresentModeKHR::FIFO
        );
        assert_eq!(choose_present_mode(&[]), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn fixed_extent_passes_through() {
        let mut caps = adaptive_caps();
        caps.current_extent = vk::Extent2D {
            width: 800,
            height: 600,
        };
        assert_eq!(choose_extent(&caps, (4000, 10)), caps.current_extent);
    }

    #[test]
    fn adaptive_extent_is_clamped() {
        let caps = adaptive_caps();
        assert_eq!(
            choose_extent(&caps, (4000, 3000)),
            vk::Extent2D {
                width: 1920,
                height: 1080
            }
        );
        assert_eq!(
            choose_extent(&caps, (0, 10)),
            vk::Extent2D {
                width: 64,
                height: 64
            }
        );
        assert_eq!(
            choose_extent(&caps, (800, 600)),
            vk::Extent2D {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn image_count_respects_max() {
        let mut caps = adaptive_caps();
        assert_eq!(choose_image_count(&caps), 3);
        caps.max_image_count = 2;
        assert_eq!(choose_image_count(&caps), 2);
        caps.max_image_count = 0;
        caps.min_image_count = 4;
        assert_eq!(choose_image_count(&caps), 5);
    }

    #[test]
    fn image_count_does_not_overflow() {
        let caps = vk::SurfaceCapabilitiesKHR {
            min_image_count: u32::MAX,
            max_image_count: 0,
            ..Default::default()
        };
        assert_eq!(choose_image_count(&caps), u32::MAX);
    }
}
