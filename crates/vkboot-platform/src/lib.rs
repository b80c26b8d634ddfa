// SPDX-License-Identifier: CEPL-1.0
pub use winit;

use winit::dpi::LogicalSize;
use winit::window::{Window, WindowAttributes};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowSpec {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Vulkan".to_owned(),
        }
    }
}

/// Fixed-size window: the swapchain is never recreated, so resizing is
/// turned off here instead.
pub fn window_attributes(spec: &WindowSpec) -> WindowAttributes {
    tracing::debug!("window {}x{} \"{}\"", spec.width, spec.height, spec.title);
    Window::default_attributes()
        .with_title(spec.title.clone())
        .with_inner_size(LogicalSize::new(spec.width.max(1), spec.height.max(1)))
        .with_resizable(false)
}

/// Current framebuffer size in pixels.
pub fn framebuffer_size(window: &Window) -> (u32, u32) {
    let size = window.inner_size();
    (size.width, size.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_800_by_600() {
        let spec = WindowSpec::default();
        assert_eq!((spec.width, spec.height), (800, 600));
        assert_eq!(spec.title, "Vulkan");
    }

    #[test]
    fn attributes_are_not_resizable() {
        let attrs = window_attributes(&WindowSpec::default());
        assert!(!attrs.resizable);
        assert_eq!(attrs.title, "Vulkan");
    }
}
