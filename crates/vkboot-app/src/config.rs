// SPDX-License-Identifier: CEPL-1.0
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;
use vkboot_platform::WindowSpec;
use vkboot_vk::VkConfig;

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct AppCfg {
    #[serde(default)]
    pub window: WindowCfg,
    #[serde(default)]
    pub vulkan: VulkanCfg,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WindowCfg {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct VulkanCfg {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Unset means "on in debug builds".
    #[serde(default)]
    pub validation: Option<bool>,
}

impl Default for WindowCfg {
    fn default() -> Self {
        WindowCfg {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

impl Default for VulkanCfg {
    fn default() -> Self {
        VulkanCfg {
            app_name: default_app_name(),
            validation: None,
        }
    }
}

fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_title() -> String {
    "Vulkan".to_owned()
}
fn default_app_name() -> String {
    "Hello Triangle".to_owned()
}

impl AppCfg {
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// A missing file gives the defaults; a malformed one is reported and
    /// also gives the defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => Self::parse(&s).unwrap_or_else(|e| {
                warn!("ignoring {}: {e}", path.display());
                AppCfg::default()
            }),
            Err(_) => AppCfg::default(),
        }
    }

    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec {
            width: self.window.width,
            height: self.window.height,
            title: self.window.title.clone(),
        }
    }

    pub fn vk_config(&self) -> VkConfig {
        VkConfig {
            app_name: self.vulkan.app_name.clone(),
            validation: self
                .vulkan
                .validation
                .unwrap_or_else(|| VkConfig::default().validation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_tutorial_defaults() {
        let cfg = AppCfg::parse("").unwrap();
        assert_eq!(cfg, AppCfg::default());
        assert_eq!(cfg.window_spec(), WindowSpec::default());
        assert_eq!(cfg.vk_config(), VkConfig::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = AppCfg::parse(
            r#"
            [window]
            width = 1280

            [vulkan]
            validation = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.window.width, 1280);
        assert_eq!(cfg.window.height, 600);
        assert_eq!(cfg.window.title, "Vulkan");
        assert!(!cfg.vk_config().validation);
        assert_eq!(cfg.vk_config().app_name, "Hello Triangle");
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(AppCfg::parse("[window]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn missing_file_falls_back() {
        let cfg = AppCfg::load(Path::new("/nonexistent/vkboot.toml"));
        assert_eq!(cfg, AppCfg::default());
    }
}
