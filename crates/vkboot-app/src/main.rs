// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use vkboot_core::init_tracing;
use vkboot_platform::{framebuffer_size, window_attributes, WindowSpec};
use vkboot_vk::{VkConfig, VkContext};

use vkboot_platform::winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

mod config;

use config::AppCfg;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config file; a missing file means defaults
    #[arg(long, default_value = "vkboot.toml")]
    config: PathBuf,
    /// Force validation layers on or off (default: on in debug builds)
    #[arg(long)]
    validation: Option<bool>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    title: Option<String>,
}

impl Args {
    fn apply(&self, cfg: &mut AppCfg) {
        if let Some(v) = self.validation {
            cfg.vulkan.validation = Some(v);
        }
        if let Some(w) = self.width {
            cfg.window.width = w;
        }
        if let Some(h) = self.height {
            cfg.window.height = h;
        }
        if let Some(t) = &self.title {
            cfg.window.title = t.clone();
        }
    }
}

struct App {
    window_spec: WindowSpec,
    vk_cfg: VkConfig,
    // Field order matters: the context goes before the window it draws to.
    context: Option<VkContext>,
    window: Option<Window>,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(cfg: &AppCfg) -> Self {
        App {
            window_spec: cfg.window_spec(),
            vk_cfg: cfg.vk_config(),
            context: None,
            window: None,
            failure: None,
        }
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(window_attributes(&self.window_spec))
            .context("failed to create window")?;
        let context = VkContext::new(&window, &window, framebuffer_size(&window), &self.vk_cfg)?;
        let queues = context.queues();
        info!(
            "ready: `{}`, {}x{} {:?} {:?}, {} images / {} views, graphics family {}, present family {}",
            context.device_name(),
            context.extent().width,
            context.extent().height,
            context.format(),
            context.present_mode(),
            context.images().len(),
            context.image_views().len(),
            queues.graphics,
            queues.present
        );
        debug!(
            "physical device {:?}, graphics queue {:?}, present queue {:?}",
            context.physical_device(),
            context.graphics_queue(),
            context.present_queue()
        );
        self.context = Some(context);
        self.window = Some(window);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.context = None;
        self.window = None;
    }

    /// Releases everything and reports the setup failure, if there was one.
    fn finish(mut self) -> Result<()> {
        self.shutdown();
        match self.failure.take() {
            Some(e) => Err(e),
            None => {
                info!("clean shutdown");
                Ok(())
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failure.is_some() {
            return;
        }
        if let Err(e) = self.setup(event_loop) {
            error!("setup failed: {e:#}");
            self.failure = Some(e);
            event_loop.exit();
            return;
        }
        // Nothing is drawn; block until the next batch of events.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(window) = &self.window {
            if window_id != window.id() {
                return;
            }
        }

        if let WindowEvent::CloseRequested = event {
            info!("CloseRequested");
            self.shutdown();
            event_loop.exit();
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut cfg = AppCfg::load(&args.config);
    args.apply(&mut cfg);

    let event_loop: EventLoop<()> = EventLoop::new()?;
    let mut app = App::new(&cfg);
    event_loop.run_app(&mut app)?;
    app.finish()
}
