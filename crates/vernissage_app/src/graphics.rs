use std::sync::Arc;

use vernissage_renderer::{DepthTarget, WgpuDevice};
use winit::window::Window;

use crate::gpu_context::{ContextError, GpuContext};

/// Window surface, depth target and the renderer device.
pub struct GraphicsState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub depth: DepthTarget,
    pub device: WgpuDevice,
}

impl GraphicsState {
    pub async fn new(window: Arc<Window>, vsync: bool) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = GpuContext::instance();
        let surface = instance
            .create_surface(window)
            .map_err(|e| ContextError::Surface(e.to_string()))?;
        let context = GpuContext::new_with_instance(instance, Some(&surface)).await?;

        let caps = surface.get_capabilities(&context.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| ContextError::Surface("surface reports no formats".into()))?;
        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&context.device, &config);
        log::debug!(
            "surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        let depth = DepthTarget::new(&context.device, config.width, config.height);
        let device = WgpuDevice::new(context.device, context.queue, config.format);

        Ok(Self {
            surface,
            config,
            depth,
            device,
        })
    }

    /// Reconfigures the surface and recreates the depth target.  Zero-sized
    /// (minimised) windows are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(self.device.device(), &self.config);
            self.depth.resize(self.device.device(), width, height);
        }
    }

    /// Next swapchain texture, or `None` when this frame has to be skipped.
    ///
    /// Lost and outdated surfaces are reconfigured; running out of memory is
    /// fatal.
    pub fn acquire(&mut self) -> anyhow::Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(self.device.device(), &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out waiting for the next frame");
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context("acquiring the next frame")),
        }
    }
}
