//! Window surface, device and depth target for the walk viewer.

use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::WalkError;

/// Depth format shared by the context and every pipeline drawing into it.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub depth_view: wgpu::TextureView,
}

#[derive(Clone)]
pub struct GpuContextConfig {
    /// Present at monitor refresh. The controller moves a fixed step per
    /// frame, so this also pins walking speed.
    pub vsync: bool,
}

impl Default for GpuContextConfig {
    fn default() -> Self {
        Self { vsync: true }
    }
}

fn gpu_error(what: &str, e: impl std::fmt::Display) -> WalkError {
    WalkError::Gpu(format!("{}: {}", what, e))
}

impl GpuContext {
    pub fn new(window: Arc<Window>, config: GpuContextConfig) -> Result<Self, WalkError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .map_err(|e| gpu_error("surface", e))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| gpu_error("adapter", e))?;
        log::info!("Walk viewer on {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Walk Viewer Device"),
            ..Default::default()
        }))
        .map_err(|e| gpu_error("device", e))?;

        let caps = surface.get_capabilities(&adapter);
        let format = match caps.formats.iter().find(|f| f.is_srgb()) {
            Some(format) => *format,
            None => *caps
                .formats
                .first()
                .ok_or_else(|| WalkError::Gpu("surface reports no formats".to_string()))?,
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if config.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        let depth_view = depth_target(&device, surface_config.width, surface_config.height);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            depth_view,
        })
    }

    /// Resize the surface and depth target. Zero sizes (minimised) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
        self.depth_view = depth_target(&self.device, width, height);
    }

    /// Re-apply the current surface configuration (after `SurfaceError::Lost`)
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// Upload `contents` into a new buffer.
    pub fn buffer_with<T: bytemuck::Pod>(
        &self,
        label: &str,
        contents: &[T],
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage,
        })
    }
}

fn depth_target(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("Walk Depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}
