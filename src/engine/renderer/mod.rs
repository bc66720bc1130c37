// Rendering system using wgpu

mod camera;
mod commands;
mod debug_lines;
mod sprite;
pub mod texture;

pub use camera::{Camera, CameraUniform};
pub use commands::{Color, DrawCommand, RenderList, SpriteDraw};
pub use debug_lines::DebugLineRenderer;
pub use sprite::SpriteRenderer;
pub use texture::TextureWrap;

use anyhow::Result;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use winit::window::Window;

use crate::engine::assets::{AssetError, AssetManager, TextureHandle, TextureInfo, TextureStore};

/// Main renderer responsible for initializing wgpu and executing render lists
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    sprite_renderer: SpriteRenderer,
    debug_renderer: DebugLineRenderer,
    assets: AssetManager,
}

impl Renderer {
    /// Create a new renderer for the given window.
    ///
    /// `software` asks wgpu for a fallback (CPU) adapter.
    pub async fn new(window: Arc<Window>, software: bool, asset_root: &Path) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: software,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let sprite_renderer = SpriteRenderer::new(&device, surface_format);
        let debug_renderer = DebugLineRenderer::new(&device, surface_format);

        info!(
            "Renderer initialized with {}x{} resolution",
            size.width, size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            sprite_renderer,
            debug_renderer,
            assets: AssetManager::new(asset_root),
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Current surface size in pixels
    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    /// Execute a render list and present the frame
    pub fn render(&mut self, list: &RenderList) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.sprite_renderer.prepare(&self.device, &self.queue, list);
        self.debug_renderer
            .prepare(&self.device, &self.queue, list.debug_lines().next());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let clear = list.clear_color().unwrap_or(Color::BLACK);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.into()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sprite_renderer.render(&mut render_pass, &self.assets);
            self.debug_renderer.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Textures currently resident
    pub fn texture_count(&self) -> usize {
        self.assets.texture_count()
    }
}

impl TextureStore for Renderer {
    fn load_texture(&mut self, name: &str, wrap: TextureWrap) -> Result<TextureInfo, AssetError> {
        self.assets.load_texture(
            &self.device,
            &self.queue,
            self.sprite_renderer.texture_layout(),
            name,
            wrap,
        )
    }

    fn unload_texture(&mut self, handle: TextureHandle) {
        if self.assets.unload_texture(handle) {
            info!("Released texture {:?}", handle.id());
        }
    }
}
