use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use bytemuck::cast_slice;
use glam::Mat4;
use log::{error, info, warn};
use wgpu::util::DeviceExt;
use wgpu::{RenderPass, ShaderModule};
use winit::window::Window;

use crate::wgpu::background_renderer::BackgroundRenderer;
use crate::wgpu::shape_renderer::ShapeRenderer;
use crate::wgpu::text_renderer::TextRenderer;
use crate::{LoopError, LoopEvent, Radio};

pub mod background_renderer;
pub mod shape_renderer;
pub mod shape_vertex;
pub mod text_renderer;

pub struct Wgpu {
    surface: wgpu::Surface<'static>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    pub surface_configuration: wgpu::SurfaceConfiguration,
    pub shader: ShaderModule,
    pub queue: wgpu::Queue,
    pub device: wgpu::Device,
    pub uniform_bind_group_layout: wgpu::BindGroupLayout,
}

impl Debug for Wgpu {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "WgpuContext")
    }
}

impl Wgpu {
    pub async fn new_async(window: Arc<Window>) -> Result<Wgpu, LoopError> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await?;
        let required_limits =
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_limits,
                ..Default::default()
            })
            .await?;
        let size = window.inner_size();
        let mut surface_configuration = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(LoopError::SurfaceConfiguration)?;
        // scene colors are CSS-style sRGB values, blended without linearization
        if let Some(format) = surface
            .get_capabilities(&adapter)
            .formats
            .into_iter()
            .find(|format| !format.is_srgb())
        {
            surface_configuration.format = format;
        }
        surface.configure(&device, &surface_configuration);
        info!(
            "Surface configured {}x{} as {:?}",
            surface_configuration.width, surface_configuration.height, surface_configuration.format
        );
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Projection"),
            contents: cast_slice(&Mat4::IDENTITY.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Uniform Bind Group"),
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });
        Ok(Self {
            surface,
            surface_configuration,
            device,
            queue,
            uniform_bind_group_layout,
            uniform_buffer,
            uniform_bind_group,
            shader,
        })
    }

    pub fn create_and_send(window: Arc<Window>, radio: Radio) {
        #[cfg(target_arch = "wasm32")]
        {
            let future = Self::new_async(window);
            wasm_bindgen_futures::spawn_local(async move {
                Self::send_result(future.await, &radio);
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let result = futures::executor::block_on(Self::new_async(window));
            Self::send_result(result, &radio);
        }
    }

    fn send_result(result: Result<Wgpu, LoopError>, radio: &Radio) {
        match result {
            Ok(wgpu) => LoopEvent::ContextCreated(wgpu).send(radio),
            Err(problem) => {
                error!("Graphics unavailable: {problem}");
                LoopEvent::Quit.send(radio);
            }
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (
            self.surface_configuration.width,
            self.surface_configuration.height,
        )
    }

    pub fn resize(&mut self, new_size: (u32, u32)) {
        let (width, height) = new_size;
        self.surface_configuration.width = width.max(1);
        self.surface_configuration.height = height.max(1);
        self.reconfigure();
    }

    pub fn reconfigure(&self) {
        self.surface
            .configure(&self.device, &self.surface_configuration);
    }

    pub fn get_surface_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            })
    }

    pub fn update_projection(&self, matrix: Mat4) {
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            cast_slice(&matrix.to_cols_array()),
        );
    }

    pub fn set_bind_group(&self, render_pass: &mut RenderPass) {
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
    }

    pub fn create_background_renderer(&self) -> BackgroundRenderer {
        BackgroundRenderer::new(self)
    }

    pub fn create_shape_renderer(&self) -> ShapeRenderer {
        ShapeRenderer::new(self)
    }

    pub fn create_text_renderer(&self, font: Option<Vec<u8>>) -> Option<TextRenderer> {
        let bytes = font?;
        match TextRenderer::new(bytes, self) {
            Ok(renderer) => Some(renderer),
            Err(problem) => {
                warn!("Text disabled: {problem}");
                None
            }
        }
    }
}
