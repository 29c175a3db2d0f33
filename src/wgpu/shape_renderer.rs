use bytemuck::cast_slice;
use wgpu::RenderPass;

use crate::wgpu::shape_vertex::ShapeVertex;
use crate::wgpu::Wgpu;

const INITIAL_CAPACITY: usize = 64 * 1024;

/// Draws the tessellated scene as one alpha-blended triangle list.
pub struct ShapeRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    capacity: usize,
    vertex_count: usize,
}

impl ShapeRenderer {
    pub fn new(wgpu: &Wgpu) -> Self {
        let pipeline_layout =
            wgpu.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Shape Pipeline Layout"),
                    bind_group_layouts: &[&wgpu.uniform_bind_group_layout],
                    immediate_size: 0,
                });
        let pipeline = wgpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Shape Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &wgpu.shader,
                    entry_point: Some("shape_vertex"),
                    compilation_options: Default::default(),
                    buffers: &[ShapeVertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &wgpu.shader,
                    entry_point: Some("shape_fragment"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: wgpu.surface_configuration.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });
        let vertex_buffer = create_vertex_buffer(wgpu, INITIAL_CAPACITY);
        Self {
            pipeline,
            vertex_buffer,
            capacity: INITIAL_CAPACITY,
            vertex_count: 0,
        }
    }

    pub fn update(&mut self, wgpu: &Wgpu, vertices: &[ShapeVertex]) {
        if vertices.len() > self.capacity {
            self.capacity = vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(wgpu, self.capacity);
        }
        wgpu.queue
            .write_buffer(&self.vertex_buffer, 0, cast_slice(vertices));
        self.vertex_count = vertices.len();
    }

    pub fn render(&self, render_pass: &mut RenderPass, wgpu: &Wgpu) {
        if self.vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        wgpu.set_bind_group(render_pass);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count as u32, 0..1);
    }
}

fn create_vertex_buffer(wgpu: &Wgpu, capacity: usize) -> wgpu::Buffer {
    wgpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Shape Vertex Buffer"),
        size: (capacity * size_of::<ShapeVertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
