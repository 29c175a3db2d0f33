use bytemuck::cast_slice;
use glam::Vec2;
use wgpu::util::DeviceExt;
use wgpu::RenderPass;

use crate::scene::Backdrop;
use crate::wgpu::shape_vertex::ShapeVertex;
use crate::wgpu::Wgpu;

const BACKDROP_VERTICES: usize = 12;

/// Two clip-space bands covering the window: top to middle, middle to bottom.
pub fn backdrop_vertices(backdrop: &Backdrop) -> [ShapeVertex; BACKDROP_VERTICES] {
    let band = |upper: f32, lower: f32, from, to| {
        let top_left = ShapeVertex::new(Vec2::new(-1.0, upper), from);
        let top_right = ShapeVertex::new(Vec2::new(1.0, upper), from);
        let bottom_left = ShapeVertex::new(Vec2::new(-1.0, lower), to);
        let bottom_right = ShapeVertex::new(Vec2::new(1.0, lower), to);
        [top_left, bottom_left, bottom_right, top_left, bottom_right, top_right]
    };
    let [a, b, c, d, e, f] = band(1.0, 0.0, backdrop.top, backdrop.middle);
    let [g, h, i, j, k, l] = band(0.0, -1.0, backdrop.middle, backdrop.bottom);
    [a, b, c, d, e, f, g, h, i, j, k, l]
}

pub struct BackgroundRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
}

impl BackgroundRenderer {
    pub fn new(wgpu: &Wgpu) -> Self {
        let pipeline_layout =
            wgpu.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Background Pipeline Layout"),
                    bind_group_layouts: &[],
                    immediate_size: 0,
                });
        let vertex_buffer = wgpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Background Vertex Buffer"),
                contents: cast_slice(&[ShapeVertex::default(); BACKDROP_VERTICES]),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let pipeline = wgpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Background Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &wgpu.shader,
                    entry_point: Some("background_vertex"),
                    compilation_options: Default::default(),
                    buffers: &[ShapeVertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &wgpu.shader,
                    entry_point: Some("background_fragment"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: wgpu.surface_configuration.format,
                        blend: Some(wgpu::BlendState::REPLACE),
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
        Self {
            pipeline,
            vertex_buffer,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, backdrop: &Backdrop) {
        queue.write_buffer(&self.vertex_buffer, 0, cast_slice(&backdrop_vertices(backdrop)));
    }

    pub fn render(&self, render_pass: &mut RenderPass) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..BACKDROP_VERTICES as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn bands_meet_at_the_middle_color() {
        let backdrop = Backdrop {
            top: Color::SLATE_900,
            middle: Color::PURPLE_900,
            bottom: Color::SLATE_900,
        };
        let vertices = backdrop_vertices(&backdrop);
        for vertex in vertices {
            if vertex.position[1] == 0.0 {
                assert_eq!(vertex.color, Color::PURPLE_900.to_array());
            } else {
                assert_eq!(vertex.color, Color::SLATE_900.to_array());
            }
        }
    }
}
