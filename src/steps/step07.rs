//! Snapshot 07: the same spinning cube, now with a typed vertex.
//!
//! The scene is identical to snapshot 06. The only delta is the
//! representation: the flat float array becomes a C-layout `Vertex` struct,
//! and the attribute offsets and stride come from the type instead of being
//! counted by hand.

use cgmath::Rad;
use instant::{Duration, Instant};
use wgpu::util::DeviceExt;

use crate::{
    context::Gpu, pipeline::mk_render_pipeline, snapshot::Snapshot, texture::Texture, transform,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    colour: [f32; 4],
}

impl Vertex {
    const fn new(position: [f32; 3], colour: [f32; 4]) -> Self {
        Self { position, colour }
    }

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

const VERTICES: [Vertex; 8] = [
    Vertex::new([1.0, -1.0, 0.0], RED),    // 0
    Vertex::new([1.0, 1.0, 0.0], GREEN),   // 1
    Vertex::new([-1.0, 1.0, 0.0], BLUE),   // 2
    Vertex::new([-1.0, -1.0, 0.0], BLACK), // 3
    Vertex::new([-1.0, -1.0, 1.0], RED),   // 4
    Vertex::new([1.0, -1.0, 1.0], GREEN),  // 5
    Vertex::new([1.0, 1.0, 1.0], BLUE),    // 6
    Vertex::new([-1.0, 1.0, 1.0], BLACK),  // 7
];

#[rustfmt::skip]
const INDICES: [u16; 36] = [
    // Front
    0, 3, 2,
    2, 1, 0,
    // Right
    5, 0, 1,
    1, 6, 5,
    // Back
    4, 5, 6,
    6, 7, 4,
    // Left
    3, 4, 7,
    7, 2, 3,
    // Top
    1, 2, 7,
    7, 6, 1,
    // Bottom
    5, 4, 3,
    3, 0, 5,
];

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Transforms {
    projection: [[f32; 4]; 4],
    model_view: [[f32; 4]; 4],
}

pub struct SpinningCube {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth_texture: Texture,
    rotation: Rad<f32>,
    started: Instant,
}

pub fn build(gpu: &Gpu) -> anyhow::Result<Box<dyn Snapshot>> {
    let device = &gpu.device;

    let uniform = Transforms {
        projection: transform::projection(gpu.config.width, gpu.config.height).into(),
        model_view: transform::model_view(0.0, Rad(0.0)).into(),
    };
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Transforms Buffer"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("transforms_bind_group_layout"),
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
        label: Some("transforms_bind_group"),
    });

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Cube Vertex Buffer"),
        contents: bytemuck::cast_slice(&VERTICES),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Cube Index Buffer"),
        contents: bytemuck::cast_slice(&INDICES),
        usage: wgpu::BufferUsages::INDEX,
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Render Pipeline Layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = mk_render_pipeline(
        device,
        &layout,
        gpu.config.format,
        true,
        Some(wgpu::Face::Back),
        &[Vertex::desc()],
        wgpu::ShaderModuleDescriptor {
            label: Some("Cube Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/cube.wgsl").into()),
        },
    );

    let depth_texture = Texture::create_depth_texture(
        device,
        [gpu.config.width, gpu.config.height],
        "depth_texture",
    );

    Ok(Box::new(SpinningCube {
        pipeline,
        vertex_buffer,
        index_buffer,
        uniform_buffer,
        bind_group,
        depth_texture,
        rotation: Rad(0.0),
        started: Instant::now(),
    }))
}

impl Snapshot for SpinningCube {
    fn resize(&mut self, gpu: &Gpu) {
        self.depth_texture = Texture::create_depth_texture(
            &gpu.device,
            [gpu.config.width, gpu.config.height],
            "depth_texture",
        );
    }

    fn frame(
        &mut self,
        gpu: &Gpu,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        dt: Duration,
    ) {
        let drift = self.started.elapsed().as_secs_f32().sin();
        let uniform = Transforms {
            projection: transform::projection(gpu.config.width, gpu.config.height).into(),
            model_view: transform::model_view(drift, self.rotation).into(),
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..INDICES.len() as u32, 0, 0..1);
        }

        self.rotation += Rad(dt.as_secs_f32());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_the_raw_array() {
        // The struct must describe exactly the layout snapshot 06 counted
        // by hand: 7 floats, colour starting at byte 12.
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 28);
        assert_eq!(desc.attributes[1].offset, 12);
    }

    #[test]
    fn geometry_is_unchanged_from_the_raw_snapshot() {
        let flat: Vec<f32> = VERTICES
            .iter()
            .flat_map(|v| v.position.into_iter().chain(v.colour))
            .collect();
        let raw: &[f32] = bytemuck::cast_slice(&VERTICES);
        assert_eq!(flat, raw);
    }
}
