//! Snapshot 06: a depth buffer, a model-view matrix, and the full cube.
//!
//! The geometry grows from four vertices to eight, with 36 indices in six
//! labelled faces. The cube drifts sideways on a sine of elapsed time while
//! rotating about x at one radian per second, accumulated from the measured
//! frame delta. Vertex data is still one flat float array.

use cgmath::Rad;
use instant::{Duration, Instant};
use wgpu::util::DeviceExt;

use crate::{
    context::Gpu, pipeline::mk_render_pipeline, snapshot::Snapshot, texture::Texture, transform,
};

const FLOATS_PER_VERTEX: usize = 7;

#[rustfmt::skip]
const VERTICES: [f32; 8 * FLOATS_PER_VERTEX] = [
     1.0, -1.0, 0.0,    1.0, 0.0, 0.0, 1.0, // 0
     1.0,  1.0, 0.0,    0.0, 1.0, 0.0, 1.0, // 1
    -1.0,  1.0, 0.0,    0.0, 0.0, 1.0, 1.0, // 2
    -1.0, -1.0, 0.0,    0.0, 0.0, 0.0, 1.0, // 3
    -1.0, -1.0, 1.0,    1.0, 0.0, 0.0, 1.0, // 4
     1.0, -1.0, 1.0,    0.0, 1.0, 0.0, 1.0, // 5
     1.0,  1.0, 1.0,    0.0, 0.0, 1.0, 1.0, // 6
    -1.0,  1.0, 1.0,    0.0, 0.0, 0.0, 1.0, // 7
];

// Each face winds counter-clockwise seen from outside the cube, so
// back-face culling keeps exactly the outward faces.
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

pub struct SpinningCubeRaw {
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

    let stride = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as wgpu::BufferAddress;
    let pipeline = mk_render_pipeline(
        device,
        &layout,
        gpu.config.format,
        true,
        Some(wgpu::Face::Back),
        &[wgpu::VertexBufferLayout {
            array_stride: stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }],
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

    Ok(Box::new(SpinningCubeRaw {
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

impl Snapshot for SpinningCubeRaw {
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

        // The frame renders with the rotation as it was; the delta feeds the
        // next frame, so the very first frame is upright.
        self.rotation += Rad(dt.as_secs_f32());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;

    #[test]
    fn cube_references_every_vertex() {
        let referenced: HashSet<u16> = INDICES.iter().copied().collect();
        assert_eq!(referenced.len(), VERTICES.len() / FLOATS_PER_VERTEX);
    }

    #[test]
    fn cube_is_a_closed_mesh() {
        // In a closed mesh with consistent winding, every directed edge is
        // used exactly once and its reverse exactly once.
        let mut edges: HashMap<(u16, u16), u32> = HashMap::new();
        for triangle in INDICES.chunks(3) {
            for i in 0..3 {
                let edge = (triangle[i], triangle[(i + 1) % 3]);
                *edges.entry(edge).or_default() += 1;
            }
        }
        for ((a, b), count) in &edges {
            assert_eq!(*count, 1, "edge {a}->{b} used {count} times");
            assert_eq!(
                edges.get(&(*b, *a)),
                Some(&1),
                "edge {a}->{b} has no opposite"
            );
        }
    }

    #[test]
    fn cube_corners_span_the_unit_square_at_two_depths() {
        let mut near = 0;
        let mut far = 0;
        for vertex in VERTICES.chunks(FLOATS_PER_VERTEX) {
            assert!(vertex[0].abs() == 1.0 && vertex[1].abs() == 1.0);
            match vertex[2] {
                z if z == 0.0 => near += 1,
                z if z == 1.0 => far += 1,
                z => panic!("unexpected corner depth {z}"),
            }
        }
        assert_eq!((near, far), (4, 4));
    }
}
