//! Snapshot 04: the first shader pair and vertex upload.
//!
//! Four vertices carry position and colour in one flat float array, baked at
//! scene depth so no model-view is needed yet. The projection is recomputed
//! from the surface size every frame and rewritten into the uniform buffer.

use instant::Duration;
use wgpu::util::DeviceExt;

use crate::{context::Gpu, pipeline::mk_render_pipeline, snapshot::Snapshot, transform};

/// Position xyz followed by colour rgba.
const FLOATS_PER_VERTEX: usize = 7;

#[rustfmt::skip]
const VERTICES: [f32; 4 * FLOATS_PER_VERTEX] = [
     1.0, -1.0, -7.0,    1.0, 0.0, 0.0, 1.0,
     1.0,  1.0, -7.0,    0.0, 1.0, 0.0, 1.0,
    -1.0,  1.0, -7.0,    0.0, 0.0, 1.0, 1.0,
    -1.0, -1.0, -7.0,    0.0, 0.0, 0.0, 1.0,
];

const INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Transforms {
    projection: [[f32; 4]; 4],
}

pub struct ShadedQuad {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub fn build(gpu: &Gpu) -> anyhow::Result<Box<dyn Snapshot>> {
    let device = &gpu.device;

    let uniform = Transforms {
        projection: transform::projection(gpu.config.width, gpu.config.height).into(),
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
        label: Some("Quad Vertex Buffer"),
        contents: bytemuck::cast_slice(&VERTICES),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Quad Index Buffer"),
        contents: bytemuck::cast_slice(&INDICES),
        usage: wgpu::BufferUsages::INDEX,
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Render Pipeline Layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    // The flat array needs its attribute offsets spelled out by hand; the
    // next snapshots derive them from a vertex struct instead.
    let stride = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as wgpu::BufferAddress;
    let pipeline = mk_render_pipeline(
        device,
        &layout,
        gpu.config.format,
        false,
        None,
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
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/quad.wgsl").into()),
        },
    );

    Ok(Box::new(ShadedQuad {
        pipeline,
        vertex_buffer,
        index_buffer,
        uniform_buffer,
        bind_group,
    }))
}

impl Snapshot for ShadedQuad {
    fn frame(
        &mut self,
        gpu: &Gpu,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        _dt: Duration,
    ) {
        let uniform = Transforms {
            projection: transform::projection(gpu.config.width, gpu.config.height).into(),
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));

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
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..INDICES.len() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_references_every_vertex() {
        let referenced: std::collections::HashSet<u16> = INDICES.iter().copied().collect();
        assert_eq!(referenced.len(), VERTICES.len() / FLOATS_PER_VERTEX);
    }

    #[test]
    fn vertices_sit_on_the_scene_plane() {
        for vertex in VERTICES.chunks(FLOATS_PER_VERTEX) {
            assert_eq!(vertex[2], -7.0);
            // Colour channels are plain 0/1 primaries.
            assert!(vertex[3..].iter().all(|c| *c == 0.0 || *c == 1.0));
        }
    }
}
