//! Snapshot 08: a textured quad.
//!
//! Back to four vertices, now all white and carrying texture coordinates.
//! A PNG is decoded at construction, premultiplied, flipped and uploaded
//! once; the quad keeps the drift and rotation of the cube snapshots.
//! Culling goes away (the quad winds clockwise towards the viewer), the
//! depth test stays, and the clear colour turns a dark green.

use anyhow::Context as _;
use cgmath::Rad;
use instant::{Duration, Instant};
use wgpu::util::DeviceExt;

use crate::{
    context::Gpu,
    pipeline::mk_render_pipeline,
    snapshot::Snapshot,
    texture::{Texture, load_binary},
    transform,
};

const TEXTURE_FILE: &str = "rooster.png";

const CLEAR_COLOUR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.3,
    b: 0.0,
    a: 1.0,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    colour: [f32; 4],
    tex_coords: [f32; 2],
}

impl Vertex {
    const fn new(position: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            colour: [1.0, 1.0, 1.0, 1.0],
            tex_coords,
        }
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
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

const VERTICES: [Vertex; 4] = [
    Vertex::new([-1.0, -1.0, 0.0], [0.0, 0.0]), // 0
    Vertex::new([-1.0, 1.0, 0.0], [0.0, 1.0]),  // 1
    Vertex::new([1.0, 1.0, 0.0], [1.0, 1.0]),   // 2
    Vertex::new([1.0, -1.0, 0.0], [1.0, 0.0]),  // 3
];

const INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Transforms {
    projection: [[f32; 4]; 4],
    model_view: [[f32; 4]; 4],
}

pub struct TexturedQuad {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
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

    let bytes = load_binary(TEXTURE_FILE)?;
    let diffuse = Texture::from_bytes(device, &gpu.queue, &bytes, TEXTURE_FILE)?;
    let sampler = diffuse
        .sampler
        .as_ref()
        .context("decoded texture carries no sampler")?;

    let texture_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("texture_bind_group_layout"),
        });
    let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &texture_bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&diffuse.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("texture_bind_group"),
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
        bind_group_layouts: &[&bind_group_layout, &texture_bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = mk_render_pipeline(
        device,
        &layout,
        gpu.config.format,
        true,
        None,
        &[Vertex::desc()],
        wgpu::ShaderModuleDescriptor {
            label: Some("Textured Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/textured.wgsl").into()),
        },
    );

    let depth_texture = Texture::create_depth_texture(
        device,
        [gpu.config.width, gpu.config.height],
        "depth_texture",
    );

    Ok(Box::new(TexturedQuad {
        pipeline,
        vertex_buffer,
        index_buffer,
        uniform_buffer,
        bind_group,
        texture_bind_group,
        depth_texture,
        rotation: Rad(0.0),
        started: Instant::now(),
    }))
}

impl Snapshot for TexturedQuad {
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
                        load: wgpu::LoadOp::Clear(CLEAR_COLOUR),
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
            render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
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
    fn vertex_layout_appends_texture_coordinates() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 36);
        assert_eq!(desc.attributes[2].offset, 28);
    }

    #[test]
    fn texture_coordinates_cover_the_unit_square() {
        for vertex in &VERTICES {
            let [s, t] = vertex.tex_coords;
            let [x, y, _] = vertex.position;
            // Each corner maps to the matching corner of texture space.
            assert_eq!(s, (x + 1.0) / 2.0);
            assert_eq!(t, (y + 1.0) / 2.0);
            assert_eq!(vertex.colour, [1.0, 1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn bundled_texture_decodes() {
        let bytes = std::fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/assets/rooster.png"
        ))
        .expect("bundled texture missing");
        let rgba = image::load_from_memory(&bytes)
            .expect("bundled texture must decode")
            .to_rgba8();
        assert!(rgba.width() > 0 && rgba.height() > 0);
    }
}
