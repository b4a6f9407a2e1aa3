//! Snapshot 01: a window and nothing else.
//!
//! The surface is cleared to opaque black every frame; there is no shader,
//! no geometry and no animation. Everything later snapshots add starts from
//! here.

use instant::Duration;

use crate::{context::Gpu, snapshot::Snapshot};

pub struct BlankWindow;

pub fn build(_gpu: &Gpu) -> anyhow::Result<Box<dyn Snapshot>> {
    Ok(Box::new(BlankWindow))
}

impl Snapshot for BlankWindow {
    fn frame(
        &mut self,
        _gpu: &Gpu,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        _dt: Duration,
    ) {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
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
    }
}
