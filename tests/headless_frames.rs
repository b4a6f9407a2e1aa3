//! Offscreen renders of the snapshots with pixel readback.
//!
//! These need a working GPU (or software adapter), so they are gated behind
//! the `integration-tests` feature like the rest of the GPU-touching tests:
//! `cargo test --features integration-tests`.

#![cfg(feature = "integration-tests")]

use std::time::Duration;

use cube_steps::{context::Gpu, snapshot::Snapshot as _, steps::Step};

const SIZE: u32 = 256;

fn headless_gpu() -> Option<Gpu> {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    match runtime.block_on(Gpu::headless(SIZE, SIZE)) {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            eprintln!("skipping: no usable adapter ({e})");
            None
        }
    }
}

/// Drive `step` for `frames` frames against an offscreen target and return
/// the final frame's RGBA bytes, row-major.
fn render(gpu: &Gpu, step: Step, frames: usize) -> Vec<u8> {
    let mut snapshot = (step.constructor())(gpu).expect("snapshot construction failed");

    let extent = wgpu::Extent3d {
        width: SIZE,
        height: SIZE,
        depth_or_array_layers: 1,
    };
    let target = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: gpu.config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    for _ in 0..frames {
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        snapshot.frame(gpu, &view, &mut encoder, Duration::from_millis(16));
        gpu.queue.submit(std::iter::once(encoder.finish()));
    }

    let bytes_per_row = 4 * SIZE;
    let output_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: None,
        size: (bytes_per_row * SIZE) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(SIZE),
            },
        },
        extent,
    );
    gpu.queue.submit(std::iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).unwrap();
    });
    gpu.device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(Duration::from_secs(3)),
        })
        .unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(rx.receive()).unwrap().unwrap();

    buffer_slice.get_mapped_range().to_vec()
}

fn pixel(data: &[u8], x: u32, y: u32) -> [u8; 4] {
    let i = ((y * SIZE + x) * 4) as usize;
    [data[i], data[i + 1], data[i + 2], data[i + 3]]
}

#[test]
fn colour_cycle_walks_the_red_channel() {
    let Some(gpu) = headless_gpu() else { return };
    // Two frames advance red twice: 10/255 on a linear target.
    let data = render(&gpu, Step::S02, 2);
    let expected = [10, 0, 0, 255];
    assert_eq!(pixel(&data, 0, 0), expected);
    assert_eq!(pixel(&data, SIZE / 2, SIZE / 2), expected);
    assert_eq!(pixel(&data, SIZE - 1, SIZE - 1), expected);
}

#[test]
fn shaded_quad_fills_the_centre_only() {
    let Some(gpu) = headless_gpu() else { return };
    let data = render(&gpu, Step::S04, 1);
    let centre = pixel(&data, SIZE / 2, SIZE / 2);
    assert_ne!(centre, [0, 0, 0, 255], "quad missing from the frame centre");
    assert_eq!(pixel(&data, 2, 2), [0, 0, 0, 255], "clear colour expected outside the quad");
}

#[test]
fn cube_faces_survive_depth_and_culling() {
    let Some(gpu) = headless_gpu() else { return };
    for step in [Step::S06, Step::S07] {
        let data = render(&gpu, step, 1);
        let centre = pixel(&data, SIZE / 2, SIZE / 2);
        assert_ne!(
            centre,
            [0, 0, 0, 255],
            "snapshot {step} culled its front face away"
        );
        assert_eq!(pixel(&data, 2, 2), [0, 0, 0, 255]);
    }
}

#[test]
fn textured_quad_samples_the_bundled_image() {
    let Some(gpu) = headless_gpu() else { return };
    let data = render(&gpu, Step::S08, 1);
    let corner = pixel(&data, 2, 2);
    // Outside the quad only the dark green clear colour remains.
    assert_eq!(corner[0], 0);
    assert!(corner[1] > 0);
    assert_eq!(corner[2], 0);
    let centre = pixel(&data, SIZE / 2, SIZE / 2);
    assert_ne!(centre, corner, "textured quad missing from the frame centre");
}
