//! GPU textures: the depth target the cube snapshots own and the decoded
//! image the textured snapshot samples.
//!
//! Image uploads go through premultiplied alpha and a vertical flip before
//! they reach the GPU, so a straight alpha PNG on disk samples correctly
//! with the texture-space origin in the top-left corner.

use anyhow::{Context, Result};
use image::GenericImageView;

/// A GPU texture with a view and, for sampled textures, a sampler.
#[derive(Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

impl Texture {
    /// Depth buffer format shared by every pipeline that depth-tests.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture matching the current surface size.
    ///
    /// The cube snapshots own one of these and recreate it whenever the
    /// surface is reconfigured.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            sampler: None,
        }
    }

    /// Decode raw image file data and upload it as an sRGB texture.
    ///
    /// The decoded pixels are converted to premultiplied alpha and flipped
    /// vertically before upload. The sampler uses nearest minification and
    /// linear magnification.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .with_context(|| format!("failed to decode image {label:?}"))?;
        let dimensions = img.dimensions();
        let mut rgba = img.to_rgba8();
        premultiply_alpha(&mut rgba);
        image::imageops::flip_vertical_in_place(&mut rgba);

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        }));

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

/// Convert straight alpha to premultiplied alpha in place.
pub fn premultiply_alpha(img: &mut image::RgbaImage) {
    for pixel in img.pixels_mut() {
        let a = pixel[3] as u16;
        for channel in 0..3 {
            pixel[channel] = (pixel[channel] as u16 * a / 255) as u8;
        }
    }
}

/// Read a file from the `assets` directory next to the working directory.
pub fn load_binary(file_name: &str) -> Result<Vec<u8>> {
    let path = std::path::Path::new("./").join("assets").join(file_name);
    std::fs::read(&path).with_context(|| format!("failed to read asset {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiply_scales_colour_by_alpha() {
        let mut img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 200, 0, 128]));
        premultiply_alpha(&mut img);
        let pixel = img.get_pixel(0, 0);
        assert_eq!(pixel[0], 128);
        assert_eq!(pixel[1], 100);
        assert_eq!(pixel[2], 0);
        assert_eq!(pixel[3], 128, "alpha itself must stay untouched");
    }

    #[test]
    fn premultiply_keeps_opaque_pixels() {
        let mut img = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        premultiply_alpha(&mut img);
        assert_eq!(*img.get_pixel(1, 1), image::Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn premultiply_zero_alpha_clears_colour() {
        let mut img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 0]));
        premultiply_alpha(&mut img);
        assert_eq!(*img.get_pixel(0, 0), image::Rgba([0, 0, 0, 0]));
    }
}
