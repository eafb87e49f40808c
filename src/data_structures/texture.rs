//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around WGPU GPU texture resources,
//! and helper methods for creating the depth buffer, the one-pixel placeholder that
//! stands in while an image is loading, and textures decoded from image files.

use anyhow::{Context, Result, bail};
use image::{GenericImageView, imageops::FilterType};

/// Colour of the placeholder pixel shown until an image has loaded.
pub const PLACEHOLDER_PIXEL: [u8; 4] = [0, 0, 255, 255];

/// How a decoded image is sampled, chosen from its dimensions alone.
///
/// Power-of-two images get a full mip chain and repeat addressing. Anything else is
/// uploaded as a single level and clamped at the edges, the only combination WebGL 1
/// era hardware accepts for such sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerPolicy {
    pub mip_level_count: u32,
    pub address_mode: wgpu::AddressMode,
    pub min_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::FilterMode,
}

pub fn is_power_of_two(value: u32) -> bool {
    value != 0 && value & (value - 1) == 0
}

pub fn sampler_policy(width: u32, height: u32) -> SamplerPolicy {
    if is_power_of_two(width) && is_power_of_two(height) {
        SamplerPolicy {
            mip_level_count: 32 - width.max(height).leading_zeros(),
            address_mode: wgpu::AddressMode::Repeat,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
        }
    } else {
        SamplerPolicy {
            mip_level_count: 1,
            address_mode: wgpu::AddressMode::ClampToEdge,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
        }
    }
}

/// Rejects images the device cannot hold in one 2D texture.
pub fn check_dimensions(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("image has no pixels");
    }
    if width > max_dimension || height > max_dimension {
        bail!("image is {width}x{height}, the device allows at most {max_dimension}x{max_dimension}");
    }
    Ok(())
}

/// The images of every mip level, largest first. Each level is resized from the
/// full-size image with a triangle filter.
pub fn mip_chain(image: &image::RgbaImage, levels: u32) -> Vec<image::RgbaImage> {
    let mut chain = vec![image.clone()];
    for level in 1..levels {
        let width = (image.width() >> level).max(1);
        let height = (image.height() >> level).max(1);
        chain.push(image::imageops::resize(image, width, height, FilterType::Triangle));
    }
    chain
}

/// A GPU texture with a view and optional sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    /// Texels reach the shader still gamma encoded, so lighting is computed on them as stored.
    pub const COLOUR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
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
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
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

    /// A 1x1 texture holding [`PLACEHOLDER_PIXEL`].
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue, label: &str) -> Self {
        let pixel = image::RgbaImage::from_pixel(1, 1, image::Rgba(PLACEHOLDER_PIXEL));
        let policy = sampler_policy(1, 1);
        Self::upload(device, queue, &[pixel], policy, label)
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: &str,
    ) -> Result<Self> {
        let (width, height) = img.dimensions();
        check_dimensions(width, height, device.limits().max_texture_dimension_2d)
            .with_context(|| format!("cannot upload {label}"))?;
        let policy = sampler_policy(width, height);
        let chain = mip_chain(&img.to_rgba8(), policy.mip_level_count);
        Ok(Self::upload(device, queue, &chain, policy, label))
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        chain: &[image::RgbaImage],
        policy: SamplerPolicy,
        label: &str,
    ) -> Self {
        let (width, height) = chain
            .first()
            .map(|level| level.dimensions())
            .unwrap_or((1, 1));
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: chain.len().max(1) as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOUR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in chain.iter().enumerate() {
            let (level_width, level_height) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                },
                level,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level_width),
                    rows_per_image: Some(level_height),
                },
                wgpu::Extent3d {
                    width: level_width,
                    height: level_height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: policy.address_mode,
            address_mode_v: policy.address_mode,
            address_mode_w: policy.address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: policy.min_filter,
            mipmap_filter: policy.mipmap_filter,
            ..Default::default()
        }));

        Self {
            texture,
            view,
            sampler,
        }
    }
}
