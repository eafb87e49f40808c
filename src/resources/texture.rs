use anyhow::Context;

use crate::data_structures::{registry::TextureId, texture};

/// Group 0: the diffuse texture and its sampler.
pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
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
    })
}

#[derive(Debug)]
pub struct BoundTexture {
    pub texture: texture::Texture,
    pub bind_group: wgpu::BindGroup,
}

/// One bound texture per registered asset, indexed by [`TextureId`].
#[derive(Debug)]
pub struct TextureStore {
    layout: wgpu::BindGroupLayout,
    slots: Vec<BoundTexture>,
}

impl TextureStore {
    /// Fills every slot with the placeholder texture.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, assets: &[String]) -> anyhow::Result<Self> {
        let layout = texture_layout(device);
        let slots = assets
            .iter()
            .map(|asset| {
                let placeholder = texture::Texture::placeholder(device, queue, asset);
                bind(device, &layout, placeholder, asset)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { layout, slots })
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self, id: TextureId) -> Option<&wgpu::BindGroup> {
        self.slots.get(id.0).map(|slot| &slot.bind_group)
    }

    /// Swaps the placeholder in slot `id` for the decoded image.
    pub fn replace(
        &mut self,
        device: &wgpu::Device,
        id: TextureId,
        texture: texture::Texture,
        label: &str,
    ) -> anyhow::Result<()> {
        let bound = bind(device, &self.layout, texture, label)?;
        let slot = self
            .slots
            .get_mut(id.0)
            .with_context(|| format!("no texture slot {} for {label}", id.0))?;
        *slot = bound;
        Ok(())
    }
}

fn bind(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: texture::Texture,
    label: &str,
) -> anyhow::Result<BoundTexture> {
    let sampler = texture
        .sampler
        .as_ref()
        .with_context(|| format!("texture {label} has no sampler"))?;
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some(label),
    });
    Ok(BoundTexture {
        texture,
        bind_group,
    })
}
