//! Recorded draw commands.
//!
//! The [`DrawSequencer`](crate::sequencer::DrawSequencer) does not talk to wgpu
//! directly; it drives a [`DrawTarget`]. The renderer records into a [`DrawList`],
//! uploads the collected model matrices into one dynamic-offset uniform buffer and then
//! replays the list onto the render pass. Tests drive the same trait with mocks.

use std::ops::Range;

use cgmath::Matrix4;

use crate::{
    camera::ModelUniform,
    data_structures::registry::TextureId,
    resources::texture::TextureStore,
};

/// Receiver of the per-draw state changes and draw calls of one frame.
pub trait DrawTarget {
    /// Model matrix for the draws that follow.
    fn set_model(&mut self, model: Matrix4<f32>);
    fn bind_texture(&mut self, texture: TextureId);
    /// Triangle-list draw over `indices` of the shared index buffer.
    fn draw_indexed(&mut self, indices: Range<u32>);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Select model slot `n` of the frame's model buffer.
    Model(u32),
    Texture(TextureId),
    Indexed(Range<u32>),
}

/// A frame's worth of commands plus the model matrices they refer to.
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    pub models: Vec<Matrix4<f32>>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Indexed(_)))
            .count()
    }

    /// Model matrices laid out at `stride` bytes apart, ready for the dynamic uniform.
    pub fn model_bytes(&self, stride: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; self.models.len() * stride];
        for (slot, model) in self.models.iter().enumerate() {
            let uniform = ModelUniform::from(*model);
            let raw = bytemuck::bytes_of(&uniform);
            bytes[slot * stride..slot * stride + raw.len()].copy_from_slice(raw);
        }
        bytes
    }

    /// Encodes the list. The caller has already bound the pipeline, the vertex and index
    /// buffers and the per-frame groups.
    pub fn replay<'pass>(
        &self,
        render_pass: &mut wgpu::RenderPass<'pass>,
        textures: &TextureStore,
        model_group: &wgpu::BindGroup,
        stride: u32,
    ) {
        for command in &self.commands {
            match command {
                DrawCommand::Model(slot) => {
                    render_pass.set_bind_group(3, model_group, &[slot * stride]);
                }
                DrawCommand::Texture(texture) => match textures.bind_group(*texture) {
                    Some(group) => render_pass.set_bind_group(0, group, &[]),
                    None => log::warn!("texture {:?} is not in the store", texture),
                },
                DrawCommand::Indexed(range) => render_pass.draw_indexed(range.clone(), 0, 0..1),
            }
        }
    }
}

impl DrawTarget for DrawList {
    fn set_model(&mut self, model: Matrix4<f32>) {
        self.commands.push(DrawCommand::Model(self.models.len() as u32));
        self.models.push(model);
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.commands.push(DrawCommand::Texture(texture));
    }

    fn draw_indexed(&mut self, indices: Range<u32>) {
        self.commands.push(DrawCommand::Indexed(indices));
    }
}

/// Group 3: one model matrix per draw, selected by dynamic offset.
#[derive(Debug)]
pub struct ModelResources {
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    /// Bytes between two model slots.
    pub stride: u32,
    capacity: usize,
}

impl ModelResources {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let stride = model_stride(device.limits().min_uniform_buffer_offset_alignment);
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ModelUniform>() as wgpu::BufferAddress,
                    ),
                },
                count: None,
            }],
            label: Some("model_bind_group_layout"),
        });
        let (buffer, bind_group) = Self::allocate(device, &bind_group_layout, stride, capacity.max(1));
        Self {
            bind_group_layout,
            buffer,
            bind_group,
            stride,
            capacity: capacity.max(1),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u32,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Buffer"),
            size: (stride as usize * capacity) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(
                        std::mem::size_of::<ModelUniform>() as wgpu::BufferAddress,
                    ),
                }),
            }],
            label: Some("model_bind_group"),
        });
        (buffer, bind_group)
    }

    /// Uploads the models of `list`, growing the buffer if the list outgrew it.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, list: &DrawList) {
        if list.models.len() > self.capacity {
            log::debug!("growing model buffer to {} slots", list.models.len());
            self.capacity = list.models.len();
            let (buffer, bind_group) =
                Self::allocate(device, &self.bind_group_layout, self.stride, self.capacity);
            self.buffer = buffer;
            self.bind_group = bind_group;
        }
        if !list.models.is_empty() {
            queue.write_buffer(&self.buffer, 0, &list.model_bytes(self.stride as usize));
        }
    }
}

/// Size of a model slot: the uniform rounded up to the device's offset alignment.
pub fn model_stride(alignment: u32) -> u32 {
    let size = std::mem::size_of::<ModelUniform>() as u32;
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}
