use rand::Rng;
use wgpu::util::DeviceExt;

use crate::{
    config::LightConfig,
    state::{CameraState, PartyMode},
};

/// The point light and its group 2 binding.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub color: [f32; 3],
    _padding2: u32,
    pub ambient: [f32; 3],
    _padding3: u32,
}

impl LightUniform {
    pub fn new(position: [f32; 3], color: [f32; 3], ambient: [f32; 3]) -> Self {
        Self {
            position,
            _padding: 0,
            color,
            _padding2: 0,
            ambient,
            _padding3: 0,
        }
    }

    /// The light for one frame. It travels with the eye and, during a party, takes one
    /// of the party colours at random.
    pub fn for_frame<R: Rng + ?Sized>(
        config: &LightConfig,
        camera: &CameraState,
        party: PartyMode,
        rng: &mut R,
    ) -> Self {
        let position = light_position(config, camera);
        let color = light_colour(config, party, rng);
        Self::new(position, color, config.ambient)
    }
}

pub fn light_position(config: &LightConfig, camera: &CameraState) -> [f32; 3] {
    let [x, y, z] = config.position;
    [x + camera.ex, y + camera.ey, z + camera.ez]
}

pub fn light_colour<R: Rng + ?Sized>(config: &LightConfig, party: PartyMode, rng: &mut R) -> [f32; 3] {
    if !party.is_on() || config.party_colours.is_empty() {
        return config.colour;
    }
    config.party_colours[rng.gen_range(0..config.party_colours.len())]
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

impl LightResources {
    pub fn new(uniform: LightUniform, device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("light_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, uniform: LightUniform) {
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
