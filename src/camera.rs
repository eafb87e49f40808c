//! Camera/transform composition.
//!
//! Each frame the [`Composer`] turns the current [`CameraState`] into the four
//! matrices the shader pair consumes. The view matrix is the fixed eye/target/up
//! triple from the configuration; input only ever moves the model matrix, which
//! keeps the camera conceptually inside the room.
//!
//! The shader applies `projection * model * view`, so the camera model matrix acts in
//! view space. Per-object placements are multiplied onto a copy of the base model
//! matrix (see [`FrameTransforms::placed`]); the base itself is never mutated.

use cgmath::{Deg, Matrix, Matrix4, Rad, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::{config::FixedView, state::CameraState};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective projection. The aspect follows the surface size.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Right-handed GL perspective remapped to wgpu's `[0, 1]` depth range.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Which model matrix the normal matrix is derived from.
///
/// The room was authored with the normal matrix taken from the model matrix *before*
/// the camera rotation is applied, which is always the identity. `BeforeCamera` keeps
/// that lighting; `Composed` derives it from the final camera model matrix instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalSource {
    #[default]
    BeforeCamera,
    Composed,
}

/// The matrices of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransforms {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub model: Matrix4<f32>,
    pub normal: Matrix4<f32>,
}

impl FrameTransforms {
    /// Model matrix for one placement: base camera transform followed by `local`.
    pub fn placed(&self, local: &Matrix4<f32>) -> Matrix4<f32> {
        self.model * local
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Composer {
    pub projection: Projection,
    view: FixedView,
    normal_source: NormalSource,
}

impl Composer {
    pub fn new(projection: Projection, view: FixedView) -> Self {
        Self {
            projection,
            view,
            normal_source: NormalSource::default(),
        }
    }

    pub fn with_normal_source(mut self, normal_source: NormalSource) -> Self {
        self.normal_source = normal_source;
        self
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.view.eye, self.view.target, self.view.up)
    }

    pub fn compose(&self, camera: &CameraState) -> FrameTransforms {
        let normal = match self.normal_source {
            NormalSource::BeforeCamera => normal_matrix(&Matrix4::identity()),
            NormalSource::Composed => normal_matrix(&camera_model(camera)),
        };
        FrameTransforms {
            projection: self.projection.calc_matrix(),
            view: self.view_matrix(),
            model: camera_model(camera),
            normal,
        }
    }
}

/// Camera model matrix: yaw then pitch pivoting around the eye, then the eye movement.
///
/// The rotations are sandwiched between `translate(-eye)` and `translate(+eye)`; the
/// pivot ignores the eye height, only the final movement applies it.
pub fn camera_model(camera: &CameraState) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(-camera.ex, 0.0, -camera.ez))
        * Matrix4::from_angle_y(Deg(camera.lx))
        * Matrix4::from_angle_x(Deg(camera.ly))
        * Matrix4::from_translation(Vector3::new(camera.ex, 0.0, camera.ez))
        * Matrix4::from_translation(Vector3::new(camera.ex, camera.ey, camera.ez))
}

/// Inverse-transpose of `model`. A singular model falls back to the identity.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix4<f32> {
    match model.invert() {
        Some(inverse) => inverse.transpose(),
        None => {
            log::warn!("model matrix is singular, using identity normal matrix");
            Matrix4::identity()
        }
    }
}

/// Uniform block for group 1: everything about the camera that is constant per frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            projection: identity,
            view: identity,
            normal: identity,
        }
    }

    pub fn update(&mut self, transforms: &FrameTransforms) {
        self.projection = transforms.projection.into();
        self.view = transforms.view.into();
        self.normal = transforms.normal.into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-draw model matrix, padded to a full dynamic-offset slot by the caller.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl From<Matrix4<f32>> for ModelUniform {
    fn from(model: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

/// The camera uniform and its group 1 binding.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = CameraUniform::new();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, transforms: &FrameTransforms) {
        self.uniform.update(transforms);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
