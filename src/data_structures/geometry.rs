//! The static geometry of the scene.
//!
//! All objects share one [`GeometryTable`]: a position, normal and texture-coordinate
//! array plus one 16-bit index array. The index array is a sequence of *runs* of six
//! indices (two triangles, one quad face); a run's position is its face id. Objects do
//! not know where they start, they only know how many runs they span, which is what
//! the [`GeometryBuilder`] hands back for every shape it appends.

use anyhow::{Context, bail};
use wgpu::util::DeviceExt;

/// Indices per run (two triangles).
pub const RUN_LEN: u32 = 6;

/// How many runs an object covers and how it is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Span {
    /// One draw call per run.
    Quads(u32),
    /// A single triangle-list draw over `runs * 6` indices (the octagonal table top).
    Fan { runs: u32 },
}

impl Span {
    pub fn runs(self) -> u32 {
        match self {
            Span::Quads(runs) => runs,
            Span::Fan { runs } => runs,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GeometryTable {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl GeometryTable {
    /// Number of complete runs in the index array.
    pub fn runs(&self) -> u32 {
        self.indices.len() as u32 / RUN_LEN
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Appends whole runs to a [`GeometryTable`].
///
/// Quads are given as four corners in reading order (top-left, top-right, bottom-left,
/// bottom-right as seen from the side the normal points to) and become the triangles
/// `0 1 2` and `1 2 3`.
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    table: GeometryTable,
}

const QUAD_UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> u32 {
        self.table.runs()
    }

    fn vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.table.positions.len() as u32;
        self.table.positions.push(position);
        self.table.normals.push(normal);
        self.table.tex_coords.push(uv);
        index
    }

    fn index(&mut self, index: u32) {
        // Overflow is caught by `build`; the value is truncated until then.
        self.table.indices.push(index as u16);
    }

    fn face(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) -> u32 {
        let base = self.vertex(corners[0], normal, QUAD_UV[0]);
        for i in 1..4 {
            self.vertex(corners[i], normal, QUAD_UV[i]);
        }
        for offset in [0, 1, 2, 1, 2, 3] {
            self.index(base + offset);
        }
        1
    }

    pub fn quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) -> Span {
        Span::Quads(self.face(corners, normal))
    }

    /// Axis-aligned box, six faces with outward normals.
    pub fn cuboid(&mut self, min: [f32; 3], max: [f32; 3]) -> Span {
        let sides = self.sides(min, max);
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;
        let top = self.face(
            [[x0, y1, z0], [x1, y1, z0], [x0, y1, z1], [x1, y1, z1]],
            [0.0, 1.0, 0.0],
        );
        let bottom = self.face(
            [[x0, y0, z1], [x1, y0, z1], [x0, y0, z0], [x1, y0, z0]],
            [0.0, -1.0, 0.0],
        );
        Span::Quads(sides + top + bottom)
    }

    /// The four vertical sides of an axis-aligned box, without top and bottom.
    pub fn sleeve(&mut self, min: [f32; 3], max: [f32; 3]) -> Span {
        Span::Quads(self.sides(min, max))
    }

    fn sides(&mut self, min: [f32; 3], max: [f32; 3]) -> u32 {
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;
        let front = self.face(
            [[x0, y1, z1], [x1, y1, z1], [x0, y0, z1], [x1, y0, z1]],
            [0.0, 0.0, 1.0],
        );
        let right = self.face(
            [[x1, y1, z1], [x1, y1, z0], [x1, y0, z1], [x1, y0, z0]],
            [1.0, 0.0, 0.0],
        );
        let back = self.face(
            [[x1, y1, z0], [x0, y1, z0], [x1, y0, z0], [x0, y0, z0]],
            [0.0, 0.0, -1.0],
        );
        let left = self.face(
            [[x0, y1, z0], [x0, y1, z1], [x0, y0, z0], [x0, y0, z1]],
            [-1.0, 0.0, 0.0],
        );
        front + right + back + left
    }

    /// Top and bottom caps of an octagonal prism as two triangle fans around their
    /// centres: 16 triangles, drawn as one call.
    pub fn octagon_caps(&mut self, outline: [[f32; 2]; 8], top: f32, bottom: f32) -> Span {
        for (y, normal) in [(top, [0.0, 1.0, 0.0]), (bottom, [0.0, -1.0, 0.0])] {
            let rim: Vec<u32> = outline
                .iter()
                .map(|&[x, z]| self.vertex([x, y, z], normal, octagon_uv(x, z)))
                .collect();
            let centre = self.vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
            for i in 0..rim.len() {
                self.index(rim[i]);
                self.index(rim[(i + 1) % rim.len()]);
                self.index(centre);
            }
        }
        Span::Fan {
            runs: 2 * outline.len() as u32 * 3 / RUN_LEN,
        }
    }

    /// The eight side faces of an octagonal prism.
    pub fn octagon_band(&mut self, outline: [[f32; 2]; 8], top: f32, bottom: f32) -> Span {
        let mut runs = 0;
        for i in 0..outline.len() {
            let [ax, az] = outline[i];
            let [bx, bz] = outline[(i + 1) % outline.len()];
            let (mx, mz) = ((ax + bx) * 0.5, (az + bz) * 0.5);
            let length = (mx * mx + mz * mz).sqrt().max(f32::EPSILON);
            let normal = [mx / length, 0.0, mz / length];
            runs += self.face(
                [[ax, top, az], [bx, top, bz], [ax, bottom, az], [bx, bottom, bz]],
                normal,
            );
        }
        Span::Quads(runs)
    }

    pub fn build(self) -> anyhow::Result<GeometryTable> {
        let vertices = self.table.vertex_count();
        if vertices > u16::MAX as usize + 1 {
            bail!("{vertices} vertices do not fit 16-bit indices");
        }
        if self.table.indices.len() as u32 % RUN_LEN != 0 {
            bail!(
                "index array of length {} is not made of whole runs",
                self.table.indices.len()
            );
        }
        Ok(self.table)
    }
}

/// Maps the octagon outline (radius ~1.31) onto the unit texture square.
fn octagon_uv(x: f32, z: f32) -> [f32; 2] {
    let half = 1.21 * 2.0;
    [(x / half + 0.5).clamp(0.0, 1.0), (z / half + 0.5).clamp(0.0, 1.0)]
}

/// Vertex layouts of the three attribute buffers, one attribute each.
pub mod layout {
    pub const POSITION: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    };

    pub const NORMAL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        }],
    };

    pub const TEX_COORDS: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        }],
    };
}

/// The geometry table resident on the GPU.
#[derive(Debug)]
pub struct GeometryBuffers {
    pub positions: wgpu::Buffer,
    pub normals: wgpu::Buffer,
    pub tex_coords: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub index_count: u32,
}

impl GeometryBuffers {
    pub fn upload(device: &wgpu::Device, table: &GeometryTable) -> anyhow::Result<Self> {
        if table.indices.is_empty() {
            bail!("refusing to upload an empty geometry table");
        }
        let index_count = u32::try_from(table.indices.len()).context("index array too long")?;
        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Position Buffer"),
            contents: bytemuck::cast_slice(&table.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let normals = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Normal Buffer"),
            contents: bytemuck::cast_slice(&table.normals),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let tex_coords = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("TexCoord Buffer"),
            contents: bytemuck::cast_slice(&table.tex_coords),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&table.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Ok(Self {
            positions,
            normals,
            tex_coords,
            indices,
            index_count,
        })
    }
}
