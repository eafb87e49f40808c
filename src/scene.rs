//! The living room itself.
//!
//! [`Room::living_room`] authors the geometry table and the texture registry side by
//! side, in draw order, so that every registry entry covers exactly the runs its shapes
//! appended. Placements are the compounded local transforms of each object relative to
//! the camera model matrix, computed once here instead of being applied and undone
//! between draw calls.

use anyhow::ensure;
use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

use crate::data_structures::{
    geometry::{GeometryBuilder, GeometryTable, Span},
    registry::{Entry, Placement, TextureRegistry, TextureSlot},
};

/// The TV picture for each channel, in channel order.
pub const CHANNEL_ASSETS: [&str; 4] = ["static.jpg", "gru.jpg", "simpsons.jpg", "yoda.jpg"];

const ROOM_SIZE: f32 = 7.5;
const ROOM_HEIGHT: f32 = 4.0;
/// Depth of the pictures in front of the wall they hang on.
const ON_WALL: f32 = 0.1001;

const TABLE_OUTLINE: [[f32; 2]; 8] = [
    [-1.21, -0.5],
    [-0.5, -1.21],
    [0.5, -1.21],
    [1.21, -0.5],
    [1.21, 0.5],
    [0.5, 1.21],
    [-0.5, 1.21],
    [-1.21, 0.5],
];
const TABLE_TOP: f32 = 1.0;
const TABLE_BOTTOM: f32 = 0.9;

/// Static geometry plus the registry that draws it.
#[derive(Debug)]
pub struct Room {
    pub geometry: GeometryTable,
    pub registry: TextureRegistry,
}

fn translate(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

fn rotate_y(degrees: f32) -> Matrix4<f32> {
    Matrix4::from_angle_y(Deg(degrees))
}

/// A span made of several quad shapes appended back to back.
fn quads(spans: &[Span]) -> Span {
    Span::Quads(spans.iter().map(|span| span.runs()).sum())
}

/// The local transforms of everything placed after the first picture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placements {
    pub pictures: [Matrix4<f32>; 4],
    pub table: Matrix4<f32>,
    pub leg: Matrix4<f32>,
    /// Before the chair offset is applied.
    pub chairs: [Matrix4<f32>; 4],
}

impl Placements {
    pub fn compute() -> Self {
        let picture2 = Matrix4::identity();
        let picture3 = picture2 * translate(0.0, -1.4, 0.0);
        let picture4 = picture3 * translate(1.0, 1.4, 1.0);
        let picture5 = picture4 * translate(0.0, -1.4, 0.0);

        let table = picture5 * translate(1.0, 1.2, 5.5);
        let leg = table
            * translate(3.0, 6.99, -7.0)
            * Matrix4::from_nonuniform_scale(0.2, 8.0, 0.2)
            * translate(-15.0, 0.0, -21.0);

        let chair1 = leg
            * Matrix4::from_nonuniform_scale(5.0, 0.125, 5.0)
            * translate(12.8, -6.79, -2.0)
            * rotate_y(90.0);
        let chair2 = chair1 * rotate_y(-90.0) * translate(-13.6, 0.0, 11.7);
        let chair3 = chair2 * translate(-1.7, 0.0, 4.6) * rotate_y(180.0) * translate(-3.3, 0.0, 30.1);
        let chair4 = chair3 * rotate_y(90.0) * translate(12.0, 0.0, 13.5);

        Self {
            pictures: [picture2, picture3, picture4, picture5],
            table,
            leg,
            chairs: [chair1, chair2, chair3, chair4],
        }
    }
}

impl Room {
    pub fn living_room() -> anyhow::Result<Self> {
        let mut geometry = GeometryBuilder::new();
        let mut registry = TextureRegistry::new(CHANNEL_ASSETS);
        let placements = Placements::compute();
        let (size, height) = (ROOM_SIZE, ROOM_HEIGHT);

        let floor = registry.texture("floor.png");
        let span = geometry.quad(
            [[0.0, 0.0, 0.0], [size, 0.0, 0.0], [0.0, 0.0, size], [size, 0.0, size]],
            [0.0, 1.0, 0.0],
        );
        registry.push(Entry::new("floor", TextureSlot::Static(floor), span));

        let wall = registry.texture("wall1.png");
        let span = geometry.quad(
            [[0.0, height, size], [0.0, height, 0.0], [0.0, 0.0, size], [0.0, 0.0, 0.0]],
            [1.0, 0.0, 0.0],
        );
        registry.push(Entry::new("left wall", TextureSlot::Static(wall), span));

        let wallpaper = registry.texture("wallpaper.jpg");
        let span = geometry.quad(
            [[0.0, height, 0.0], [size, height, 0.0], [0.0, 0.0, 0.0], [size, 0.0, 0.0]],
            [0.0, 0.0, 1.0],
        );
        registry.push(Entry::new("right wall", TextureSlot::Static(wallpaper), span));

        let ceiling = registry.texture("ceiling.png");
        let span = geometry.quad(
            [[0.0, height, size], [size, height, size], [0.0, height, 0.0], [size, height, 0.0]],
            [0.0, -1.0, 0.0],
        );
        registry.push(Entry::new("ceiling", TextureSlot::Static(ceiling), span));

        let lightshade = registry.texture("lightshade.png");
        let span = quads(&[
            geometry.sleeve([3.72, 3.5, 3.72], [3.77, 4.0, 3.77]),
            geometry.cuboid([3.5, 3.0, 3.5], [4.0, 3.5, 4.0]),
        ]);
        registry.push(Entry::new("light", TextureSlot::Static(lightshade), span));

        let sofa = registry.texture("sofa.jpg");
        let span = quads(&[
            geometry.cuboid([0.0, 0.25, 1.0], [0.3, 1.5, 4.0]),
            geometry.cuboid([0.3, 0.25, 3.7], [1.0, 1.1, 4.0]),
            geometry.cuboid([0.3, 0.25, 1.0], [1.0, 1.1, 1.3]),
            geometry.cuboid([0.3, 0.25, 1.3], [1.0, 0.55, 3.7]),
        ]);
        registry.push(Entry::new("sofa body", TextureSlot::Static(sofa), span));

        let wood = registry.texture("wood.jpeg");
        let span = quads(&[
            geometry.cuboid([0.0, 0.0, 3.8], [0.2, 0.25, 4.0]),
            geometry.cuboid([0.8, 0.0, 3.8], [1.0, 0.25, 4.0]),
            geometry.cuboid([0.8, 0.0, 1.0], [1.0, 0.25, 1.2]),
            geometry.cuboid([0.0, 0.0, 1.0], [0.2, 0.25, 1.2]),
        ]);
        registry.push(Entry::new("sofa feet", TextureSlot::Static(wood), span));

        let border = registry.texture("border.jpg");
        let span = geometry.cuboid([1.8, 1.3, 0.0], [3.5, 2.4, 0.1]);
        registry.push(Entry::new("tv frame", TextureSlot::Static(border), span));

        let span = geometry.quad(
            [
                [1.9, 2.3, ON_WALL],
                [3.4, 2.3, ON_WALL],
                [1.9, 1.4, ON_WALL],
                [3.4, 1.4, ON_WALL],
            ],
            [0.0, 0.0, 1.0],
        );
        registry.push(Entry::new("tv screen", TextureSlot::Channel, span));

        let frame = registry.texture("frame.jpeg");
        let span = geometry.cuboid([0.0, 2.2, 1.5], [0.1, 3.4, 3.5]);
        registry.push(Entry::new("picture frame", TextureSlot::Static(frame), span));

        let picture1 = registry.texture("picture1.jpg");
        let span = geometry.quad(
            [
                [ON_WALL, 3.2, 3.3],
                [ON_WALL, 3.2, 1.7],
                [ON_WALL, 2.4, 3.3],
                [ON_WALL, 2.4, 1.7],
            ],
            [1.0, 0.0, 0.0],
        );
        registry.push(Entry::new("picture", TextureSlot::Static(picture1), span));

        let frame2 = registry.texture("frame2.jpg");
        let span = geometry.cuboid([4.5, 2.5, 0.0], [5.5, 3.5, 0.1]);
        let hung = placements.pictures.iter().map(|local| Placement::at(*local)).collect();
        registry.push(Entry::new("small frames", TextureSlot::Static(frame2), span).placed(hung));

        let canvases = ["dino.jpg", "picture2.jpg", "peppers.png", "dolphins.jpg"]
            .map(|asset| registry.texture(asset));
        let span = geometry.quad(
            [
                [4.7, 3.3, ON_WALL],
                [5.3, 3.3, ON_WALL],
                [4.7, 2.7, ON_WALL],
                [5.3, 2.7, ON_WALL],
            ],
            [0.0, 0.0, 1.0],
        );
        let hung = placements
            .pictures
            .iter()
            .zip(canvases)
            .map(|(local, canvas)| Placement::at(*local).with_texture(canvas))
            .collect();
        registry.push(
            Entry::new("small pictures", TextureSlot::Static(canvases[0]), span).placed(hung),
        );

        let table = registry.texture("table.png");
        let span = geometry.octagon_caps(TABLE_OUTLINE, TABLE_TOP, TABLE_BOTTOM);
        registry.push(
            Entry::new("table top", TextureSlot::Static(table), span)
                .placed(vec![Placement::at(placements.table)]),
        );

        let span = geometry.octagon_band(TABLE_OUTLINE, TABLE_TOP, TABLE_BOTTOM);
        registry.push(
            Entry::new("table rim", TextureSlot::Static(table), span).placed(vec![
                Placement::at(placements.table),
                Placement::at(placements.leg),
            ]),
        );

        let span = quads(&[
            geometry.cuboid([0.0, 0.4, 0.0], [0.2, 1.3, 0.7]),
            geometry.cuboid([0.2, 0.4, 0.0], [0.7, 0.6, 0.7]),
            geometry.sleeve([0.0, 0.0, 0.5], [0.2, 0.4, 0.7]),
            geometry.sleeve([0.5, 0.0, 0.5], [0.7, 0.4, 0.7]),
            geometry.sleeve([0.0, 0.0, 0.0], [0.2, 0.4, 0.2]),
            geometry.sleeve([0.5, 0.0, 0.0], [0.7, 0.4, 0.2]),
        ]);
        let [movable, chair2, chair3, chair4] = placements.chairs;
        registry.push(Entry::new("chairs", TextureSlot::Static(sofa), span).placed(vec![
            Placement::at(movable).following_chair(),
            Placement::at(chair2),
            Placement::at(chair3),
            Placement::at(chair4),
        ]));

        let room = Self::new(geometry.build()?, registry)?;
        log::debug!(
            "living room: {} vertices, {} runs, {} textures",
            room.geometry.vertex_count(),
            room.geometry.runs(),
            room.registry.assets().len()
        );
        Ok(room)
    }

    /// Pairs geometry with the registry that draws it. Both must cover the same runs.
    pub fn new(geometry: GeometryTable, registry: TextureRegistry) -> anyhow::Result<Self> {
        ensure!(
            registry.runs() == geometry.runs(),
            "registry covers {} runs but {} were authored",
            registry.runs(),
            geometry.runs()
        );
        Ok(Self { geometry, registry })
    }
}
