use cgmath::Matrix4;
use living_room::{
    config::LightConfig,
    data_structures::{
        geometry::{GeometryBuilder, RUN_LEN, Span},
        registry::{Entry, Placement, TextureRegistry, TextureSlot},
        texture::{PLACEHOLDER_PIXEL, is_power_of_two, mip_chain, sampler_policy},
    },
    pipelines::light::{LightUniform, light_colour, light_position},
    render::model_stride,
    scene::{CHANNEL_ASSETS, Room},
    state::{CameraState, PartyMode, TvChannel},
};
use rand::{SeedableRng, rngs::StdRng};

use crate::common::test_utils::{EPSILON, approx_eq};

mod common;

#[test]
fn living_room_registry_covers_the_whole_table() {
    let room = Room::living_room().unwrap();
    assert_eq!(room.geometry.indices.len() as u32 % RUN_LEN, 0);
    assert_eq!(room.registry.runs(), room.geometry.runs());
    assert_eq!(room.geometry.runs(), 127);
    assert_eq!(room.registry.placement_count(), 26);

    let vertices = room.geometry.vertex_count();
    assert!(room.geometry.indices.iter().all(|&index| (index as usize) < vertices));
    assert_eq!(room.geometry.normals.len(), vertices);
    assert_eq!(room.geometry.tex_coords.len(), vertices);
}

#[test]
fn assets_are_registered_once_with_channels_first() {
    let room = Room::living_room().unwrap();
    let assets = room.registry.assets();
    assert_eq!(&assets[..4], CHANNEL_ASSETS.map(String::from).as_slice());

    let mut unique = assets.to_vec();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), assets.len());
    assert!(assets.iter().any(|asset| asset == "sofa.jpg"));
    assert!(assets.iter().any(|asset| asset == "table.png"));
}

#[test]
fn run_counts_match_the_authored_objects() {
    let room = Room::living_room().unwrap();
    let runs: Vec<(&str, u32)> = room
        .registry
        .entries()
        .iter()
        .map(|entry| (entry.label, entry.span.runs()))
        .collect();
    assert_eq!(
        runs,
        [
            ("floor", 1),
            ("left wall", 1),
            ("right wall", 1),
            ("ceiling", 1),
            ("light", 10),
            ("sofa body", 24),
            ("sofa feet", 24),
            ("tv frame", 6),
            ("tv screen", 1),
            ("picture frame", 6),
            ("picture", 1),
            ("small frames", 6),
            ("small pictures", 1),
            ("table top", 8),
            ("table rim", 8),
            ("chairs", 28),
        ]
    );
}

#[test]
fn builder_appends_whole_runs() {
    let mut builder = GeometryBuilder::new();
    assert_eq!(builder.cuboid([0.0; 3], [1.0; 3]), Span::Quads(6));
    assert_eq!(builder.sleeve([0.0; 3], [1.0; 3]), Span::Quads(4));
    let outline = [
        [-1.0, -0.5],
        [-0.5, -1.0],
        [0.5, -1.0],
        [1.0, -0.5],
        [1.0, 0.5],
        [0.5, 1.0],
        [-0.5, 1.0],
        [-1.0, 0.5],
    ];
    assert_eq!(builder.octagon_caps(outline, 1.0, 0.9), Span::Fan { runs: 8 });
    assert_eq!(builder.octagon_band(outline, 1.0, 0.9), Span::Quads(8));
    assert_eq!(builder.runs(), 26);

    let table = builder.build().unwrap();
    assert_eq!(table.indices.len(), 26 * 6);
    // Two fans of nine vertices each, four vertices per quad otherwise.
    assert_eq!(table.vertex_count(), 18 * 4 + 18);
}

#[test]
fn cuboid_normals_point_outwards() {
    let mut builder = GeometryBuilder::new();
    builder.cuboid([-1.0; 3], [1.0; 3]);
    let table = builder.build().unwrap();
    for (position, normal) in table.positions.iter().zip(&table.normals) {
        let outward: f32 = position.iter().zip(normal).map(|(p, n)| p * n).sum();
        assert!(outward > 0.0, "{position:?} has inward normal {normal:?}");
    }
}

#[test]
fn oversized_tables_are_rejected() {
    let mut builder = GeometryBuilder::new();
    for _ in 0..16_385 {
        builder.quad([[0.0; 3]; 4], [0.0, 1.0, 0.0]);
    }
    assert!(builder.build().is_err());
}

#[test]
fn channel_slot_resolves_against_the_selector() {
    let mut registry = TextureRegistry::new(CHANNEL_ASSETS);
    let frame = registry.texture("frame.jpeg");
    let screen = Entry::new("screen", TextureSlot::Channel, Span::Quads(1));
    let placement = Placement::base();
    for channel in TvChannel::ALL {
        assert_eq!(
            registry.resolve(&screen, &placement, channel),
            registry.channels()[channel.index()]
        );
    }

    let overridden = Placement::base().with_texture(frame);
    assert_eq!(registry.resolve(&screen, &overridden, TvChannel::Yoda), frame);
    assert_eq!(registry.texture("frame.jpeg"), frame);
}

#[test]
fn empty_placement_lists_keep_the_base_placement() {
    let entry = Entry::new("wall", TextureSlot::Channel, Span::Quads(1)).placed(Vec::new());
    assert_eq!(entry.placements, vec![Placement::base()]);
    let moved = Placement::at(Matrix4::from_scale(2.0)).following_chair();
    assert!(moved.follows_chair);
    assert!(moved.texture.is_none());
}

#[test]
fn power_of_two_images_get_mipmaps() {
    let policy = sampler_policy(256, 256);
    assert_eq!(policy.mip_level_count, 9);
    assert_eq!(policy.address_mode, wgpu::AddressMode::Repeat);
    assert_eq!(policy.mipmap_filter, wgpu::FilterMode::Linear);

    let policy = sampler_policy(512, 128);
    assert_eq!(policy.mip_level_count, 10);

    let policy = sampler_policy(300, 256);
    assert_eq!(policy.mip_level_count, 1);
    assert_eq!(policy.address_mode, wgpu::AddressMode::ClampToEdge);
    assert_eq!(policy.min_filter, wgpu::FilterMode::Linear);

    assert!(is_power_of_two(1));
    assert!(!is_power_of_two(0));
    assert!(!is_power_of_two(600));
}

#[test]
fn mip_chain_halves_down_to_one_pixel() {
    let image = image::RgbaImage::from_pixel(8, 2, image::Rgba(PLACEHOLDER_PIXEL));
    let levels = sampler_policy(8, 2).mip_level_count;
    let chain = mip_chain(&image, levels);
    let sizes: Vec<_> = chain.iter().map(|level| level.dimensions()).collect();
    assert_eq!(sizes, [(8, 2), (4, 1), (2, 1), (1, 1)]);
    assert_eq!(chain[3].get_pixel(0, 0).0, PLACEHOLDER_PIXEL);
}

#[test]
fn light_follows_the_eye() {
    let config = LightConfig::default();
    let camera = CameraState {
        ex: 1.0,
        ey: -0.4,
        ez: 0.2,
        ..CameraState::default()
    };
    let [x, y, z] = light_position(&config, &camera);
    assert!(approx_eq(x, config.position[0] + 1.0, EPSILON));
    assert!(approx_eq(y, config.position[1] - 0.4, EPSILON));
    assert!(approx_eq(z, config.position[2] + 0.2, EPSILON));
}

#[test]
fn party_light_picks_a_party_colour() {
    let config = LightConfig::default();
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(light_colour(&config, PartyMode::Off, &mut rng), config.colour);

    let mut seen = Vec::new();
    for _ in 0..200 {
        let colour = light_colour(&config, PartyMode::On, &mut rng);
        assert!(config.party_colours.contains(&colour));
        if !seen.contains(&colour) {
            seen.push(colour);
        }
    }
    assert_eq!(seen.len(), config.party_colours.len());

    let uniform = LightUniform::for_frame(&config, &CameraState::default(), PartyMode::Off, &mut rng);
    assert_eq!(uniform.color, config.colour);
    assert_eq!(uniform.ambient, config.ambient);
}

#[test]
fn model_slots_respect_the_offset_alignment() {
    assert_eq!(model_stride(256), 256);
    assert_eq!(model_stride(64), 64);
    assert_eq!(model_stride(32), 64);
    assert_eq!(model_stride(0), 64);
}
