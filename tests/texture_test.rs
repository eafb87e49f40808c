use living_room::{
    context::frame_formats,
    data_structures::texture::{Texture, check_dimensions},
};
use wgpu::TextureFormat;

#[test]
fn images_up_to_the_device_limit_are_accepted() {
    let webgl = wgpu::Limits::downlevel_webgl2_defaults().max_texture_dimension_2d;
    assert!(check_dimensions(webgl, webgl, webgl).is_ok());
    assert!(check_dimensions(1, webgl, webgl).is_ok());
}

#[test]
fn images_over_the_device_limit_are_rejected() {
    let webgl = wgpu::Limits::downlevel_webgl2_defaults().max_texture_dimension_2d;
    assert!(check_dimensions(webgl + 1, 4, webgl).is_err());
    assert!(check_dimensions(4, webgl + 1, webgl).is_err());

    let error = check_dimensions(16_484, 4, 16_384).unwrap_err();
    assert!(error.to_string().contains("16484x4"), "{error}");
}

#[test]
fn empty_images_are_rejected() {
    assert!(check_dimensions(0, 4, 2048).is_err());
    assert!(check_dimensions(4, 0, 2048).is_err());
}

#[test]
fn textures_are_sampled_as_stored() {
    assert!(!Texture::COLOUR_FORMAT.is_srgb());
}

#[test]
fn frames_are_drawn_without_srgb_encoding() {
    let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
    assert_eq!(
        frame_formats(&formats),
        Some((TextureFormat::Bgra8Unorm, TextureFormat::Bgra8Unorm))
    );

    // An sRGB-only surface is drawn through its plain view.
    let formats = [TextureFormat::Rgba8UnormSrgb];
    assert_eq!(
        frame_formats(&formats),
        Some((TextureFormat::Rgba8UnormSrgb, TextureFormat::Rgba8Unorm))
    );

    assert_eq!(frame_formats(&[]), None);
}
