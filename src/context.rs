use std::sync::Arc;

use anyhow::{Context as _, bail};
use winit::window::Window;

use crate::{
    camera::{CameraResources, Composer, Projection},
    config::Config,
    data_structures::{geometry::GeometryBuffers, texture},
    pipelines::{
        basic::{SceneLayouts, mk_basic_pipeline},
        light::{LightResources, LightUniform},
    },
    render::ModelResources,
    resources::texture::TextureStore,
    scene::Room,
};

/// Everything that lives on the GPU, plus the window it presents to.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    /// Format the frame is drawn in; never sRGB.
    pub view_format: wgpu::TextureFormat,
    pub composer: Composer,
    pub camera: CameraResources,
    pub light: LightResources,
    pub models: ModelResources,
    pub textures: TextureStore,
    pub geometry: GeometryBuffers,
    pub pipeline: wgpu::RenderPipeline,
    pub clear_colour: wgpu::Color,
}

impl Context {
    /// Creates the surface, device and every resource the room needs. Any failure here
    /// is fatal: the render loop must not start on a partial context.
    pub async fn new(window: Arc<Window>, settings: &Config, room: &Room) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("cannot create a drawing surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can draw to this surface")?;
        log::info!("adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                // Texture sizes follow the hardware, not the WebGL2 floor.
                required_limits: (if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                })
                .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await
            .context("cannot open the graphics device")?;
        log::info!("device and queue ready");

        let surface_caps = surface.get_capabilities(&adapter);
        let Some((surface_format, view_format)) = frame_formats(&surface_caps.formats) else {
            bail!("the surface supports no texture format");
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: if view_format == surface_format {
                vec![]
            } else {
                vec![view_format]
            },
            desired_maximum_frame_latency: 2,
        };
        log::info!("surface format {:?}, drawing as {view_format:?}", config.format);

        let projection = Projection::new(
            config.width,
            config.height,
            settings.fovy,
            settings.znear,
            settings.zfar,
        );
        let composer = Composer::new(projection, settings.view);

        let depth_texture =
            texture::Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        let camera = CameraResources::new(&device);
        let light = LightResources::new(
            LightUniform::new(
                settings.light.position,
                settings.light.colour,
                settings.light.ambient,
            ),
            &device,
        );
        let models = ModelResources::new(&device, room.registry.placement_count());
        let textures = TextureStore::new(&device, &queue, room.registry.assets())
            .context("cannot create placeholder textures")?;
        let geometry =
            GeometryBuffers::upload(&device, &room.geometry).context("cannot upload the geometry")?;
        log::info!("geometry uploaded: {} indices", geometry.index_count);

        let pipeline = mk_basic_pipeline(
            &device,
            view_format,
            SceneLayouts {
                texture: textures.layout(),
                camera: &camera.bind_group_layout,
                light: &light.bind_group_layout,
                model: &models.bind_group_layout,
            },
        )
        .await?;
        log::info!("pipeline ready");

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            view_format,
            composer,
            camera,
            light,
            models,
            textures,
            geometry,
            pipeline,
            clear_colour: settings.clear_colour,
        })
    }
}

/// Picks the surface format and the format frames are drawn in.
///
/// Colours are written out exactly as the shader computes them, with no sRGB encode on
/// store. A non-sRGB surface format is used directly; an sRGB-only surface is drawn
/// through its non-sRGB view.
pub fn frame_formats(available: &[wgpu::TextureFormat]) -> Option<(wgpu::TextureFormat, wgpu::TextureFormat)> {
    if let Some(format) = available.iter().copied().find(|f| !f.is_srgb()) {
        return Some((format, format));
    }
    available
        .first()
        .map(|format| (*format, format.remove_srgb_suffix()))
}
