//! Application event loop.
//!
//! The winit [`ApplicationHandler`] owns the [`SceneState`] and hands it to the two
//! callbacks that touch it: the keyboard handler mutates it through the
//! [`Controller`], the redraw handler reads it to compose and draw one frame. Both run
//! to completion on the event-loop thread, so a key press is always fully applied
//! before the next frame.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and the GPU [`Context`]; failure is fatal
//! 2. every registered texture starts loading in the background
//! 3. `TextureLoaded` events swap placeholders for decoded images as they arrive
//! 4. `RedrawRequested` composes the frame transforms and replays the draw sequence

use std::{iter, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::Window,
};

use crate::{
    audio::PartyTrack,
    config::{Config, LightConfig},
    context::Context,
    data_structures::{registry::TextureId, texture::Texture},
    input::Controller,
    pipelines::light::LightUniform,
    readout::{self, WindowReadout},
    render::DrawList,
    resources::{self, TextureLoad},
    scene::Room,
    sequencer,
    state::SceneState,
};

/// Application state bundle: GPU context, the room and the scene parameters.
pub struct AppState {
    pub(crate) ctx: Context,
    room: Room,
    scene: SceneState,
    controller: Controller,
    track: Box<dyn PartyTrack>,
    rng: StdRng,
    light: LightConfig,
    readout_id: String,
    is_surface_configured: bool,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("scene", &self.scene)
            .field("is_surface_configured", &self.is_surface_configured)
            .finish()
    }
}

impl AppState {
    async fn new(window: Arc<Window>, config: &Config) -> anyhow::Result<Self> {
        let room = Room::living_room()?;
        let ctx = Context::new(window, config, &room).await?;
        Ok(Self {
            ctx,
            room,
            scene: SceneState::new(),
            controller: Controller::from_config(config),
            track: party_track(config),
            rng: StdRng::from_entropy(),
            light: config.light.clone(),
            readout_id: config.readout_id.clone(),
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.composer.projection.resize(width, height);
            self.ctx.surface.configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let mut readout = WindowReadout::new(&self.ctx.window, &self.readout_id);
        match event.physical_key {
            PhysicalKey::Code(code) => {
                self.controller
                    .key_pressed(&mut self.scene, code, self.track.as_mut(), &mut readout);
            }
            PhysicalKey::Unidentified(_) => readout::refresh(&mut readout, &self.scene.camera),
        }
    }

    fn texture_loaded(&mut self, load: TextureLoad) {
        let TextureLoad { id, asset, result } = load;
        let uploaded = result.and_then(|image| {
            let texture = Texture::from_image(&self.ctx.device, &self.ctx.queue, &image, &asset)?;
            self.ctx
                .textures
                .replace(&self.ctx.device, id, texture, &asset)
        });
        match uploaded {
            Ok(()) => log::debug!("texture {asset} loaded into slot {}", id.0),
            Err(e) => log::warn!("keeping placeholder for {asset}: {e:#}"),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let ctx = &mut self.ctx;
        ctx.composer
            .projection
            .resize(ctx.config.width, ctx.config.height);
        let transforms = ctx.composer.compose(&self.scene.camera);
        ctx.camera.write(&ctx.queue, &transforms);
        let light = LightUniform::for_frame(
            &self.light,
            &self.scene.camera,
            self.scene.party,
            &mut self.rng,
        );
        ctx.light.write(&ctx.queue, light);

        let mut draws = DrawList::new();
        if let Err(e) = sequencer::sequence(
            &self.room.registry,
            &transforms,
            &self.scene,
            &mut draws,
            self.room.geometry.runs(),
        ) {
            log::error!("skipping frame: {e:#}");
            return Ok(());
        }
        ctx.models.write(&ctx.device, &ctx.queue, &draws);

        let output = ctx.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(ctx.view_format),
            ..Default::default()
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&ctx.pipeline);
            render_pass.set_vertex_buffer(0, ctx.geometry.positions.slice(..));
            render_pass.set_vertex_buffer(1, ctx.geometry.normals.slice(..));
            render_pass.set_vertex_buffer(2, ctx.geometry.tex_coords.slice(..));
            render_pass.set_index_buffer(ctx.geometry.indices.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.set_bind_group(1, &ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(2, &ctx.light.bind_group, &[]);
            draws.replay(
                &mut render_pass,
                &ctx.textures,
                &ctx.models.bind_group,
                ctx.models.stride,
            );
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn party_track(config: &Config) -> Box<dyn PartyTrack> {
    Box::new(crate::audio::SilentTrack::new(&config.party_track))
}

#[cfg(target_arch = "wasm32")]
fn party_track(config: &Config) -> Box<dyn PartyTrack> {
    let track = resources::asset_url(&config.asset_root, &config.party_track)
        .and_then(|url| crate::audio::HtmlTrack::new(url.as_str()));
    match track {
        Ok(track) => Box::new(track),
        Err(e) => {
            log::warn!("party mode will be silent: {e:#}");
            Box::new(crate::audio::SilentTrack::new(&config.party_track))
        }
    }
}

/// Logs a fatal initialisation error and, in the browser, shows it in a blocking alert.
fn report_fatal(error: &anyhow::Error) {
    log::error!("cannot start the living room: {error:#}");
    #[cfg(target_arch = "wasm32")]
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&format!(
            "Unable to initialize the living room. Your browser or machine may not support it.\n\n{error:#}"
        ));
    }
}

pub(crate) enum FlowEvent {
    /// The wasm build initialises on a local task and hands the state back here.
    #[cfg(target_arch = "wasm32")]
    Initialized(Box<AppState>),
    TextureLoaded(TextureLoad),
    #[allow(dead_code)]
    Exit,
}

impl std::fmt::Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(target_arch = "wasm32")]
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::TextureLoaded(load) => f
                .debug_tuple("TextureLoaded")
                .field(&load.asset)
                .finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent>,
    config: Config,
    state: Option<AppState>,
    started: bool,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: Config) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            config,
            state: None,
            started: false,
            failure: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        report_fatal(&error);
        self.failure = Some(error);
        event_loop.exit();
    }

    /// Starts one background load per registered texture.
    fn spawn_texture_loads(&self, assets: &[String]) {
        for (index, asset) in assets.iter().enumerate() {
            let proxy = self.proxy.clone();
            let load = resources::load_texture(
                self.config.asset_root.clone(),
                TextureId(index),
                asset.clone(),
            );
            let send = async move {
                let load = load.await;
                if proxy.send_event(FlowEvent::TextureLoaded(load)).is_err() {
                    log::debug!("event loop closed before a texture finished loading");
                }
            };
            #[cfg(not(target_arch = "wasm32"))]
            self.async_runtime.spawn(send);
            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(send);
        }
    }

    fn install(&mut self, mut state: AppState) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        readout::refresh(
            &mut WindowReadout::new(&state.ctx.window, &state.readout_id),
            &state.scene.camera,
        );
        self.spawn_texture_loads(state.room.registry.assets());
        state.ctx.window.request_redraw();
        self.state = Some(state);
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Living Room");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(&self.config.canvas_id));
            match canvas {
                Some(canvas) => {
                    window_attributes = window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => {
                    let error = anyhow::anyhow!("no <canvas id=\"{}\"> on the page", self.config.canvas_id);
                    self.fail(event_loop, error);
                    return;
                }
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("cannot create a window"));
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let state = self
                .async_runtime
                .block_on(AppState::new(window, &self.config));
            match state {
                Ok(state) => self.install(state),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match AppState::new(window, &config).await {
                    Ok(state) => FlowEvent::Initialized(Box::new(state)),
                    Err(e) => {
                        report_fatal(&e);
                        FlowEvent::Exit
                    }
                };
                if proxy.send_event(event).is_err() {
                    log::error!("event loop closed during initialisation");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            #[cfg(target_arch = "wasm32")]
            FlowEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                self.install(*state);
            }
            FlowEvent::TextureLoaded(load) => {
                if let Some(state) = &mut self.state {
                    state.texture_loaded(load);
                }
            }
            FlowEvent::Exit => event_loop.exit(),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => state.handle_key(&event),
            WindowEvent::RedrawRequested => match state.render() {
                Ok(()) => {}
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                }
                Err(e) => {
                    log::error!("Unable to render {}", e);
                }
            },
            _ => {}
        }
    }
}

/// Opens the window and runs the living room until it is closed.
pub fn run(config: Config) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        // Fails only if a logger is already installed.
        let _ = console_log::init_with_level(log::Level::Info);
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
