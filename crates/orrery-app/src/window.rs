//! Window creation and the winit event handler.
//!
//! [`AppState`] owns the window, the GPU objects and the [`Simulation`].
//! Each `RedrawRequested` advances the simulation, lets the
//! [`RenderSequencer`] record the frame into the [`WgpuBackend`], then
//! replays the recorded draws into the acquired surface texture.

use std::sync::Arc;
use std::time::Instant;

use orrery_assets::load_scene_images;
use orrery_config::Config;
use orrery_input::{KeyboardState, MouseState};
use orrery_mesh::generate_sphere;
use orrery_render::{
    FrameEncoder, Projection, RenderContext, RenderSequencer, SurfaceError, SurfaceWrapper,
    WgpuBackend, init_render_context_blocking,
};
use orrery_space::{BodyDef, SurfaceTextures, TextureHandle};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::error::StartupError;
use crate::simulation::Simulation;

/// Window attributes from the `window` config section.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Pointer capture change asked for by this frame's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureRequest {
    Capture,
    Release,
}

/// Left click captures a released pointer; Escape releases a captured one.
fn capture_request(keyboard: &KeyboardState, mouse: &MouseState) -> Option<CaptureRequest> {
    if mouse.is_captured() {
        keyboard
            .was_pressed(KeyCode::Escape)
            .then_some(CaptureRequest::Release)
    } else {
        mouse.left_clicked().then_some(CaptureRequest::Capture)
    }
}

/// GPU objects created once the window exists.
struct Renderer {
    ctx: RenderContext,
    backend: WgpuBackend,
    sequencer: RenderSequencer,
    skybox: TextureHandle,
}

impl Renderer {
    /// Create the GPU context, upload the sphere and every texture, and
    /// attach each body's textures. Any failure aborts startup.
    fn new(
        window: Arc<Window>,
        config: &Config,
        simulation: &mut Simulation,
    ) -> Result<Self, StartupError> {
        let ctx = init_render_context_blocking(window, config.window.vsync)?;

        let render = &config.render;
        let mesh = generate_sphere(1.0, render.sphere_bands)?;
        let mut backend = WgpuBackend::new(
            &ctx.device,
            ctx.surface_format,
            ctx.size(),
            &mesh,
            render.clear_color,
        );

        let defs: Vec<BodyDef> = simulation
            .registry()
            .iter()
            .map(|body| body.def().clone())
            .collect();
        let images = load_scene_images(
            &config.assets.texture_dir,
            &config.assets.skybox_texture,
            &defs,
        )?;

        let skybox = backend.upload_texture(&ctx.device, &ctx.queue, "skybox", &images.skybox)?;
        for (body, body_images) in simulation.registry_mut().iter_mut().zip(&images.bodies) {
            let primary =
                backend.upload_texture(&ctx.device, &ctx.queue, &body_images.name, &body_images.primary)?;
            let night = body_images
                .night
                .as_ref()
                .map(|image| {
                    let label = format!("{}-night", body_images.name);
                    backend.upload_texture(&ctx.device, &ctx.queue, &label, image)
                })
                .transpose()?;
            body.attach_surface(SurfaceTextures { primary, night });
        }

        let projection = Projection::from_degrees(render.fov_degrees, render.near, render.far);
        let sequencer = RenderSequencer::new(projection, backend.index_count(), render.skybox_radius);

        info!(
            bodies = images.bodies.len(),
            indices = backend.index_count(),
            "Renderer ready"
        );
        Ok(Self {
            ctx,
            backend,
            sequencer,
            skybox,
        })
    }
}

/// Application state driven by the winit event loop.
pub struct AppState {
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    simulation: Simulation,
    surface: SurfaceWrapper,
    keyboard: KeyboardState,
    mouse: MouseState,
    /// Wall-clock time of the first drawn frame.
    start: Option<Instant>,
    startup_error: Option<StartupError>,
}

impl AppState {
    pub fn new(config: Config, simulation: Simulation) -> Self {
        let surface = SurfaceWrapper::new(config.window.width, config.window.height, 1.0);
        Self {
            config,
            window: None,
            renderer: None,
            simulation,
            surface,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            start: None,
            startup_error: None,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Abort startup: record the error and leave the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: StartupError) {
        error!("Startup failed: {err}");
        self.startup_error = Some(err);
        event_loop.exit();
    }

    fn capture_pointer(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        if self.mouse.capture(window) {
            self.simulation.controller_mut().request_capture();
        }
    }

    fn release_pointer(&mut self) {
        if let Some(window) = &self.window {
            self.mouse.release(window);
        } else {
            self.mouse.mark_released();
        }
        self.simulation.controller_mut().on_capture_lost();
    }

    /// Seconds since the first drawn frame. Startup time (GPU setup,
    /// texture decode) is not counted, so simulated time starts at zero.
    fn frame_seconds(&mut self, now: Instant) -> f64 {
        let start = *self.start.get_or_insert(now);
        now.saturating_duration_since(start).as_secs_f64()
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        match capture_request(&self.keyboard, &self.mouse) {
            Some(CaptureRequest::Capture) => self.capture_pointer(),
            Some(CaptureRequest::Release) => self.release_pointer(),
            None => {}
        }

        if self.renderer.is_some() && self.surface.is_configured() {
            let elapsed = self.frame_seconds(Instant::now());
            self.simulation.step(elapsed, &self.keyboard, &self.mouse);
            self.draw(event_loop);
        }
        self.keyboard.clear_transients();
        self.mouse.clear_transients();
    }

    fn draw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        renderer.backend.begin_frame();
        let input = self.simulation.frame_input(self.surface.size(), renderer.skybox);
        renderer.sequencer.render_frame(&mut renderer.backend, &input);

        let ctx = &mut renderer.ctx;
        match ctx.get_current_texture() {
            Ok(surface_texture) => {
                let mut frame = FrameEncoder::new(&ctx.device, surface_texture);
                renderer.backend.flush(&ctx.device, &ctx.queue, &mut frame);
                frame.submit(&ctx.queue);
            }
            Err(SurfaceError::Timeout) => debug!("Surface timeout, skipping frame"),
            Err(SurfaceError::Lost) => {
                warn!("Surface lost, reconfiguring");
                let (width, height) = self.surface.size();
                ctx.resize(width, height);
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("Surface out of memory, shutting down");
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let inner = window.inner_size();
        self.surface = SurfaceWrapper::new(inner.width, inner.height, window.scale_factor());
        info!(
            "Window created: {}x{} (scale: {:.2})",
            inner.width,
            inner.height,
            window.scale_factor()
        );

        match Renderer::new(window.clone(), &self.config, &mut self.simulation) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => return self.fail(event_loop, e),
        }
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = self.surface.handle_resize(new_size.width, new_size.height) {
                    if let Some(renderer) = &mut self.renderer {
                        renderer.ctx.resize(resize.width, resize.height);
                    }
                    debug!(
                        "Window resized to {}x{} (scale: {:.2})",
                        resize.width, resize.height, resize.scale_factor
                    );
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.surface.handle_scale_factor_changed(scale_factor);
            }
            WindowEvent::Focused(false) => {
                self.keyboard.release_all();
                self.release_pointer();
            }
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.process_event(&event),
            WindowEvent::MouseInput { state, button, .. } => self.mouse.on_button(button, state),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.on_raw_motion(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Build the simulation, open the window and run until it closes.
///
/// # Errors
///
/// Returns the [`StartupError`] that prevented the render loop from
/// starting. Errors after the first frame are logged and end the loop.
#[instrument(skip_all)]
pub fn run_with_config(config: Config) -> Result<(), StartupError> {
    let simulation = Simulation::from_config(&config)?;
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, simulation);
    event_loop.run_app(&mut app)?;
    match app.startup_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
