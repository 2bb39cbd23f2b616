use std::{
    process,
    sync::{mpsc, Arc},
    time::{Duration, Instant},
};

use egui::{Context, ViewportId};
use egui_wgpu::{Renderer as EguiRenderer, ScreenDescriptor};
use egui_winit::State as EguiWinitState;
use log::{debug, error, info, warn};
use playground::{
    asset::texture::TextureAsset,
    config::AppConfig,
    error::AppError,
    gui::{gui_main, GuiAction, GuiContext, GuiState},
    input::{action_for_key, apply_movement, KeyAction, SceneController},
    perf::PerformanceTracker,
    renderer::{camera::PositionController, OngoingRenderState, Renderer, DEPTH_TEXTURE_FORMAT},
    transform::{random::RandIndexSource, TransformStore},
};
use pollster::FutureExt;
use wgpu::{
    util::{backend_bits_from_env, initialize_adapter_from_env, power_preference_from_env},
    Backends, Device, DeviceDescriptor, Instance, InstanceDescriptor, PowerPreference, PresentMode,
    Queue, RequestAdapterOptions, Surface, SurfaceConfiguration, SurfaceError, TextureFormat,
    TextureUsages, TextureViewDescriptor,
};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Fullscreen, Window, WindowAttributes, WindowId},
};

const PLACEHOLDER_COLORS: [([u8; 4], [u8; 4]); 2] = [
    ([120, 80, 40, 255], [200, 160, 100, 255]),
    ([240, 200, 0, 255], [255, 255, 255, 255]),
];

struct State<'a> {
    surface: Surface<'a>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,

    app_config: AppConfig,
    perf_tracker: PerformanceTracker,

    store: TransformStore,
    index_source: RandIndexSource,
    controller: SceneController,

    renderer: Renderer,
    position_controller: PositionController,
    last_render_time: Option<Instant>,

    egui_active: bool,
    egui_renderer: EguiRenderer,
    egui_state: EguiWinitState,
    gui_state: GuiState,
    gui_actions_tx: mpsc::Sender<GuiAction>,
    gui_actions_rx: mpsc::Receiver<GuiAction>,
}

impl<'a> State<'a> {
    async fn new(window: Arc<Window>, app_config: AppConfig) -> Result<Self, AppError> {
        let size = window.inner_size();
        let instance = Instance::new(InstanceDescriptor {
            backends: backend_bits_from_env().unwrap_or(Backends::all()),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = match initialize_adapter_from_env(&instance, Some(&surface)) {
            Some(adapter) => adapter,
            None => instance
                .request_adapter(&RequestAdapterOptions {
                    power_preference: power_preference_from_env().unwrap_or(PowerPreference::None),
                    compatible_surface: Some(&surface),
                    ..Default::default()
                })
                .await
                .ok_or(AppError::NoAdapter)?,
        };
        info!("Using adapter {:?}", adapter.get_info());
        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("Device"),
                    ..Default::default()
                },
                None,
            )
            .await?;
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .unwrap_or(TextureFormat::Bgra8UnormSrgb);
        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let mut gui_state = GuiState::default();
        let textures: Vec<TextureAsset> = app_config
            .texture_paths
            .iter()
            .zip(PLACEHOLDER_COLORS)
            .map(|(path, (dark, light))| match TextureAsset::load(path) {
                Ok(texture) => {
                    info!("Loaded texture {}", texture.id);
                    texture
                }
                Err(err) => {
                    warn!("Failed to load texture {}: {}", path.display(), err);
                    gui_state.add_error(format!(
                        "Failed to load texture \"{}\": {}",
                        path.display(),
                        err
                    ));
                    TextureAsset::placeholder(path.to_string_lossy(), dark, light)
                }
            })
            .collect();

        let store = TransformStore::default();
        let renderer = Renderer::new(&device, &queue, size, config.format, &store, &textures);
        let position_controller = PositionController::with_speed(app_config.camera_speed);

        let egui_renderer =
            EguiRenderer::new(&device, config.format, Some(DEPTH_TEXTURE_FORMAT), 1, false);
        let egui_state = EguiWinitState::new(
            Context::default(),
            ViewportId::default(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let (gui_actions_tx, gui_actions_rx) = mpsc::channel();

        Ok(Self {
            surface,
            device,
            queue,
            config,
            app_config,
            perf_tracker: PerformanceTracker::default(),
            store,
            index_source: RandIndexSource::default(),
            controller: SceneController::default(),
            renderer,
            position_controller,
            last_render_time: None,
            egui_active: false,
            egui_renderer,
            egui_state,
            gui_state,
            gui_actions_tx,
            gui_actions_rx,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.renderer.state.resize(&self.device, new_size);
    }

    fn update_rotation(&mut self, delta: (f32, f32)) {
        let sensitivity = self.app_config.mouse_sensitivity;
        self.renderer
            .state
            .update_camera(|camera| camera.view.look(delta, sensitivity));
    }

    fn handle_action(&mut self, action: KeyAction, pressed: bool) {
        match action {
            KeyAction::Move(movement) => {
                apply_movement(&mut self.position_controller, movement, pressed)
            }
            KeyAction::Store(request) if pressed => self.controller.queue(request),
            KeyAction::ApplyTexture(texture) if pressed => {
                self.controller.set_applied_texture(texture)
            }
            _ => (),
        }
    }

    fn update(&mut self, elapsed: Duration) {
        while let Ok(action) = self.gui_actions_rx.try_recv() {
            match action {
                GuiAction::Request(request) => self.controller.queue(request),
                GuiAction::ApplyTexture(texture) => self.controller.set_applied_texture(texture),
            }
        }

        if self.position_controller.is_moving() {
            self.renderer
                .state
                .update_camera(|camera| self.position_controller.update(elapsed, camera));
        }

        self.controller.apply(
            &mut self.store,
            &mut self.index_source,
            &self.app_config,
            elapsed,
        );
    }

    /// Draws one frame. Returns `false` when rendering cannot continue.
    fn render(&mut self, window: &Window) -> bool {
        let start_time = Instant::now();
        let elapsed = self
            .last_render_time
            .map(|last_render_time| start_time - last_render_time)
            .unwrap_or_default();
        self.last_render_time = Some(start_time);

        self.update(elapsed);
        self.renderer.prepare(&self.queue, &self.store);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                window.request_redraw();
                return true;
            }
            Err(SurfaceError::Timeout) => {
                warn!("Timed out acquiring a frame");
                window.request_redraw();
                return true;
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("Out of memory when allocating a frame");
                return false;
            }
        };
        let texture_view = output
            .texture
            .create_view(&TextureViewDescriptor::default());
        let mut ongoing_state =
            OngoingRenderState::new(&self.device, &texture_view, &self.renderer.state);

        self.renderer
            .render(&mut ongoing_state, self.controller.applied_texture());

        if self.egui_active {
            let size = window.inner_size();
            let pixels_per_point =
                self.egui_state.egui_ctx().zoom_factor() * window.scale_factor() as f32;
            let screen_descriptor = ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point,
            };
            let input = self.egui_state.take_egui_input(window);
            let full_output = self.egui_state.egui_ctx().run(input, |ctx| {
                gui_main(
                    ctx,
                    GuiContext {
                        store: &self.store,
                        perf_tracker: &self.perf_tracker,
                        applied_texture: self.controller.applied_texture(),
                        texture_count: self.renderer.texture_count(),
                    },
                    &mut self.gui_state,
                    &mut self.gui_actions_tx,
                );
            });
            self.egui_state
                .handle_platform_output(window, full_output.platform_output);
            let paint_jobs = self
                .egui_state
                .egui_ctx()
                .tessellate(full_output.shapes, full_output.pixels_per_point);
            for (id, image_delta) in &full_output.textures_delta.set {
                self.egui_renderer
                    .update_texture(&self.device, &self.queue, *id, image_delta);
            }
            self.egui_renderer.update_buffers(
                &self.device,
                &self.queue,
                &mut ongoing_state.encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            self.egui_renderer.render(
                &mut ongoing_state.render_pass,
                &paint_jobs,
                &screen_descriptor,
            );
            ongoing_state.finish(&self.queue);
            for id in &full_output.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        } else {
            ongoing_state.finish(&self.queue);
        }

        window.pre_present_notify();
        output.present();
        window.request_redraw();

        let end_time = Instant::now();
        let frame_time = end_time - start_time;
        self.perf_tracker.add_sample(frame_time, end_time);
        true
    }

    fn egui_active(&self) -> bool {
        self.egui_active
    }

    fn set_egui_active(&mut self, active: bool) {
        self.egui_active = active;
        if active {
            // Key releases go to the overlay from now on.
            self.position_controller.stop();
        }
    }
}

struct App {
    config: AppConfig,
    state: Option<State<'static>>,
    window: Option<Arc<Window>>,
    error: Option<AppError>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            window: None,
            error: None,
        }
    }

    fn update_cursor_grab(window: &Window, grab: bool) {
        window.set_cursor_visible(!grab);
        if grab {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
                .unwrap_or_else(|err| {
                    info!("Failed to grab mouse: {:?}", err);
                });
        } else if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
            info!("Failed to cancel grab mouse: {:?}", err);
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        self.error = Some(err);
        event_loop.exit();
    }

    fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = match &self.window {
            Some(window) => window.clone(),
            None => {
                let (width, height) = self.config.window_size;
                let attributes = WindowAttributes::default()
                    .with_title(self.config.title.clone())
                    .with_inner_size(LogicalSize::new(width, height));
                match event_loop.create_window(attributes) {
                    Ok(window) => self.window.insert(Arc::new(window)).clone(),
                    Err(err) => return self.fail(event_loop, err.into()),
                }
            }
        };
        Self::update_cursor_grab(&window, true);
        if self.state.is_none() {
            match State::new(window.clone(), self.config.clone()).block_on() {
                Ok(state) => self.state = Some(state),
                Err(err) => return self.fail(event_loop, err),
            }
        }
        window.request_redraw();
    }

    fn suspended(&mut self, _: &ActiveEventLoop) {
        self.state = None;
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if state.egui_active() {
            return;
        }

        if let DeviceEvent::MouseMotion { delta } = event {
            let (delta_x, delta_y) = delta;
            state.update_rotation((delta_x as f32, delta_y as f32));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (window, state) = match self.window.as_ref().zip(self.state.as_mut()) {
            Some((window, state)) => (window, state),
            None => return,
        };

        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::RedrawRequested => {
                if !state.render(window) {
                    event_loop.exit();
                }
                return;
            }
            WindowEvent::Focused(focused) => {
                let should_grab = *focused && !state.egui_active();
                Self::update_cursor_grab(window, should_grab);
                return;
            }
            WindowEvent::Resized(physical_size) => state.resize(*physical_size),
            WindowEvent::KeyboardInput { event, .. } => {
                let action = match event.physical_key {
                    PhysicalKey::Code(code) => action_for_key(code),
                    PhysicalKey::Unidentified(_) => None,
                };
                let pressed = event.state == ElementState::Pressed;
                match action {
                    Some(KeyAction::Close) => {
                        event_loop.exit();
                        return;
                    }
                    Some(KeyAction::ToggleFullscreen) => {
                        if !event.repeat && !pressed {
                            if window.fullscreen().is_some() {
                                window.set_fullscreen(None)
                            } else {
                                window.set_fullscreen(Some(Fullscreen::Borderless(None)))
                            }
                        }
                    }
                    Some(KeyAction::ToggleOverlay) => {
                        if !event.repeat && !pressed {
                            let active = !state.egui_active();
                            state.set_egui_active(active);

                            let should_grab = window.has_focus() && !state.egui_active();
                            Self::update_cursor_grab(window, should_grab);
                        }
                        return;
                    }
                    Some(action) if !state.egui_active() => {
                        if action.is_held() || !event.repeat {
                            state.handle_action(action, pressed);
                        }
                        return;
                    }
                    _ => (),
                }
            }
            _ => (),
        }

        if state.egui_active() {
            // Since we always redraw, we can ignore the result
            let _ = state.egui_state.on_window_event(window, &event);
        }
    }
}

fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env();
    info!("Starting with {:?}", config);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        error!("{}", err);
        println!("{}", err);
        process::exit(-1);
    }
}
