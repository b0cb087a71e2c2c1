//! Viewer builder and runner.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::{CameraState, Projection};
use crate::control::{ControlMode, InputModeLatch};
use crate::controls::{OrbitControls, OrbitControlsConfig};
use crate::error::AppError;
use crate::field::{ReferenceField, VectorField};
use crate::gpu::GpuState;
use crate::input::{Input, KeyCode, MouseButton};
use crate::lattice::{self, IntegerInterval};
use crate::orbit::{CameraOrbitController, OrbitParams};
use crate::scene::{Color, Scene};
use crate::time::Time;
#[cfg(feature = "egui")]
use crate::ui::InstructionsPanel;

/// A slope-field viewer builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// use slopefield::prelude::*;
///
/// SlopeField::new()
///     .with_range(IntegerInterval::symmetric(10))
///     .with_orbit(OrbitParams { radius: 40.0, angular_speed: 0.05 })
///     .run()?;
/// ```
pub struct SlopeField<F: VectorField = ReferenceField> {
    field: F,
    range: IntegerInterval,
    step: i32,
    orbit: OrbitParams,
    controls: OrbitControlsConfig,
    projection: Projection,
    background: Color,
    title: String,
    window_size: (u32, u32),
}

impl SlopeField<ReferenceField> {
    /// Viewer for the reference field over `[-10, 10]` on every axis.
    pub fn new() -> Self {
        Self {
            field: ReferenceField::default(),
            range: IntegerInterval::default(),
            step: 1,
            orbit: OrbitParams::default(),
            controls: OrbitControlsConfig::default(),
            projection: Projection::default(),
            background: Color::BACKGROUND,
            title: "Slope Field".to_string(),
            window_size: (1280, 720),
        }
    }
}

impl Default for SlopeField<ReferenceField> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: VectorField> SlopeField<F> {
    /// Replace the field being visualised.
    pub fn with_field<G: VectorField>(self, field: G) -> SlopeField<G> {
        SlopeField {
            field,
            range: self.range,
            step: self.step,
            orbit: self.orbit,
            controls: self.controls,
            projection: self.projection,
            background: self.background,
            title: self.title,
            window_size: self.window_size,
        }
    }

    /// Set the sampled interval, shared by all three axes.
    pub fn with_range(mut self, range: IntegerInterval) -> Self {
        self.range = range;
        self
    }

    /// Sample every `step`-th lattice point. Values below 1 are treated as 1.
    pub fn with_step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    pub fn with_orbit(mut self, orbit: OrbitParams) -> Self {
        self.orbit = orbit;
        self
    }

    pub fn with_controls(mut self, controls: OrbitControlsConfig) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Build the scene this viewer would display.
    pub fn build_scene(&self) -> Scene {
        lattice::build(self.range, self.step, &self.field)
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), AppError> {
        let scene = self.build_scene();
        log::info!(
            "Built {} arrows over [{}, {}] with step {}",
            scene.arrows.len(),
            self.range.lo,
            self.range.hi,
            self.step.max(1)
        );

        let config = ViewerConfig {
            title: self.title,
            window_size: self.window_size,
            orbit: self.orbit,
            projection: self.projection,
            background: self.background,
            equation: self.field.description(),
        };

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(scene, config, OrbitControls::new(self.controls, self.projection.fov_y_degrees));
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct ViewerConfig {
    title: String,
    window_size: (u32, u32),
    orbit: OrbitParams,
    projection: Projection,
    background: Color,
    #[cfg_attr(not(feature = "egui"), allow(dead_code))]
    equation: String,
}

fn window_title(base: &str, mode: ControlMode) -> String {
    format!("{} ({})", base, mode.name())
}

/// Whether `Input` sees an event the UI may have consumed.
///
/// Releases and cursor motion always get through, so a drag that ends over
/// the UI does not leave a button held.
fn reaches_input(event: &WindowEvent, consumed: bool) -> bool {
    match event {
        WindowEvent::MouseInput {
            state: ElementState::Released,
            ..
        }
        | WindowEvent::CursorMoved { .. }
        | WindowEvent::CursorLeft { .. } => true,
        WindowEvent::KeyboardInput { event, .. } => !consumed || event.state == ElementState::Released,
        _ => !consumed,
    }
}

/// A press hands the camera to the user when it is the primary button and
/// the UI did not take it.
fn claims_camera(pressed: Option<MouseButton>, consumed: bool) -> bool {
    !consumed && pressed == Some(MouseButton::Left)
}

/// Feed one pointer or keyboard event to `input` and the mode latch.
fn route_input(input: &mut Input, latch: &InputModeLatch, event: &WindowEvent, consumed: bool) {
    if !reaches_input(event, consumed) {
        return;
    }
    if claims_camera(input.handle_event(event), consumed) {
        latch.on_primary_pointer_down();
    }
}

struct App {
    config: ViewerConfig,
    scene: Scene,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    latch: Arc<InputModeLatch>,
    controller: Option<CameraOrbitController<CameraState, Time>>,
    controls: OrbitControls,
    input: Input,
    last_mode: ControlMode,
    #[cfg(feature = "egui")]
    panel: InstructionsPanel,
    error: Option<AppError>,
}

impl App {
    fn new(scene: Scene, config: ViewerConfig, controls: OrbitControls) -> Self {
        Self {
            config,
            scene,
            window: None,
            gpu: None,
            latch: Arc::new(InputModeLatch::new()),
            controller: None,
            controls,
            input: Input::new(),
            last_mode: ControlMode::Auto,
            #[cfg(feature = "egui")]
            panel: InstructionsPanel::default(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        self.error = Some(err);
        event_loop.exit();
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(window_title(&self.config.title, ControlMode::Auto))
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);

        let gpu = pollster::block_on(GpuState::new(Arc::clone(&window), &self.scene, self.config.projection))?;

        // The orbit clock starts here, at mount
        let mut controller = CameraOrbitController::new(
            CameraState::default(),
            Time::new(),
            Arc::clone(&self.latch),
            self.config.orbit,
        )
        .with_background(self.config.background);
        controller.mount();
        let orbit = controller.params();
        log::info!(
            "Orbiting at radius {} and {} rad/s until the first click",
            orbit.radius,
            orbit.angular_speed
        );

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.controller = Some(controller);
        Ok(())
    }

    #[cfg(feature = "egui")]
    fn ui_consumes(&mut self, event: &WindowEvent) -> bool {
        match (&mut self.gpu, &self.window) {
            (Some(gpu), Some(window)) => gpu.egui_mut().on_window_event(window, event),
            _ => false,
        }
    }

    #[cfg(not(feature = "egui"))]
    fn ui_consumes(&mut self, _event: &WindowEvent) -> bool {
        false
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu), Some(controller)) =
            (&self.window, &mut self.gpu, &mut self.controller)
        else {
            return;
        };

        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
            return;
        }

        let clock = controller.clock_mut();
        if clock.update() {
            log::trace!("frame {}: {:.1} fps", clock.frame(), clock.fps());
        }

        let mode = controller.on_frame(gpu);

        self.controls.handle_input(&self.input);
        match controller.manual_camera() {
            Some(camera) => {
                self.controls.update(camera);
            }
            None => self.controls.discard(),
        }

        if mode != self.last_mode {
            window.set_title(&window_title(&self.config.title, mode));
            self.last_mode = mode;
        }

        #[cfg(feature = "egui")]
        {
            if self.input.key_pressed(KeyCode::H) {
                self.panel.toggle();
            }
            let egui = gpu.egui_mut();
            egui.begin_frame(window);
            let ctx = egui.ctx.clone();
            self.panel.show(&ctx, mode, &self.config.equation);
            let frame = egui.end_frame(window);
            gpu.submit_ui(frame);
        }

        match gpu.render(controller.camera()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        self.input.begin_frame();
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.mount(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = self.ui_consumes(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.input.set_window_size(physical_size.width, physical_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            other => route_input(&mut self.input, &self.latch, &other, consumed),
        }
    }
}
