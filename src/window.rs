//! Windowed viewer: a particle field in a winit window, rendered with wgpu.
//!
//! [`Viewer`] is the batteries-included host. It owns the event loop, the
//! GPU surface, and a [`ParticleField`] it ticks once per redraw. Pointer
//! motion feeds the field, resizes rescale the band, and the `D` key flips
//! between dark and light mode.
//!
//! Hosts with their own render stack can skip this module entirely and
//! drive [`ParticleField`] themselves.
//!
//! # Usage
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! Viewer::new()
//!     .with_display_mode(DisplayMode::Dark)
//!     .with_size(1600, 900)
//!     .run()?;
//! ```

use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::error::ViewerError;
use crate::field::{FieldConfig, ParticleField};
use crate::gpu::GpuState;
use crate::time::Time;
use crate::visuals::DisplayMode;

/// Builder for the windowed viewer.
pub struct Viewer {
    config: FieldConfig,
    mode: DisplayMode,
    title: String,
    size: (u32, u32),
}

impl Viewer {
    /// Viewer with the default field config, dark mode, 1280x720.
    pub fn new() -> Self {
        Self {
            config: FieldConfig::default(),
            mode: DisplayMode::default(),
            title: "driftfield".to_string(),
            size: (1280, 720),
        }
    }

    /// Use a custom field configuration.
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Start in the given display mode.
    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Pin the spawn seed. Shorthand for setting it on the config.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Open the window and run. This blocks until the window is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    title: String,
    size: (u32, u32),
    start_mode: DisplayMode,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    field: ParticleField,
    time: Time,
    /// First fatal error; `Viewer::run` returns it after the loop exits.
    error: Option<ViewerError>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        Self {
            field: ParticleField::new(viewer.config),
            title: viewer.title,
            size: viewer.size,
            start_mode: viewer.mode,
            window: None,
            gpu_state: None,
            time: Time::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.size.0, self.size.1));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        let size = window.inner_size();
        match pollster::block_on(GpuState::new(window.clone())) {
            Ok(gpu_state) => self.gpu_state = Some(gpu_state),
            Err(e) => return self.fail(event_loop, e.into()),
        }

        self.field.activate(
            self.start_mode,
            Vec2::new(size.width as f32, size.height as f32),
        );
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.field.deactivate();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                self.field.resize(Vec2::new(
                    physical_size.width as f32,
                    physical_size.height as f32,
                ));
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.field
                    .pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::KeyD),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.field
                    .set_display_mode(self.field.display_mode().toggled());
            }
            WindowEvent::RedrawRequested => {
                if let Some(fps) = self.time.update() {
                    log::debug!(
                        "{:.0} fps, {} particles, frame {}",
                        fps,
                        self.field.particles().len(),
                        self.time.frame(),
                    );
                }

                let scene = self.field.tick();
                let background = self.field.display_mode().background();

                if let Some(gpu_state) = &mut self.gpu_state {
                    match gpu_state.render(&scene, background) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            let size = winit::dpi::PhysicalSize {
                                width: gpu_state.config.width,
                                height: gpu_state.config.height,
                            };
                            gpu_state.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => log::error!("render error, skipping frame: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
