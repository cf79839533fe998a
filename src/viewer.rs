//! Standalone gallery window backed by winit.
//!
//! ```no_run
//! # use vitrine::Viewer;
//! Viewer::builder()
//!     .with_title("Gallery")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorIcon, Window, WindowId},
};

use crate::{
    error::VitrineError,
    gallery::{Gallery, GalleryConfig},
    gpu::render_context::RenderContext,
    input::{InputEvent, InputProcessor},
    options::Options,
    renderer::GalleryRenderer,
    util::frame_timing::FrameTiming,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    config: Option<GalleryConfig>,
    title: Option<String>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            config: None,
            title: None,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Show this gallery instead of the built-in one.
    #[must_use]
    pub fn with_config(mut self, config: GalleryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the window title (defaults to `display.title`).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let options = self.options.unwrap_or_default();
        Viewer {
            title: self.title.unwrap_or_else(|| options.display.title.clone()),
            config: self.config.unwrap_or_default(),
            options,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays a portal gallery.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    config: GalleryConfig,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::Viewer`] if the window or event loop fails,
    /// [`VitrineError::Gpu`] if no GPU context could be created, and the
    /// gallery's construction error if the configuration is invalid.
    pub fn run(self) -> Result<(), VitrineError> {
        let gallery = Gallery::with_default_loader(self.config, self.options.clone())?;

        let event_loop =
            EventLoop::new().map_err(|e| VitrineError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            context: None,
            renderer: None,
            input: InputProcessor::with_key_bindings(self.options.keybindings.clone()),
            timing: FrameTiming::new(self.options.display.target_fps),
            gallery,
            title: self.title,
            shown_title: String::new(),
            pointer: false,
            failure: None,
            frames_drawn: 0,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| VitrineError::Viewer(e.to_string()))?;
        app.failure.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    context: Option<RenderContext>,
    renderer: Option<GalleryRenderer>,
    input: InputProcessor,
    timing: FrameTiming,
    gallery: Gallery,
    title: String,
    /// Last title pushed to the window.
    shown_title: String,
    /// Whether the pointer cursor is showing.
    pointer: bool,
    /// Fatal error that ended the event loop.
    failure: Option<VitrineError>,
    frames_drawn: u64,
}

/// Frames between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 600;

fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn dispatch(&mut self, event: InputEvent) {
        let (x, y) = match event {
            InputEvent::CursorMoved { x, y } => (x, y),
            _ => self.input.mouse_pos(),
        };
        let hovered = match event {
            InputEvent::CursorLeft => None,
            _ => self.gallery.pick(x, y),
        };
        if let Some(command) = self.input.handle_event(event, hovered) {
            log::trace!("{command:?}");
            let _ = self.gallery.execute(command);
        }
    }

    fn sync_window(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let pointer = self.gallery.cursor_is_pointer();
        if pointer != self.pointer {
            self.pointer = pointer;
            window.set_cursor(if pointer {
                CursorIcon::Pointer
            } else {
                CursorIcon::Default
            });
        }

        let hint = self.gallery.router().hint();
        let title = if self.gallery.is_loading() {
            format!("{} · loading…", self.title)
        } else {
            format!("{} · {hint}", self.title)
        };
        if title != self.shown_title {
            window.set_title(&title);
            self.shown_title = title;
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.timing.should_render() {
            return;
        }
        let dt = self.timing.begin_frame();
        self.frames_drawn += 1;
        if self.frames_drawn % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps", self.timing.fps());
        }
        self.gallery.tick(dt);
        self.sync_window();

        let (Some(context), Some(renderer)) = (&mut self.context, &mut self.renderer) else {
            return;
        };
        let scene = self.gallery.describe();
        match renderer.render(context, &scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = context.size();
                context.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("render error: {e}"),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                self.failure = Some(VitrineError::Viewer(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        let (vp_w, vp_h) = viewport_size(window.inner_size());
        let context = match pollster::block_on(RenderContext::new(
            Arc::clone(&window),
            (vp_w, vp_h),
        )) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to initialize GPU: {e}");
                self.failure = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        self.renderer = Some(GalleryRenderer::new(
            &context,
            self.gallery.options().display.gamma,
        ));
        self.gallery.set_viewport(vp_w, vp_h);
        self.context = Some(context);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (vp_w, vp_h) = viewport_size(size);
                if let Some(context) = &mut self.context {
                    context.resize(vp_w, vp_h);
                }
                self.gallery.set_viewport(vp_w, vp_h);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.dispatch(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::CursorLeft { .. } => {
                self.dispatch(InputEvent::CursorLeft);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.dispatch(InputEvent::MouseButton {
                    button: button.into(),
                    pressed: state == ElementState::Pressed,
                });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    let key = format!("{code:?}");
                    if let Some(command) = self.input.handle_key_press(&key) {
                        log::debug!("key {key} -> {command:?}");
                        let _ = self.gallery.execute(command);
                    }
                }
            }
            _ => {}
        }
    }
}
