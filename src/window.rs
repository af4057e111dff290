//! Windowed viewer: winit event handling around a [`RenderLoop`].
//!
//! The mouse wheel and the page keys move a virtual scroll position, which a
//! [`ScrollProgress`] turns into morph progress. Space pauses the clock.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::config::ViewerConfig;
use crate::error::RunError;
use crate::field::ParticleField;
use crate::gpu::GpuSurface;
use crate::progress::{ProgressSource, ScrollProgress};
use crate::render_loop::RenderLoop;
use crate::sprite::SpriteTexture;
use crate::visuals::VisualConfig;

const TITLE: &str = "particle-morph";
const TITLE_REFRESH_FRAMES: u64 = 30;
const ARROW_KEY_LINES: f32 = 3.0;

/// Open a window and run the viewer until it is closed.
pub fn run(config: ViewerConfig) -> Result<(), RunError> {
    config.validate()?;

    let sprite = match &config.sprite_path {
        Some(path) => {
            info!(path = %path.display(), "loading sprite");
            SpriteTexture::from_file(path)?
        }
        None => SpriteTexture::default(),
    };

    let field = ParticleField::new(config.field.clone())?;
    let source = ScrollProgress::new(&config.scroll);
    let render_loop = RenderLoop::new(field, source);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config.visuals, sprite, render_loop);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    visuals: VisualConfig,
    sprite: SpriteTexture,
    render_loop: RenderLoop<ScrollProgress>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuSurface>,
    redraws: u64,
    error: Option<RunError>,
}

impl App {
    fn new(
        visuals: VisualConfig,
        sprite: SpriteTexture,
        render_loop: RenderLoop<ScrollProgress>,
    ) -> Self {
        Self {
            visuals,
            sprite,
            render_loop,
            window: None,
            gpu: None,
            redraws: 0,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = self.surface_size(&window, window.inner_size());
        self.track_viewport(&window, window.inner_size());

        let gpu = pollster::block_on(GpuSurface::new(
            window.clone(),
            size,
            &self.visuals,
            &self.sprite,
            self.render_loop.field().len(),
        ))?;

        info!(
            width = size.width,
            height = size.height,
            particles = self.render_loop.field().len(),
            "viewer ready"
        );

        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    /// Backbuffer size for a window of `inner` physical pixels, with the
    /// pixel ratio capped by the visual config.
    fn surface_size(&self, window: &Window, inner: PhysicalSize<u32>) -> PhysicalSize<u32> {
        let scale = window.scale_factor();
        let logical: LogicalSize<f64> = inner.to_logical(scale);
        logical.to_physical(self.visuals.pixel_ratio(scale))
    }

    fn track_viewport(&mut self, window: &Window, inner: PhysicalSize<u32>) {
        let logical: LogicalSize<f32> = inner.to_logical(window.scale_factor());
        self.render_loop
            .source_mut()
            .set_viewport_height(logical.height);
    }

    fn on_key(&mut self, event: KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }

        let scroll = self.render_loop.source_mut();
        match event.logical_key {
            Key::Named(NamedKey::PageDown) => scroll.scroll_pages(1.0),
            Key::Named(NamedKey::PageUp) => scroll.scroll_pages(-1.0),
            Key::Named(NamedKey::ArrowDown) => scroll.scroll_lines(ARROW_KEY_LINES),
            Key::Named(NamedKey::ArrowUp) => scroll.scroll_lines(-ARROW_KEY_LINES),
            Key::Named(NamedKey::Home) => scroll.set_scroll(0.0),
            Key::Named(NamedKey::End) => scroll.set_scroll(f32::MAX),
            Key::Named(NamedKey::Space) if !event.repeat => {
                let time = self.render_loop.time_mut();
                time.toggle_pause();
                debug!(paused = time.is_paused(), "toggled pause");
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        match self.render_loop.tick(gpu) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => warn!("render error: {:?}", e),
        }

        self.redraws += 1;
        if let Some(window) = &self.window {
            if self.redraws % TITLE_REFRESH_FRAMES == 0 {
                window.set_title(&format!(
                    "{} - {:.0} fps - {:.0}%",
                    TITLE,
                    self.render_loop.time().fps(),
                    self.render_loop.source().progress() * 100.0
                ));
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                error!("failed to start viewer: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(window) = self.window.clone() {
                    let size = self.surface_size(&window, physical_size);
                    self.track_viewport(&window, physical_size);
                    if let Some(gpu) = &mut self.gpu {
                        gpu.resize(size);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = self.render_loop.source_mut();
                // Wheel up reports positive deltas; scrolling down the page is positive offset.
                match delta {
                    MouseScrollDelta::LineDelta(_, y) => scroll.scroll_lines(-y),
                    MouseScrollDelta::PixelDelta(pos) => scroll.scroll_by(-pos.y as f32),
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
