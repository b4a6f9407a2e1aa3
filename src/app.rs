//! The application event loop.
//!
//! One run hosts exactly one snapshot. The loop follows the same pattern
//! each frame:
//! 1. Request the next redraw (the loop is redraw-driven, matching the
//!    display's refresh signal)
//! 2. Acquire the surface texture
//! 3. Let the snapshot record its frame with the measured delta time
//! 4. Submit and present
//!
//! A lost or outdated surface is reconfigured and the frame retried, never
//! treated as fatal.

use std::{iter, sync::Arc};

use anyhow::Result;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{context::Context, snapshot::Snapshot, steps::Step};

struct AppState {
    ctx: Context,
    snapshot: Box<dyn Snapshot>,
    is_surface_configured: bool,
}

impl AppState {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.gpu.config.width = width;
            self.ctx.gpu.config.height = height;
            self.is_surface_configured = true;
            self.ctx
                .surface
                .configure(&self.ctx.gpu.device, &self.ctx.gpu.config);
            self.snapshot.resize(&self.ctx.gpu);
        }
    }

    fn render(&mut self, dt: instant::Duration) -> Result<(), wgpu::SurfaceError> {
        // Keep the redraw loop going.
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.ctx
                .gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });

        self.snapshot.frame(&self.ctx.gpu, &view, &mut encoder, dt);

        self.ctx.gpu.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    step: Step,
    state: Option<AppState>,
    last_time: Instant,
}

impl App {
    fn new(step: Step) -> Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            step,
            state: None,
            last_time: Instant::now(),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes().with_title(format!(
            "cube-steps {}: {}",
            self.step.number(),
            self.step.title()
        ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("Failed to create the window"),
        );

        let ctx = match self.async_runtime.block_on(Context::new(window)) {
            Ok(ctx) => ctx,
            Err(e) => panic!("App initialization failed. Cannot create the main context: {e}"),
        };
        let snapshot = match (self.step.constructor())(&ctx.gpu) {
            Ok(snapshot) => snapshot,
            Err(e) => panic!(
                "App initialization failed. Cannot construct snapshot {}: {e}",
                self.step.number()
            ),
        };

        let mut state = AppState {
            ctx,
            snapshot,
            is_surface_configured: false,
        };
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        state.ctx.window.request_redraw();
        self.state = Some(state);

        // The first measured delta starts at window creation, not at
        // process start.
        self.last_time = Instant::now();
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
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(dt) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Open a window and drive the given snapshot until the window closes.
pub fn run(step: Step) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(step)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
