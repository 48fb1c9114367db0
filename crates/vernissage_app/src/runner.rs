use std::sync::Arc;

use anyhow::Context as _;
use vernissage_core::{Camera, InputState, KeyCode, Time, TimeClock};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::config::AppConfig;
use crate::context::{aspect_ratio, AppContext};
use crate::graphics::GraphicsState;
use crate::traits::VernissageApp;

struct Runner<A: VernissageApp> {
    app: A,
    config: AppConfig,
    window: Option<Arc<Window>>,
    graphics: Option<GraphicsState>,
    input: InputState,
    camera: Camera,
    window_size: (u32, u32),
    clock: TimeClock,
    /// first fatal error; stops the loop and is returned by `run_internal`
    error: Option<anyhow::Error>,
}

impl<A: VernissageApp> Runner<A> {
    fn new(app: A, config: AppConfig) -> Self {
        let window_size = (config.window.width, config.window.height);
        let mut camera = Camera::default();
        camera.set_aspect(aspect_ratio(window_size));
        Self {
            app,
            config,
            window: None,
            graphics: None,
            input: InputState::new(),
            camera,
            window_size,
            clock: TimeClock::new(),
            error: None,
        }
    }

    fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.config.window.clear_color;
        wgpu::Color { r, g, b, a: 1.0 }
    }

    /// Runs `f` with a fresh context.  Returns `None` before the window and
    /// device exist, otherwise the callback result and whether it asked to
    /// exit.
    fn dispatch<R>(
        &mut self,
        time: Time,
        f: impl FnOnce(&mut A, &mut AppContext) -> R,
    ) -> Option<(R, bool)> {
        let window = self.window.as_ref()?;
        let graphics = self.graphics.as_mut()?;
        let mut ctx = AppContext {
            input: &self.input,
            time,
            window_size: self.window_size,
            window,
            device: &mut graphics.device,
            camera: &mut self.camera,
            exit_requested: false,
        };
        let out = f(&mut self.app, &mut ctx);
        Some((out, ctx.exit_requested))
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(&window_config.title)
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("creating the window")?,
        );
        let size = window.inner_size();
        self.window_size = (size.width, size.height);
        self.camera.set_aspect(aspect_ratio(self.window_size));

        let graphics = pollster::block_on(GraphicsState::new(
            Arc::clone(&window),
            window_config.vsync,
        ))
        .context("initialising graphics")?;

        self.window = Some(window);
        self.graphics = Some(graphics);

        let time = self.clock.peek();
        if let Some((result, exit)) = self.dispatch(time, |app, ctx| app.setup(ctx)) {
            result.context("scene setup")?;
            if exit {
                event_loop.exit();
            }
        }
        log::info!(
            "window `{}` ready at {}x{}",
            self.config.window.title,
            self.window_size.0,
            self.window_size.1
        );
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        if width == 0 || height == 0 {
            return;
        }
        if let Some(graphics) = self.graphics.as_mut() {
            graphics.resize(width, height);
        }
        self.camera.set_aspect(aspect_ratio(self.window_size));
        let time = self.clock.peek();
        self.dispatch(time, |app, ctx| app.on_resize((width, height), ctx));
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let time = self.clock.tick();
        self.camera.update(&mut self.input, time.delta);

        if let Some(((), true)) = self.dispatch(time, |app, ctx| app.update(ctx)) {
            event_loop.exit();
            return Ok(());
        }
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Ok(());
        }

        let clear = self.clear_color();
        let Some(graphics) = self.graphics.as_mut() else {
            return Ok(());
        };
        let Some(frame) = graphics.acquire()? else {
            return Ok(());
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        graphics.device.begin_frame(&view, &graphics.depth, clear);

        let drawn = self.dispatch(time, |app, ctx| app.draw(ctx));

        if let Some(graphics) = self.graphics.as_mut() {
            graphics.device.end_frame();
        }
        frame.present();

        if let Some((result, exit)) = drawn {
            result.context("drawing the scene")?;
            if exit {
                event_loop.exit();
            }
        }
        Ok(())
    }
}

impl<A: VernissageApp> ApplicationHandler for Runner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if code == KeyCode::Escape && pressed {
                    event_loop.exit();
                }
                self.input.update_key(code, pressed);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input
                    .update_mouse_button(button, state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.set_mouse_position(position.x, position.y);
            }
            WindowEvent::Focused(false) => self.input.clear(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_none() || self.error.is_some() {
            return;
        }
        if let Err(e) = self.frame(event_loop) {
            self.fail(event_loop, e);
        }
    }
}

pub(crate) fn run_internal<A: VernissageApp>(app: A, config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("creating the event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = Runner::new(app, config);
    event_loop
        .run_app(&mut runner)
        .context("running the event loop")?;

    match runner.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
