#![forbid(unsafe_code)]

//! Native windows for the host: winit event handling and softbuffer
//! presentation.
//!
//! Each window owns one host surface. The host's redraw scheduler is
//! mapped onto `request_redraw`: after every frame the pending surfaces are
//! drained and their windows asked to redraw, which keeps the loop running
//! as fast as the compositor allows.

use std::num::NonZeroU32;
use std::sync::Arc;

use softbuffer::{Context, Surface};
use tracing::{debug, error, info, info_span};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, OwnedDisplayHandle};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use simhost::{
    Canvas, Chrome, Clock, Engine, Flow, Host, HostConfig, MenuCommand, PointerButton,
    PointerInput, ProcessExit, RawInput, SurfaceFrame, SurfaceId, SurfaceSize,
};

use crate::cli::Opts;
use crate::error::DesktopError;
use crate::keymap::{self, Accelerator};
use crate::signals::SignalGuard;

/// Events posted to the loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    Quit,
}

/// One window and the surface it hosts.
///
/// Field order matters: the softbuffer surface drops before its window.
struct SurfaceWindow {
    surface: Surface<OwnedDisplayHandle, Arc<Window>>,
    window: Arc<Window>,
    id: SurfaceId,
    title: String,
    /// Last cursor position, origin bottom left.
    cursor: (f64, f64),
    held: Option<PointerButton>,
}

/// Application state handed to the winit event loop.
///
/// Windows are declared before the context so every surface is dropped
/// while its context is still alive.
pub struct App<E: Engine> {
    host: Host<E>,
    opts: Opts,
    windows: Vec<SurfaceWindow>,
    context: Option<Context<OwnedDisplayHandle>>,
    modifiers: ModifiersState,
    menus: bool,
    started: bool,
    error: Option<DesktopError>,
}

impl<E: Engine> App<E> {
    pub fn new(engine: E, opts: Opts) -> Self {
        let mut config = HostConfig::new().with_chrome(Chrome::new(opts.chrome_inset));
        if let Some(seed) = opts.seed {
            config = config.with_seed(seed);
        }
        Self {
            host: Host::new(engine, config),
            opts,
            windows: Vec::new(),
            context: None,
            modifiers: ModifiersState::empty(),
            menus: false,
            started: false,
            error: None,
        }
    }

    /// Error that stopped the loop, if any.
    pub fn take_error(&mut self) -> Option<DesktopError> {
        self.error.take()
    }

    fn open_windows(&mut self, event_loop: &ActiveEventLoop) -> Result<(), DesktopError> {
        let _span = info_span!("simhost.desktop.open").entered();
        let dims = self.host.dimensions();
        self.menus = dims.has_menus;
        let width = self.opts.width.unwrap_or(dims.width).max(1);
        let height = self.opts.height.unwrap_or(dims.height).max(1);

        let names: Vec<Option<String>> = if self.opts.windows.is_empty() {
            vec![None; dims.windows.max(1) as usize]
        } else {
            self.opts.windows.iter().cloned().map(Some).collect()
        };

        let context = Context::new(event_loop.owned_display_handle())?;
        for name in names {
            let title = name.as_deref().unwrap_or("simhost");
            let attrs = Window::default_attributes()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(width, height));
            let window = Arc::new(event_loop.create_window(attrs)?);
            let surface = Surface::new(&context, window.clone())?;
            let size = window.inner_size();
            let frame = SurfaceFrame::from_size(f64::from(size.width), f64::from(size.height));
            let id = self.host.open_surface(name.as_deref(), frame);
            info!(title, width = size.width, height = size.height, "window opened");
            self.windows.push(SurfaceWindow {
                surface,
                window,
                id,
                title: title.to_owned(),
                cursor: (0.0, 0.0),
                held: None,
            });
        }
        self.context = Some(context);

        let ids: Vec<SurfaceId> = self.windows.iter().map(|w| w.id).collect();
        for id in ids {
            if self.host.start(id) == Flow::Terminated {
                event_loop.exit();
                return Ok(());
            }
        }

        if let Some(path) = self.opts.open.clone() {
            self.host.open_file(&path, false);
        }
        if let Some(path) = self.opts.script.clone() {
            self.host.open_file(&path, true);
        }
        if let Some(path) = self.opts.debug_script.clone() {
            self.host.debug_script(&path);
        }

        self.schedule();
        Ok(())
    }

    /// Turn pending host redraws into window redraw requests.
    fn schedule(&mut self) {
        while let Some(id) = self.host.next_redraw() {
            if let Some(w) = self.windows.iter().find(|w| w.id == id) {
                w.window.request_redraw();
            }
        }
    }

    fn present(&mut self, index: usize) -> Result<Flow, DesktopError> {
        let inset = self.host.config().chrome.inset;
        let w = &mut self.windows[index];
        let id = w.id;
        let size = w.window.inner_size();
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            // Minimized: tick without compositing.
            return Ok(redraw_blank(&mut self.host, id));
        };
        w.surface.resize(nw, nh)?;
        let mut buffer = w.surface.buffer_mut()?;
        let outer = SurfaceSize::new(size.width, size.height);

        let report = match Canvas::new(&mut buffer[..], outer, inset) {
            Ok(mut canvas) => {
                canvas.clear(0);
                self.host.redraw(id, outer, &mut canvas)
            }
            Err(err) => {
                debug!(%err, "framebuffer does not match window");
                return Ok(redraw_blank(&mut self.host, id));
            }
        };
        buffer.present()?;
        Ok(report.flow)
    }

    fn window_index(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.window.id() == id)
    }

    /// Window position to bottom-left origin.
    fn window_point(&self, index: usize, position: PhysicalPosition<f64>) -> (f64, f64) {
        let height = f64::from(self.windows[index].window.inner_size().height);
        (position.x, height - position.y)
    }

    fn send(&mut self, index: usize, input: RawInput) {
        let id = self.windows[index].id;
        self.host.handle_input(id, &input);
    }

    fn accelerate(&mut self, accelerator: Accelerator, event_loop: &ActiveEventLoop) {
        match accelerator {
            Accelerator::Menu(command) => {
                let reply = self.host.menu(command);
                for w in &self.windows {
                    if let Some(title) = toggle_title(&w.title, command, reply) {
                        w.window.set_title(&title);
                    }
                }
            }
            Accelerator::Save => {
                let path = self.opts.save_to.clone();
                self.host.save_file(&path);
            }
            Accelerator::About => self.host.about(),
            Accelerator::Quit => {
                self.host.quit();
                event_loop.exit();
            }
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: DesktopError) {
        error!(%err, "desktop backend failed");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl<E: Engine> ApplicationHandler<UserEvent> for App<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;
        if let Err(err) = self.open_windows(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(index) = self.window_index(window_id) else {
            return;
        };
        let mods = keymap::modifiers(self.modifiers);

        match event {
            WindowEvent::CloseRequested => {
                self.host.close_surface(self.windows[index].id);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let frame = SurfaceFrame::from_size(f64::from(size.width), f64::from(size.height));
                self.host.set_surface_frame(self.windows[index].id, frame);
                self.windows[index].window.request_redraw();
            }
            WindowEvent::RedrawRequested => match self.present(index) {
                Ok(Flow::Terminated) => event_loop.exit(),
                Ok(Flow::Continue) => self.schedule(),
                Err(err) => self.fail(event_loop, err),
            },
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Released {
                    self.send(index, RawInput::KeyUp);
                    return;
                }
                if let Some(accelerator) =
                    keymap::accelerator(&event.logical_key, self.modifiers, self.menus)
                {
                    self.accelerate(accelerator, event_loop);
                    return;
                }
                if let Some(key) = keymap::key_down(&event.logical_key, event.text.as_deref(), mods)
                {
                    self.send(index, RawInput::KeyDown(key));
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.window_point(index, position);
                let w = &mut self.windows[index];
                w.cursor = (x, y);
                if let Some(button) = w.held {
                    let drag = PointerInput::new(button, x, y).with_modifiers(mods);
                    self.send(index, RawInput::PointerDragged(drag));
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = keymap::pointer_button(button) else {
                    return;
                };
                let w = &mut self.windows[index];
                match state {
                    ElementState::Pressed => {
                        w.held = Some(button);
                        let (x, y) = w.cursor;
                        let press = PointerInput::new(button, x, y).with_modifiers(mods);
                        self.send(index, RawInput::PointerDown(press));
                    }
                    ElementState::Released => {
                        w.held = None;
                        self.send(index, RawInput::PointerUp(button));
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.send(index, keymap::scroll(delta));
            }
            WindowEvent::PinchGesture { delta, .. } => {
                self.send(index, RawInput::Magnify(delta));
            }
            WindowEvent::RotationGesture { delta, .. } => {
                self.send(index, RawInput::Rotate(f64::from(delta)));
            }
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Quit => {
                self.host.quit();
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}

/// Run the cycle for a surface with nothing to show this frame.
///
/// Compositing is skipped but the next redraw is still posted.
fn redraw_blank<E, X, C>(host: &mut Host<E, X, C>, id: SurfaceId) -> Flow
where
    E: Engine,
    X: ProcessExit,
    C: Clock,
{
    host.redraw(id, SurfaceSize::default(), &mut Canvas::empty()).flow
}

/// Window title showing the state a toggle command answered with.
fn toggle_title(base: &str, command: MenuCommand, reply: Option<i32>) -> Option<String> {
    if !command.reports_state() {
        return None;
    }
    let state = if reply? != 0 { "on" } else { "off" };
    Some(format!("{base} ({}: {state})", command.label()))
}

/// Open the windows and run until the host terminates.
pub fn run<E: Engine>(engine: E, opts: Opts) -> Result<(), DesktopError> {
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    let _signals = SignalGuard::install(event_loop.create_proxy())?;
    let mut app = App::new(engine, opts);
    event_loop.run_app(&mut app)?;
    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
