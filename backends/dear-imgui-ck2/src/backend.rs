//! Backend context
//!
//! [`Ck2Backend`] is the per-session state block tying the interceptor, the
//! input translator, the font texture and the render bridge to one host
//! window. It exists exactly while the device is ready.

use crate::draw::DrawData;
use crate::error::{InitError, InitResult};
use crate::font::FontTexture;
use crate::host::{HostContext, InputDevice, Rect, RenderContext, WindowHandle};
use crate::input::InputTranslator;
use crate::message::{InputSource, Interceptor};
use crate::plugin::BACKEND_NAME;
use crate::render::RenderBridge;
use crate::ui::{BackendFlags, UiBackend};
use crate::window::WindowSystem;

/// Smallest delta time handed to the UI library
const MIN_DELTA_TIME: f32 = 1.0e-4;

/// Capabilities advertised while the backend is alive
const BACKEND_FLAGS: BackendFlags = BackendFlags::HAS_MOUSE_CURSORS
    .union(BackendFlags::HAS_SET_MOUSE_POS)
    .union(BackendFlags::RENDERER_HAS_VTX_OFFSET);

/// Per-session backend state
#[derive(Debug)]
pub struct Ck2Backend {
    hwnd: WindowHandle,
    /// Window the engine renders into; UI coordinates are its client coordinates
    render_window: WindowHandle,
    window_rect: Rect,
    font: FontTexture,
    interceptor: Interceptor,
    translator: InputTranslator,
    renderer: RenderBridge,
}

impl Ck2Backend {
    /// Bring the backend up on the host's main window
    ///
    /// Hooks are installed before anything else; if that fails nothing is
    /// left behind.
    pub fn init<U, H, W>(
        ui: &mut U,
        host: &mut H,
        windows: &mut W,
        source: InputSource,
    ) -> InitResult<Self>
    where
        U: UiBackend + ?Sized,
        H: HostContext + ?Sized,
        W: WindowSystem + ?Sized,
    {
        let hwnd = host.main_window();
        if hwnd.is_null() {
            return Err(InitError::InvalidWindow);
        }
        let (render_window, window_rect) = host
            .render_context()
            .map(|render| (render.window_handle(), render.window_rect()))
            .ok_or_else(|| InitError::BackendAllocation("no render context".to_string()))?;
        let render_window = if render_window.is_null() {
            hwnd
        } else {
            render_window
        };

        let mut interceptor = Interceptor::new(source);
        interceptor.install(windows, hwnd)?;

        ui.set_backend_name(Some(BACKEND_NAME));
        ui.set_backend_flags(ui.backend_flags() | BACKEND_FLAGS);

        tracing::debug!(target: "dear-imgui-ck2", "Backend initialized on {:?} ({:?})", hwnd, source);
        Ok(Self {
            hwnd,
            render_window,
            window_rect,
            font: FontTexture::new(),
            interceptor,
            translator: InputTranslator::new(),
            renderer: RenderBridge::new(),
        })
    }

    /// Release device resources and hooks
    pub fn shutdown<U, H, W>(mut self, ui: &mut U, host: &mut H, windows: &mut W) -> InitResult<()>
    where
        U: UiBackend + ?Sized,
        H: HostContext + ?Sized,
        W: WindowSystem + ?Sized,
    {
        self.font.destroy(ui, host.render_context());
        let uninstalled = self.interceptor.uninstall(windows);

        ui.set_backend_name(None);
        ui.set_backend_flags(ui.backend_flags() - BACKEND_FLAGS);
        tracing::debug!(target: "dear-imgui-ck2", "Backend shut down on {:?}", self.hwnd);
        uninstalled
    }

    #[inline]
    pub fn window(&self) -> WindowHandle {
        self.hwnd
    }

    #[inline]
    pub fn render_window(&self) -> WindowHandle {
        self.render_window
    }

    #[inline]
    pub fn window_rect(&self) -> Rect {
        self.window_rect
    }

    #[inline]
    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    #[inline]
    pub fn font(&self) -> &FontTexture {
        &self.font
    }

    /// Feed one frame worth of display, time and input state to the UI
    ///
    /// Must run right before the UI library's own `new_frame`.
    pub fn new_frame<U, H, W>(&mut self, ui: &mut U, host: &mut H, windows: &mut W)
    where
        U: UiBackend + ?Sized,
        H: HostContext + ?Sized,
        W: WindowSystem + ?Sized,
    {
        if let Some(render) = host.render_context() {
            self.window_rect = render.window_rect();
            if let Err(err) = self.font.ensure(ui, render) {
                tracing::warn!(target: "dear-imgui-ck2", "Font texture unavailable: {}", err);
            }
        }
        ui.set_display_size([self.window_rect.width() as f32, self.window_rect.height() as f32]);
        ui.set_delta_time((host.last_delta_time_ms() / 1000.0).max(MIN_DELTA_TIME));

        let source = self.interceptor.source();
        let sink = self.interceptor.sink();
        let focused = windows.foreground_window() == self.hwnd;

        if let Some(input) = host.input() {
            input.enable_keyboard_repetition(true);
            if source == InputSource::PolledInput {
                self.translator.process_polled(ui, input, self.window_rect, sink.using_ime());
            }
        }
        let cursor_requested = self.translator.apply_queued(ui, sink.drain());

        // Focus messages are sent, not posted, so only a subclassed window sees them.
        if source != InputSource::WindowSubclass {
            self.translator.update_focus(ui, focused);
        }
        if source != InputSource::PolledInput && focused && !self.translator.mouse_tracked() {
            if let Some(input) = host.input() {
                let [x, y] = input.mouse_position();
                if self.window_rect.contains_client_point(x, y) {
                    ui.add_mouse_pos_event([x as f32, y as f32]);
                }
            }
        }

        if focused && ui.want_set_mouse_pos() {
            let [x, y] = ui.mouse_pos();
            if let Some(screen) = windows.client_to_screen(self.render_window, [x as i32, y as i32]) {
                windows.set_cursor_pos(screen);
            }
        }

        self.translator.update_mouse_cursor(ui, windows, cursor_requested);
    }

    /// Publish the UI's capture wishes to the message interceptor
    pub fn update_capture<U: UiBackend + ?Sized>(&self, ui: &U) {
        self.interceptor
            .sink()
            .set_capture(ui.want_capture_mouse(), ui.want_capture_keyboard());
    }

    /// Drop input gathered while the overlay is hidden and release capture
    pub fn discard_input(&self) {
        let sink = self.interceptor.sink();
        sink.discard();
        sink.set_capture(false, false);
    }

    /// Render a finished frame through the host
    pub fn render_draw_data<H: HostContext + ?Sized>(&mut self, host: &mut H, draw_data: &DrawData) {
        if let Some(render) = host.render_context() {
            self.renderer.render(render, draw_data);
        }
    }
}
