//! Win32 message interception
//!
//! Messages reach the overlay from OS callbacks: a subclassed window
//! procedure or a message-retrieval hook. Those callbacks can fire while the
//! engine is inside a modal loop, so they never touch the UI context
//! directly. They translate what they see into [`InputEvent`]s queued on a
//! shared [`MessageSink`], and the input translator applies the queue on the
//! engine thread right before the next UI frame begins.
//!
//! Everything here is platform-neutral; the OS calls live behind
//! [`WindowSystem`] and [`MessageServices`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::{InitError, InitResult};
use crate::host::WindowHandle;
use crate::keys::virtual_key_to_key;
use crate::ui::{Key, MOUSE_POS_ABSENT, MouseButton};
use crate::window::WindowSystem;

pub const WM_NULL: u32 = 0x0000;
pub const WM_SETFOCUS: u32 = 0x0007;
pub const WM_KILLFOCUS: u32 = 0x0008;
pub const WM_SETCURSOR: u32 = 0x0020;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_CHAR: u32 = 0x0102;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_IME_STARTCOMPOSITION: u32 = 0x010D;
pub const WM_IME_ENDCOMPOSITION: u32 = 0x010E;
pub const WM_IME_COMPOSITION: u32 = 0x010F;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_LBUTTONDBLCLK: u32 = 0x0203;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_RBUTTONDBLCLK: u32 = 0x0206;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_MBUTTONDBLCLK: u32 = 0x0209;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
pub const WM_XBUTTONDOWN: u32 = 0x020B;
pub const WM_XBUTTONUP: u32 = 0x020C;
pub const WM_XBUTTONDBLCLK: u32 = 0x020D;
pub const WM_MOUSEHWHEEL: u32 = 0x020E;
pub const WM_MOUSELEAVE: u32 = 0x02A3;

/// `lParam` flag of `WM_IME_COMPOSITION` announcing a result string
pub const GCS_RESULTSTR: isize = 0x0800;
/// Hit-test code for the client area (`WM_SETCURSOR`)
pub const HTCLIENT: u16 = 1;
const XBUTTON1: u16 = 0x0001;
const WHEEL_DELTA: f32 = 120.0;

/// Events kept while the engine thread does not drain the queue
const MAX_QUEUED_EVENTS: usize = 1024;

/// A window message as seen by the interceptor
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowMessage {
    pub hwnd: WindowHandle,
    pub message: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl WindowMessage {
    pub fn new(hwnd: WindowHandle, message: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            hwnd,
            message,
            wparam,
            lparam,
        }
    }

    /// Signed client coordinates packed in `lParam`
    #[inline]
    pub fn point(&self) -> [i32; 2] {
        let x = (self.lparam & 0xFFFF) as u16 as i16;
        let y = ((self.lparam >> 16) & 0xFFFF) as u16 as i16;
        [x as i32, y as i32]
    }

    #[inline]
    fn wparam_high(&self) -> u16 {
        ((self.wparam >> 16) & 0xFFFF) as u16
    }

    #[inline]
    fn lparam_low(&self) -> u16 {
        (self.lparam & 0xFFFF) as u16
    }
}

/// Input observed by the interceptor, applied later on the engine thread
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    MousePos([f32; 2]),
    MouseButton(MouseButton, bool),
    MouseWheel([f32; 2]),
    Key {
        key: Key,
        down: bool,
        native_keycode: i32,
        native_scancode: i32,
    },
    /// A complete character
    Char(char),
    /// One UTF-16 code unit (possibly half of a surrogate pair)
    Utf16(u16),
    Focus(bool),
    /// The OS asked for the client-area cursor to be refreshed
    UpdateCursor,
}

/// Where the overlay gets its input from
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputSource {
    /// Mouse and keyboard from the engine input manager; only IME text is
    /// taken from the message hook
    #[default]
    PolledInput,
    /// Everything from a message-retrieval hook
    MessageHook,
    /// Everything from a subclassed window procedure
    WindowSubclass,
}

/// Which messages the sink turns into input
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageFilter {
    /// IME composition only
    ImeOnly,
    /// Mouse, keyboard, characters, focus and IME
    Full,
}

impl From<InputSource> for MessageFilter {
    fn from(source: InputSource) -> Self {
        match source {
            InputSource::PolledInput => MessageFilter::ImeOnly,
            InputSource::MessageHook | InputSource::WindowSubclass => MessageFilter::Full,
        }
    }
}

/// OS services the retrieval filter needs
pub trait MessageServices {
    /// Result string of the finished IME composition, as UTF-16
    fn ime_result_string(&self, hwnd: WindowHandle) -> Vec<u16>;

    /// Generate character messages for a key message (`TranslateMessage`)
    fn translate(&self, msg: &WindowMessage);
}

/// State shared between OS message callbacks and the engine thread
#[derive(Debug)]
pub struct MessageSink {
    filter: MessageFilter,
    queue: Mutex<VecDeque<InputEvent>>,
    high_surrogate: Mutex<Option<u16>>,
    using_ime: AtomicBool,
    capture_mouse: AtomicBool,
    capture_keyboard: AtomicBool,
    alive: AtomicBool,
}

impl MessageSink {
    pub fn new(filter: MessageFilter) -> Self {
        Self {
            filter,
            queue: Mutex::new(VecDeque::new()),
            high_surrogate: Mutex::new(None),
            using_ime: AtomicBool::new(false),
            capture_mouse: AtomicBool::new(false),
            capture_keyboard: AtomicBool::new(false),
            alive: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn filter(&self) -> MessageFilter {
        self.filter
    }

    pub fn push(&self, event: InputEvent) {
        let mut queue = self.queue.lock();
        if queue.len() >= MAX_QUEUED_EVENTS {
            queue.pop_front();
        }
        queue.push_back(event);
    }

    /// Take every queued event in arrival order
    pub fn drain(&self) -> Vec<InputEvent> {
        self.queue.lock().drain(..).collect()
    }

    /// Drop queued events without applying them
    pub fn discard(&self) {
        self.queue.lock().clear();
    }

    /// Publish the UI's capture wishes for the next messages
    pub fn set_capture(&self, mouse: bool, keyboard: bool) {
        self.capture_mouse.store(mouse, Ordering::Relaxed);
        self.capture_keyboard.store(keyboard, Ordering::Relaxed);
    }

    #[inline]
    pub fn capture_mouse(&self) -> bool {
        self.capture_mouse.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn capture_keyboard(&self) -> bool {
        self.capture_keyboard.load(Ordering::Relaxed)
    }

    /// Whether an IME composition is in progress
    #[inline]
    pub fn using_ime(&self) -> bool {
        self.using_ime.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Release);
    }

    /// Forget all transient state (queue, partial characters, IME, capture)
    pub fn reset(&self) {
        self.discard();
        *self.high_surrogate.lock() = None;
        self.using_ime.store(false, Ordering::Relaxed);
        self.set_capture(false, false);
    }

    /// Window-procedure handler
    ///
    /// Returns true when the UI claims the message, in which case the caller
    /// must not forward it to the host.
    pub fn handle_window_message(&self, msg: &WindowMessage) -> bool {
        if self.filter == MessageFilter::ImeOnly {
            return false;
        }
        let capture_mouse = self.capture_mouse.load(Ordering::Relaxed);
        let capture_keyboard = self.capture_keyboard.load(Ordering::Relaxed);

        match msg.message {
            WM_MOUSEMOVE => {
                let [x, y] = msg.point();
                self.push(InputEvent::MousePos([x as f32, y as f32]));
                capture_mouse
            }
            WM_MOUSELEAVE => {
                self.push(InputEvent::MousePos(MOUSE_POS_ABSENT));
                false
            }
            WM_LBUTTONDOWN | WM_LBUTTONDBLCLK | WM_RBUTTONDOWN | WM_RBUTTONDBLCLK
            | WM_MBUTTONDOWN | WM_MBUTTONDBLCLK | WM_XBUTTONDOWN | WM_XBUTTONDBLCLK
            | WM_LBUTTONUP | WM_RBUTTONUP | WM_MBUTTONUP | WM_XBUTTONUP => {
                let (button, down) = match msg.message {
                    WM_LBUTTONDOWN | WM_LBUTTONDBLCLK => (MouseButton::Left, true),
                    WM_RBUTTONDOWN | WM_RBUTTONDBLCLK => (MouseButton::Right, true),
                    WM_MBUTTONDOWN | WM_MBUTTONDBLCLK => (MouseButton::Middle, true),
                    WM_LBUTTONUP => (MouseButton::Left, false),
                    WM_RBUTTONUP => (MouseButton::Right, false),
                    WM_MBUTTONUP => (MouseButton::Middle, false),
                    _ => {
                        let button = if msg.wparam_high() == XBUTTON1 {
                            MouseButton::Extra1
                        } else {
                            MouseButton::Extra2
                        };
                        (button, msg.message != WM_XBUTTONUP)
                    }
                };
                self.push(InputEvent::MouseButton(button, down));
                capture_mouse
            }
            WM_MOUSEWHEEL | WM_MOUSEHWHEEL => {
                let delta = msg.wparam_high() as i16 as f32 / WHEEL_DELTA;
                let wheel = if msg.message == WM_MOUSEWHEEL {
                    [0.0, delta]
                } else {
                    [delta, 0.0]
                };
                self.push(InputEvent::MouseWheel(wheel));
                capture_mouse
            }
            WM_KEYDOWN | WM_SYSKEYDOWN | WM_KEYUP | WM_SYSKEYUP => {
                let down = matches!(msg.message, WM_KEYDOWN | WM_SYSKEYDOWN);
                let vk = (msg.wparam & 0xFFFF) as u32;
                let scan_code = ((msg.lparam >> 16) & 0xFF) as u32;
                let extended = msg.lparam & 0x0100_0000 != 0;
                if let Some(key) = virtual_key_to_key(vk, scan_code, extended) {
                    self.push(InputEvent::Key {
                        key,
                        down,
                        native_keycode: vk as i32,
                        native_scancode: scan_code as i32,
                    });
                }
                capture_keyboard
            }
            WM_CHAR => {
                if msg.wparam > 0 && msg.wparam < 0x1_0000 {
                    self.push(InputEvent::Utf16(msg.wparam as u16));
                }
                capture_keyboard
            }
            WM_SETFOCUS | WM_KILLFOCUS => {
                self.push(InputEvent::Focus(msg.message == WM_SETFOCUS));
                false
            }
            WM_SETCURSOR => {
                if msg.lparam_low() == HTCLIENT {
                    self.push(InputEvent::UpdateCursor);
                }
                false
            }
            _ => false,
        }
    }

    /// Retrieval-hook filter, run on every message the host pulls from its queue
    ///
    /// Only messages with a window that are being removed from the queue are
    /// inspected. A message the UI claims is translated and rewritten to
    /// `WM_NULL` so the host dispatches nothing.
    pub fn filter_retrieved<S: MessageServices + ?Sized>(
        &self,
        msg: &mut WindowMessage,
        removing: bool,
        services: &S,
    ) {
        if msg.hwnd.is_null() || !removing {
            return;
        }

        match msg.message {
            WM_IME_STARTCOMPOSITION => self.using_ime.store(true, Ordering::Relaxed),
            WM_IME_ENDCOMPOSITION => self.using_ime.store(false, Ordering::Relaxed),
            WM_IME_COMPOSITION if msg.lparam & GCS_RESULTSTR != 0 => {
                self.using_ime.store(false, Ordering::Relaxed);
                if self.capture_keyboard.load(Ordering::Relaxed) {
                    for unit in services.ime_result_string(msg.hwnd) {
                        self.push(InputEvent::Utf16(unit));
                    }
                    msg.message = WM_NULL;
                }
            }
            WM_CHAR if self.filter == MessageFilter::Full => self.feed_char(msg.wparam),
            _ => {
                if self.handle_window_message(msg) {
                    services.translate(msg);
                    msg.message = WM_NULL;
                }
            }
        }
    }

    /// Reassemble `WM_CHAR` code units into characters
    ///
    /// The wide hook delivers UTF-16: a surrogate pair arrives as two
    /// messages and becomes one character. Unpaired surrogates are dropped.
    fn feed_char(&self, code: usize) {
        let Ok(unit) = u16::try_from(code) else {
            return;
        };
        let mut pending = self.high_surrogate.lock();
        let c = match (pending.take(), unit) {
            (_, 0xD800..=0xDBFF) => {
                *pending = Some(unit);
                return;
            }
            (Some(high), 0xDC00..=0xDFFF) => char::decode_utf16([high, unit])
                .next()
                .and_then(Result::ok),
            (_, 0xDC00..=0xDFFF) => None,
            (_, unit) => char::from_u32(u32::from(unit)),
        };
        if let Some(c) = c.filter(|c| !c.is_control()) {
            self.push(InputEvent::Char(c));
        }
    }
}

/// Installs and removes the message interception for one window at a time
#[derive(Debug)]
pub struct Interceptor {
    source: InputSource,
    installed: Option<WindowHandle>,
    sink: Arc<MessageSink>,
}

impl Interceptor {
    pub fn new(source: InputSource) -> Self {
        Self {
            source,
            installed: None,
            sink: Arc::new(MessageSink::new(source.into())),
        }
    }

    #[inline]
    pub fn source(&self) -> InputSource {
        self.source
    }

    #[inline]
    pub fn sink(&self) -> &Arc<MessageSink> {
        &self.sink
    }

    /// Window currently intercepted
    #[inline]
    pub fn installed_window(&self) -> Option<WindowHandle> {
        self.installed
    }

    /// Intercept messages of `hwnd`
    ///
    /// No-op when `hwnd` is already intercepted. An interception on another
    /// window is removed first. On failure nothing stays installed.
    pub fn install<W: WindowSystem + ?Sized>(
        &mut self,
        windows: &mut W,
        hwnd: WindowHandle,
    ) -> InitResult<()> {
        if self.installed == Some(hwnd) {
            return Ok(());
        }
        if self.installed.is_some() {
            self.uninstall(windows)?;
        }
        if hwnd.is_null() || !windows.is_window(hwnd) {
            return Err(InitError::InvalidWindow);
        }

        let sink = Arc::clone(&self.sink);
        let result = match self.source {
            InputSource::PolledInput | InputSource::MessageHook => {
                windows.install_message_hook(hwnd, sink)
            }
            InputSource::WindowSubclass => windows.install_subclass(hwnd, sink),
        };
        result.map_err(InitError::HookInstall)?;

        self.sink.set_alive(true);
        self.installed = Some(hwnd);
        tracing::debug!(target: "dear-imgui-ck2", "Installed {:?} interception on {:?}", self.source, hwnd);
        Ok(())
    }

    /// Remove the interception; a no-op when nothing is installed
    pub fn uninstall<W: WindowSystem + ?Sized>(&mut self, windows: &mut W) -> InitResult<()> {
        let Some(hwnd) = self.installed else {
            return Ok(());
        };

        let result = match self.source {
            InputSource::PolledInput | InputSource::MessageHook => {
                windows.uninstall_message_hook(hwnd)
            }
            InputSource::WindowSubclass => windows.uninstall_subclass(hwnd),
        };
        // The saved hook is gone either way once the OS call has been made.
        self.installed = None;
        self.sink.set_alive(false);
        self.sink.reset();
        result.map_err(InitError::HookUninstall)?;

        tracing::debug!(target: "dear-imgui-ck2", "Removed interception from {:?}", hwnd);
        Ok(())
    }
}
