//! UI library capability interface
//!
//! The overlay never links the UI library statically. A host-resident module
//! hands out a versioned function table once at startup; [`UiProvider`]
//! models that handshake and [`UiBackend`] models the table itself, so the
//! bridge can be driven by Dear ImGui (feature `dear-imgui`) or by any other
//! implementation with the same frame lifecycle and input model.

use bitflags::bitflags;

use crate::draw::{DrawData, TextureId};
use crate::error::InitResult;

/// Position reported to the UI library when the mouse is not over the window
pub const MOUSE_POS_ABSENT: [f32; 2] = [-f32::MAX, -f32::MAX];

/// UI-library key symbols understood by the bridge
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Key {
    Tab,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    LeftCtrl,
    LeftShift,
    LeftAlt,
    LeftSuper,
    RightCtrl,
    RightShift,
    RightAlt,
    RightSuper,
    Menu,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Semicolon,
    Equal,
    LeftBracket,
    Backslash,
    RightBracket,
    GraveAccent,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadDecimal,
    KeypadDivide,
    KeypadMultiply,
    KeypadSubtract,
    KeypadAdd,
    KeypadEnter,
    KeypadEqual,
    /// Combined "either Ctrl is down" modifier
    ModCtrl,
    /// Combined "either Shift is down" modifier
    ModShift,
    /// Combined "either Alt is down" modifier
    ModAlt,
    /// Combined "either Super is down" modifier
    ModSuper,
}

/// Mouse buttons, in UI-library index order
#[repr(usize)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Middle = 2,
    Extra1 = 3,
    Extra2 = 4,
}

impl MouseButton {
    /// Buttons polled from the host input device, in device order
    pub const POLLED: [MouseButton; 4] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Extra1,
    ];
}

/// Cursor shapes the UI library can request
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum MouseCursor {
    Arrow,
    TextInput,
    ResizeAll,
    ResizeNS,
    ResizeEW,
    ResizeNESW,
    ResizeNWSE,
    Hand,
    NotAllowed,
}

bitflags! {
    /// UI library configuration flags relevant to the backend
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ConfigFlags: u32 {
        /// Keyboard navigation
        const NAV_ENABLE_KEYBOARD = 1 << 0;
        /// Gamepad navigation
        const NAV_ENABLE_GAMEPAD = 1 << 1;
        /// Do not read mouse input
        const NO_MOUSE = 1 << 4;
        /// Never change the OS cursor shape
        const NO_MOUSE_CURSOR_CHANGE = 1 << 5;
    }
}

bitflags! {
    /// Capabilities the backend advertises to the UI library
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BackendFlags: u32 {
        /// Backend honors `mouse_cursor()` requests
        const HAS_MOUSE_CURSORS = 1 << 1;
        /// Backend can move the OS cursor on request
        const HAS_SET_MOUSE_POS = 1 << 2;
        /// Renderer honors per-command vertex offsets
        const RENDERER_HAS_VTX_OFFSET = 1 << 3;
    }
}

/// Font atlas bitmap in 32-bit RGBA
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontAtlasImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Settings applied when the UI context is created
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiContextConfig {
    pub ini_filename: Option<String>,
    pub log_filename: Option<String>,
    pub config_flags: ConfigFlags,
}

/// Access to one live UI library context
///
/// Every method runs on the engine thread. Input methods only queue events;
/// the UI library applies them on the next `new_frame`.
pub trait UiBackend {
    /// Begin a UI frame
    fn new_frame(&mut self);

    /// Finish the frame and expose its draw lists
    fn render(&mut self) -> &DrawData;

    fn add_key_event(&mut self, key: Key, down: bool);

    /// Attach the platform key and scan codes to the last key event
    fn set_key_event_native_data(&mut self, _key: Key, _native_keycode: i32, _native_scancode: i32) {}

    fn add_input_character(&mut self, character: char);

    /// Queue one UTF-16 code unit; surrogate pairs are joined by the library
    fn add_input_character_utf16(&mut self, unit: u16);

    fn add_mouse_pos_event(&mut self, pos: [f32; 2]);

    fn add_mouse_button_event(&mut self, button: MouseButton, down: bool);

    fn add_mouse_wheel_event(&mut self, wheel: [f32; 2]);

    fn add_focus_event(&mut self, focused: bool);

    /// Whether the library currently considers `key` held
    fn is_key_down(&self, key: Key) -> bool;

    /// Requested cursor shape, `None` when the cursor should be hidden
    fn mouse_cursor(&self) -> Option<MouseCursor>;

    /// Whether the library draws a software cursor itself
    fn mouse_draw_cursor(&self) -> bool;

    fn config_flags(&self) -> ConfigFlags;

    fn backend_flags(&self) -> BackendFlags;

    fn set_backend_flags(&mut self, flags: BackendFlags);

    /// Name reported for both platform and renderer backends
    fn set_backend_name(&mut self, name: Option<&str>);

    fn want_capture_mouse(&self) -> bool;

    fn want_capture_keyboard(&self) -> bool;

    fn want_set_mouse_pos(&self) -> bool;

    fn mouse_pos(&self) -> [f32; 2];

    fn set_display_size(&mut self, size: [f32; 2]);

    fn set_delta_time(&mut self, seconds: f32);

    /// Build (if needed) and fetch the font atlas as RGBA32
    fn font_atlas_rgba32(&mut self) -> Option<FontAtlasImage>;

    /// Bind the font atlas to a texture (`TextureId::null()` unbinds it)
    fn set_font_texture_id(&mut self, id: TextureId);
}

/// Numeric form of a `major.minor.patch` version string
///
/// Matches the library's own `IMGUI_VERSION_NUM` encoding, so `"1.92.5"`
/// becomes `19205`. Suffixes such as `"1.92.5 WIP"` are ignored.
pub fn version_num(version: &str) -> Option<u32> {
    let core = version.split_whitespace().next()?;
    let mut parts = core.split('.').map(|part| {
        let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<u32>().ok()
    });
    let major = parts.next()??;
    let minor = parts.next().flatten().unwrap_or(0);
    let patch = parts.next().flatten().unwrap_or(0);
    if minor >= 100 || patch >= 100 {
        return None;
    }
    Some(major * 10_000 + minor * 100 + patch)
}

/// Versioned source of UI contexts, resolved once at plugin load
pub trait UiProvider {
    type Ui: UiBackend;

    /// Version of the function table, `None` if no table could be obtained
    fn api_version(&self) -> Option<u32>;

    /// Create the process-wide UI context
    fn create_context(&mut self, config: &UiContextConfig) -> InitResult<Self::Ui>;
}
