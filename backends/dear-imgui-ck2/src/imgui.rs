//! Dear ImGui through the `dear-imgui-rs` bindings
//!
//! [`ImGuiProvider`] creates the process-wide context and [`ImGuiUi`] exposes
//! it as a [`UiBackend`]. Frame contents are built by closures scheduled with
//! [`ImGuiUi::draw`]; they run inside the library frame right before it is
//! rendered.

use std::rc::Rc;

use dear_imgui_rs as imgui;
use dear_imgui_rs::sys;

use crate::draw::{DrawCmd, DrawCmdParams, DrawData, DrawList, DrawVert, TextureId};
use crate::error::{InitError, InitResult};
use crate::ui::{
    BackendFlags, ConfigFlags, FontAtlasImage, Key, MouseButton, MouseCursor, UiBackend,
    UiContextConfig, UiProvider, version_num,
};

type FrameBuilder = Box<dyn FnOnce(&imgui::Ui)>;

/// Provider backed by the linked Dear ImGui library
#[derive(Debug, Default)]
pub struct ImGuiProvider;

impl ImGuiProvider {
    pub fn new() -> Self {
        Self
    }
}

impl UiProvider for ImGuiProvider {
    type Ui = ImGuiUi;

    fn api_version(&self) -> Option<u32> {
        version_num(imgui::dear_imgui_version())
    }

    fn create_context(&mut self, config: &UiContextConfig) -> InitResult<ImGuiUi> {
        let mut ctx = imgui::Context::create()
            .map_err(|err| InitError::BackendAllocation(err.to_string()))?;
        ctx.set_ini_filename(config.ini_filename.clone())
            .map_err(|err| InitError::BackendAllocation(err.to_string()))?;
        ctx.set_log_filename(config.log_filename.clone())
            .map_err(|err| InitError::BackendAllocation(err.to_string()))?;
        let flags = ctx.io().config_flags() | to_imgui_config_flags(config.config_flags);
        ctx.io_mut().set_config_flags(flags);
        Ok(ImGuiUi::new(ctx))
    }
}

/// A live Dear ImGui context
pub struct ImGuiUi {
    ctx: imgui::Context,
    builders: Vec<FrameBuilder>,
    frame_open: bool,
    draw_data: DrawData,
}

impl ImGuiUi {
    fn new(ctx: imgui::Context) -> Self {
        Self {
            ctx,
            builders: Vec::new(),
            frame_open: false,
            draw_data: DrawData::default(),
        }
    }

    pub fn context(&self) -> &imgui::Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut imgui::Context {
        &mut self.ctx
    }

    /// Schedule UI building for the current frame
    pub fn draw(&mut self, builder: impl FnOnce(&imgui::Ui) + 'static) {
        self.builders.push(Box::new(builder));
    }

    /// IO of the current context, for entry points the safe wrapper lacks
    fn raw_io(&mut self) -> *mut sys::ImGuiIO {
        unsafe { sys::ImGui_GetIO() }
    }
}

impl std::fmt::Debug for ImGuiUi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImGuiUi")
            .field("builders", &self.builders.len())
            .field("frame_open", &self.frame_open)
            .finish_non_exhaustive()
    }
}

impl UiBackend for ImGuiUi {
    fn new_frame(&mut self) {
        // The library frame starts in `render`, once the builders are known.
        self.frame_open = true;
    }

    fn render(&mut self) -> &DrawData {
        self.draw_data.clear();
        if !std::mem::take(&mut self.frame_open) {
            self.builders.clear();
            return &self.draw_data;
        }

        let ui = self.ctx.frame();
        for builder in self.builders.drain(..) {
            builder(&*ui);
        }
        let raw = self.ctx.render();
        snapshot_draw_data(raw, &mut self.draw_data);
        &self.draw_data
    }

    fn add_key_event(&mut self, key: Key, down: bool) {
        let io = self.raw_io();
        unsafe { sys::ImGuiIO_AddKeyEvent(io, imgui_key(key), down) };
    }

    fn set_key_event_native_data(&mut self, key: Key, native_keycode: i32, native_scancode: i32) {
        let io = self.raw_io();
        unsafe {
            sys::ImGuiIO_SetKeyEventNativeData(io, imgui_key(key), native_keycode, native_scancode, -1)
        };
    }

    fn add_input_character(&mut self, character: char) {
        self.ctx.io_mut().add_input_character(character);
    }

    fn add_input_character_utf16(&mut self, unit: u16) {
        let io = self.raw_io();
        unsafe { sys::ImGuiIO_AddInputCharacterUTF16(io, unit) };
    }

    fn add_mouse_pos_event(&mut self, pos: [f32; 2]) {
        self.ctx.io_mut().add_mouse_pos_event(pos);
    }

    fn add_mouse_button_event(&mut self, button: MouseButton, down: bool) {
        let io = self.raw_io();
        unsafe { sys::ImGuiIO_AddMouseButtonEvent(io, button as i32, down) };
    }

    fn add_mouse_wheel_event(&mut self, wheel: [f32; 2]) {
        self.ctx.io_mut().add_mouse_wheel_event(wheel);
    }

    fn add_focus_event(&mut self, focused: bool) {
        let io = self.raw_io();
        unsafe { sys::ImGuiIO_AddFocusEvent(io, focused) };
    }

    fn is_key_down(&self, key: Key) -> bool {
        unsafe { sys::ImGui_IsKeyDown(imgui_key(key)) }
    }

    fn mouse_cursor(&self) -> Option<MouseCursor> {
        let cursor = unsafe { sys::ImGui_GetMouseCursor() };
        match cursor {
            c if c == sys::ImGuiMouseCursor_Arrow => Some(MouseCursor::Arrow),
            c if c == sys::ImGuiMouseCursor_TextInput => Some(MouseCursor::TextInput),
            c if c == sys::ImGuiMouseCursor_ResizeAll => Some(MouseCursor::ResizeAll),
            c if c == sys::ImGuiMouseCursor_ResizeNS => Some(MouseCursor::ResizeNS),
            c if c == sys::ImGuiMouseCursor_ResizeEW => Some(MouseCursor::ResizeEW),
            c if c == sys::ImGuiMouseCursor_ResizeNESW => Some(MouseCursor::ResizeNESW),
            c if c == sys::ImGuiMouseCursor_ResizeNWSE => Some(MouseCursor::ResizeNWSE),
            c if c == sys::ImGuiMouseCursor_Hand => Some(MouseCursor::Hand),
            c if c == sys::ImGuiMouseCursor_NotAllowed => Some(MouseCursor::NotAllowed),
            _ => None,
        }
    }

    fn mouse_draw_cursor(&self) -> bool {
        unsafe { (*sys::ImGui_GetIO()).MouseDrawCursor }
    }

    fn config_flags(&self) -> ConfigFlags {
        from_imgui_config_flags(self.ctx.io().config_flags())
    }

    fn backend_flags(&self) -> BackendFlags {
        let flags = self.ctx.io().backend_flags();
        let mut ours = BackendFlags::empty();
        ours.set(
            BackendFlags::HAS_MOUSE_CURSORS,
            flags.contains(imgui::BackendFlags::HAS_MOUSE_CURSORS),
        );
        ours.set(
            BackendFlags::HAS_SET_MOUSE_POS,
            flags.contains(imgui::BackendFlags::HAS_SET_MOUSE_POS),
        );
        ours.set(
            BackendFlags::RENDERER_HAS_VTX_OFFSET,
            flags.contains(imgui::BackendFlags::RENDERER_HAS_VTX_OFFSET),
        );
        ours
    }

    fn set_backend_flags(&mut self, flags: BackendFlags) {
        let io = self.ctx.io_mut();
        let mut theirs = io.backend_flags();
        theirs.set(
            imgui::BackendFlags::HAS_MOUSE_CURSORS,
            flags.contains(BackendFlags::HAS_MOUSE_CURSORS),
        );
        theirs.set(
            imgui::BackendFlags::HAS_SET_MOUSE_POS,
            flags.contains(BackendFlags::HAS_SET_MOUSE_POS),
        );
        theirs.set(
            imgui::BackendFlags::RENDERER_HAS_VTX_OFFSET,
            flags.contains(BackendFlags::RENDERER_HAS_VTX_OFFSET),
        );
        io.set_backend_flags(theirs);
    }

    fn set_backend_name(&mut self, name: Option<&str>) {
        if let Err(err) = self.ctx.set_platform_name(name) {
            tracing::warn!(target: "dear-imgui-ck2", "Failed to set platform name: {}", err);
        }
        if let Err(err) = self.ctx.set_renderer_name(name) {
            tracing::warn!(target: "dear-imgui-ck2", "Failed to set renderer name: {}", err);
        }
    }

    fn want_capture_mouse(&self) -> bool {
        self.ctx.io().want_capture_mouse()
    }

    fn want_capture_keyboard(&self) -> bool {
        self.ctx.io().want_capture_keyboard()
    }

    fn want_set_mouse_pos(&self) -> bool {
        self.ctx.io().want_set_mouse_pos()
    }

    fn mouse_pos(&self) -> [f32; 2] {
        self.ctx.io().mouse_pos()
    }

    fn set_display_size(&mut self, size: [f32; 2]) {
        self.ctx.io_mut().set_display_size(size);
    }

    fn set_delta_time(&mut self, seconds: f32) {
        self.ctx.io_mut().set_delta_time(seconds);
    }

    fn font_atlas_rgba32(&mut self) -> Option<FontAtlasImage> {
        let mut fonts = self.ctx.fonts();
        if !fonts.is_built() && !fonts.build() {
            return None;
        }
        let data = fonts.tex_data_mut()?;
        let width = u32::try_from(data.width()).ok()?;
        let height = u32::try_from(data.height()).ok()?;
        let pixels = match data.format() {
            imgui::TextureFormat::RGBA32 => data.pixels()?.to_vec(),
            imgui::TextureFormat::Alpha8 => data
                .pixels()?
                .iter()
                .flat_map(|&alpha| [0xFF, 0xFF, 0xFF, alpha])
                .collect(),
        };
        Some(FontAtlasImage {
            width,
            height,
            pixels,
        })
    }

    fn set_font_texture_id(&mut self, id: TextureId) {
        self.ctx
            .fonts()
            .set_texture_id(imgui::TextureId::new(id.id()));
    }
}

/// Copy one rendered frame into owned draw lists
///
/// User callbacks keep pointers into the library's buffers, which stay valid
/// until the next library frame starts.
fn snapshot_draw_data(raw: &imgui::render::DrawData, out: &mut DrawData) {
    out.display_pos = raw.display_pos();
    out.display_size = raw.display_size();
    out.framebuffer_scale = raw.framebuffer_scale();

    for list in raw.draw_lists() {
        let vertices = list
            .vtx_buffer()
            .iter()
            .map(|v| DrawVert {
                pos: v.pos,
                uv: v.uv,
                col: v.col,
            })
            .collect();
        let indices = list.idx_buffer().to_vec();
        let raw_list = list.as_raw();
        let commands = unsafe { raw_commands(raw_list) }
            .iter()
            .map(|cmd| snapshot_command(raw_list, cmd))
            .collect();
        out.push_draw_list(DrawList::from_parts(vertices, indices, commands));
    }
}

/// # Safety
/// `list` must point to a live `ImDrawList`
unsafe fn raw_commands<'a>(list: *const sys::ImDrawList) -> &'a [sys::ImDrawCmd] {
    unsafe {
        let buffer = &(*list).CmdBuffer;
        if buffer.Size <= 0 || buffer.Data.is_null() {
            return &[];
        }
        std::slice::from_raw_parts(buffer.Data as *const sys::ImDrawCmd, buffer.Size as usize)
    }
}

fn snapshot_command(list: *const sys::ImDrawList, cmd: &sys::ImDrawCmd) -> DrawCmd {
    let cmd_params = DrawCmdParams {
        clip_rect: [cmd.ClipRect.x, cmd.ClipRect.y, cmd.ClipRect.z, cmd.ClipRect.w],
        texture_id: TextureId::new(cmd.TexRef._TexID as usize),
        vtx_offset: cmd.VtxOffset as usize,
        idx_offset: cmd.IdxOffset as usize,
    };
    match cmd.UserCallback {
        Some(callback) if is_reset_render_state(callback as usize) => DrawCmd::ResetRenderState,
        Some(callback) => {
            let raw_cmd: *const sys::ImDrawCmd = cmd;
            DrawCmd::UserCallback {
                callback: Rc::new(move |_: &DrawList, _: &DrawCmdParams| unsafe {
                    callback(list, raw_cmd)
                }),
                cmd_params,
            }
        }
        None => DrawCmd::Elements {
            count: cmd.ElemCount as usize,
            cmd_params,
        },
    }
}

/// `ImDrawCallback_ResetRenderState` is `(ImDrawCallback)-1` in older
/// releases and `(ImDrawCallback)-8` since 1.92
fn is_reset_render_state(callback: usize) -> bool {
    callback == usize::MAX || callback == (-8isize) as usize
}

fn to_imgui_config_flags(flags: ConfigFlags) -> imgui::ConfigFlags {
    let mut theirs = imgui::ConfigFlags::empty();
    theirs.set(
        imgui::ConfigFlags::NAV_ENABLE_KEYBOARD,
        flags.contains(ConfigFlags::NAV_ENABLE_KEYBOARD),
    );
    theirs.set(
        imgui::ConfigFlags::NAV_ENABLE_GAMEPAD,
        flags.contains(ConfigFlags::NAV_ENABLE_GAMEPAD),
    );
    theirs.set(imgui::ConfigFlags::NO_MOUSE, flags.contains(ConfigFlags::NO_MOUSE));
    theirs.set(
        imgui::ConfigFlags::NO_MOUSE_CURSOR_CHANGE,
        flags.contains(ConfigFlags::NO_MOUSE_CURSOR_CHANGE),
    );
    theirs
}

fn from_imgui_config_flags(flags: imgui::ConfigFlags) -> ConfigFlags {
    let mut ours = ConfigFlags::empty();
    ours.set(
        ConfigFlags::NAV_ENABLE_KEYBOARD,
        flags.contains(imgui::ConfigFlags::NAV_ENABLE_KEYBOARD),
    );
    ours.set(
        ConfigFlags::NAV_ENABLE_GAMEPAD,
        flags.contains(imgui::ConfigFlags::NAV_ENABLE_GAMEPAD),
    );
    ours.set(ConfigFlags::NO_MOUSE, flags.contains(imgui::ConfigFlags::NO_MOUSE));
    ours.set(
        ConfigFlags::NO_MOUSE_CURSOR_CHANGE,
        flags.contains(imgui::ConfigFlags::NO_MOUSE_CURSOR_CHANGE),
    );
    ours
}

macro_rules! key_map {
    ($key:expr, { $($ours:ident => $theirs:ident),* $(,)? }) => {
        match $key {
            $(Key::$ours => sys::$theirs as i32,)*
        }
    };
}

/// Raw `ImGuiKey` value of a key, including the `ImGuiMod_*` modifiers
fn imgui_key(key: Key) -> i32 {
    key_map!(key, {
        Tab => ImGuiKey_Tab,
        LeftArrow => ImGuiKey_LeftArrow,
        RightArrow => ImGuiKey_RightArrow,
        UpArrow => ImGuiKey_UpArrow,
        DownArrow => ImGuiKey_DownArrow,
        PageUp => ImGuiKey_PageUp,
        PageDown => ImGuiKey_PageDown,
        Home => ImGuiKey_Home,
        End => ImGuiKey_End,
        Insert => ImGuiKey_Insert,
        Delete => ImGuiKey_Delete,
        Backspace => ImGuiKey_Backspace,
        Space => ImGuiKey_Space,
        Enter => ImGuiKey_Enter,
        Escape => ImGuiKey_Escape,
        LeftCtrl => ImGuiKey_LeftCtrl,
        LeftShift => ImGuiKey_LeftShift,
        LeftAlt => ImGuiKey_LeftAlt,
        LeftSuper => ImGuiKey_LeftSuper,
        RightCtrl => ImGuiKey_RightCtrl,
        RightShift => ImGuiKey_RightShift,
        RightAlt => ImGuiKey_RightAlt,
        RightSuper => ImGuiKey_RightSuper,
        Menu => ImGuiKey_Menu,
        Key0 => ImGuiKey_0,
        Key1 => ImGuiKey_1,
        Key2 => ImGuiKey_2,
        Key3 => ImGuiKey_3,
        Key4 => ImGuiKey_4,
        Key5 => ImGuiKey_5,
        Key6 => ImGuiKey_6,
        Key7 => ImGuiKey_7,
        Key8 => ImGuiKey_8,
        Key9 => ImGuiKey_9,
        A => ImGuiKey_A,
        B => ImGuiKey_B,
        C => ImGuiKey_C,
        D => ImGuiKey_D,
        E => ImGuiKey_E,
        F => ImGuiKey_F,
        G => ImGuiKey_G,
        H => ImGuiKey_H,
        I => ImGuiKey_I,
        J => ImGuiKey_J,
        K => ImGuiKey_K,
        L => ImGuiKey_L,
        M => ImGuiKey_M,
        N => ImGuiKey_N,
        O => ImGuiKey_O,
        P => ImGuiKey_P,
        Q => ImGuiKey_Q,
        R => ImGuiKey_R,
        S => ImGuiKey_S,
        T => ImGuiKey_T,
        U => ImGuiKey_U,
        V => ImGuiKey_V,
        W => ImGuiKey_W,
        X => ImGuiKey_X,
        Y => ImGuiKey_Y,
        Z => ImGuiKey_Z,
        F1 => ImGuiKey_F1,
        F2 => ImGuiKey_F2,
        F3 => ImGuiKey_F3,
        F4 => ImGuiKey_F4,
        F5 => ImGuiKey_F5,
        F6 => ImGuiKey_F6,
        F7 => ImGuiKey_F7,
        F8 => ImGuiKey_F8,
        F9 => ImGuiKey_F9,
        F10 => ImGuiKey_F10,
        F11 => ImGuiKey_F11,
        F12 => ImGuiKey_F12,
        Apostrophe => ImGuiKey_Apostrophe,
        Comma => ImGuiKey_Comma,
        Minus => ImGuiKey_Minus,
        Period => ImGuiKey_Period,
        Slash => ImGuiKey_Slash,
        Semicolon => ImGuiKey_Semicolon,
        Equal => ImGuiKey_Equal,
        LeftBracket => ImGuiKey_LeftBracket,
        Backslash => ImGuiKey_Backslash,
        RightBracket => ImGuiKey_RightBracket,
        GraveAccent => ImGuiKey_GraveAccent,
        CapsLock => ImGuiKey_CapsLock,
        ScrollLock => ImGuiKey_ScrollLock,
        NumLock => ImGuiKey_NumLock,
        PrintScreen => ImGuiKey_PrintScreen,
        Pause => ImGuiKey_Pause,
        Keypad0 => ImGuiKey_Keypad0,
        Keypad1 => ImGuiKey_Keypad1,
        Keypad2 => ImGuiKey_Keypad2,
        Keypad3 => ImGuiKey_Keypad3,
        Keypad4 => ImGuiKey_Keypad4,
        Keypad5 => ImGuiKey_Keypad5,
        Keypad6 => ImGuiKey_Keypad6,
        Keypad7 => ImGuiKey_Keypad7,
        Keypad8 => ImGuiKey_Keypad8,
        Keypad9 => ImGuiKey_Keypad9,
        KeypadDecimal => ImGuiKey_KeypadDecimal,
        KeypadDivide => ImGuiKey_KeypadDivide,
        KeypadMultiply => ImGuiKey_KeypadMultiply,
        KeypadSubtract => ImGuiKey_KeypadSubtract,
        KeypadAdd => ImGuiKey_KeypadAdd,
        KeypadEnter => ImGuiKey_KeypadEnter,
        KeypadEqual => ImGuiKey_KeypadEqual,
        ModCtrl => ImGuiMod_Ctrl,
        ModShift => ImGuiMod_Shift,
        ModAlt => ImGuiMod_Alt,
        ModSuper => ImGuiMod_Super,
    })
}
