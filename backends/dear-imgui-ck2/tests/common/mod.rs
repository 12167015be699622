//! Mock engine, window system and UI library shared by the integration tests
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use dear_imgui_ck2::host::{
    InputDevice, KeyBufferEntry, PrimitiveVertex, Rect, RenderState, TextureStageState,
    TransformKind,
};
use dear_imgui_ck2::keys::ScanCode;
use dear_imgui_ck2::ui::{
    BackendFlags, ConfigFlags, FontAtlasImage, Key, MouseButton, MouseCursor, UiContextConfig,
};
use dear_imgui_ck2::{
    DrawData, DrawList, HostContext, InitError, InitResult, MessageSink, OsCursor, RenderContext,
    TextureId, UiBackend, UiProvider, WindowHandle, WindowSystem,
};
use glam::Mat4;

pub const MAIN_WINDOW: WindowHandle = WindowHandle(0x2000);

/// Route backend logs to the test harness output
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
pub struct MockRender {
    pub draw_calls: usize,
    pub textures_created: usize,
    pub textures_destroyed: usize,
    pub live_textures: HashSet<TextureId>,
    next_texture: usize,
}

impl RenderContext for MockRender {
    fn window_handle(&self) -> WindowHandle {
        MAIN_WINDOW
    }

    fn window_rect(&self) -> Rect {
        Rect::new(0, 0, 800, 600)
    }

    fn set_state(&mut self, _state: RenderState) {}

    fn set_texture_stage_state(&mut self, _stage: u32, _state: TextureStageState) {}

    fn transform(&self, _kind: TransformKind) -> Mat4 {
        Mat4::IDENTITY
    }

    fn set_transform(&mut self, _kind: TransformKind, _matrix: Mat4) {}

    fn set_texture(&mut self, _texture: Option<TextureId>) {}

    fn draw_primitive(&mut self, _vertices: &[PrimitiveVertex], _indices: &[u16]) {
        self.draw_calls += 1;
    }

    fn create_texture(
        &mut self,
        _name: &str,
        _width: u32,
        _height: u32,
        _pixels: &[u8],
    ) -> Option<TextureId> {
        self.next_texture += 1;
        let texture = TextureId::new(self.next_texture);
        self.textures_created += 1;
        self.live_textures.insert(texture);
        Some(texture)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures_destroyed += 1;
        self.live_textures.remove(&texture);
    }
}

#[derive(Debug, Default)]
pub struct MockInput {
    pub mouse_pos: [i32; 2],
    pub keys_down: HashSet<ScanCode>,
    pub key_buffer: Vec<KeyBufferEntry>,
}

impl InputDevice for MockInput {
    fn mouse_position(&self) -> [i32; 2] {
        self.mouse_pos
    }

    fn mouse_relative_position(&self) -> [f32; 3] {
        [0.0; 3]
    }

    fn mouse_buttons(&self) -> [bool; 4] {
        [false; 4]
    }

    fn is_key_down(&self, code: ScanCode) -> bool {
        self.keys_down.contains(&code)
    }

    fn key_buffer(&self) -> &[KeyBufferEntry] {
        &self.key_buffer
    }

    fn scan_code_to_char(&self, _code: ScanCode) -> Option<char> {
        None
    }

    fn enable_keyboard_repetition(&mut self, _enable: bool) {}
}

#[derive(Debug)]
pub struct MockHost {
    pub window: WindowHandle,
    pub render: MockRender,
    pub input: MockInput,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            window: MAIN_WINDOW,
            render: MockRender::default(),
            input: MockInput::default(),
        }
    }
}

impl HostContext for MockHost {
    type Render = MockRender;
    type Input = MockInput;

    fn main_window(&self) -> WindowHandle {
        self.window
    }

    fn render_context(&mut self) -> Option<&mut MockRender> {
        Some(&mut self.render)
    }

    fn input(&mut self) -> Option<&mut MockInput> {
        Some(&mut self.input)
    }

    fn last_delta_time_ms(&self) -> f32 {
        16.0
    }
}

#[derive(Debug, Default)]
pub struct MockWindows {
    pub install_calls: usize,
    pub installed: Vec<WindowHandle>,
    pub fail_install: bool,
    pub sinks: Vec<Arc<MessageSink>>,
}

impl MockWindows {
    fn install(&mut self, hwnd: WindowHandle, sink: Arc<MessageSink>) -> Result<(), String> {
        self.install_calls += 1;
        if self.fail_install {
            return Err("hook refused".to_string());
        }
        self.installed.push(hwnd);
        self.sinks.push(sink);
        Ok(())
    }

    fn uninstall(&mut self, hwnd: WindowHandle) -> Result<(), String> {
        self.installed.retain(|h| *h != hwnd);
        Ok(())
    }
}

impl WindowSystem for MockWindows {
    fn is_window(&self, hwnd: WindowHandle) -> bool {
        !hwnd.is_null()
    }

    fn install_message_hook(
        &mut self,
        hwnd: WindowHandle,
        sink: Arc<MessageSink>,
    ) -> Result<(), String> {
        self.install(hwnd, sink)
    }

    fn uninstall_message_hook(&mut self, hwnd: WindowHandle) -> Result<(), String> {
        self.uninstall(hwnd)
    }

    fn install_subclass(&mut self, hwnd: WindowHandle, sink: Arc<MessageSink>) -> Result<(), String> {
        self.install(hwnd, sink)
    }

    fn uninstall_subclass(&mut self, hwnd: WindowHandle) -> Result<(), String> {
        self.uninstall(hwnd)
    }

    fn foreground_window(&self) -> WindowHandle {
        MAIN_WINDOW
    }

    fn set_cursor(&mut self, _cursor: Option<OsCursor>) {}

    fn client_to_screen(&self, _hwnd: WindowHandle, point: [i32; 2]) -> Option<[i32; 2]> {
        Some(point)
    }

    fn set_cursor_pos(&mut self, _pos: [i32; 2]) {}
}

/// UI library double producing one visible rectangle per frame
#[derive(Debug)]
pub struct MockUi {
    pub new_frames: usize,
    pub renders: usize,
    pub key_events: Vec<(Key, bool)>,
    pub mouse_positions: Vec<[f32; 2]>,
    pub keys_down: HashSet<Key>,
    pub backend_flags: BackendFlags,
    pub font_texture: TextureId,
    frame: DrawData,
    empty: DrawData,
}

impl Default for MockUi {
    fn default() -> Self {
        let mut list = DrawList::new();
        list.add_rect(
            [10.0, 10.0],
            [50.0, 30.0],
            0xFFFF_FFFF,
            TextureId::null(),
            [0.0, 0.0, 800.0, 600.0],
        );
        let mut frame = DrawData::new([0.0, 0.0], [800.0, 600.0], [1.0, 1.0]);
        frame.push_draw_list(list);
        Self {
            new_frames: 0,
            renders: 0,
            key_events: Vec::new(),
            mouse_positions: Vec::new(),
            keys_down: HashSet::new(),
            backend_flags: BackendFlags::empty(),
            font_texture: TextureId::null(),
            frame,
            empty: DrawData::default(),
        }
    }
}

impl MockUi {
    /// Replace the frame's draw lists
    pub fn set_frame(&mut self, frame: DrawData) {
        self.frame = frame;
    }
}

impl UiBackend for MockUi {
    fn new_frame(&mut self) {
        self.new_frames += 1;
    }

    fn render(&mut self) -> &DrawData {
        self.renders += 1;
        if self.renders > self.new_frames {
            return &self.empty;
        }
        &self.frame
    }

    fn add_key_event(&mut self, key: Key, down: bool) {
        self.key_events.push((key, down));
    }

    fn add_input_character(&mut self, _character: char) {}

    fn add_input_character_utf16(&mut self, _unit: u16) {}

    fn add_mouse_pos_event(&mut self, pos: [f32; 2]) {
        self.mouse_positions.push(pos);
    }

    fn add_mouse_button_event(&mut self, _button: MouseButton, _down: bool) {}

    fn add_mouse_wheel_event(&mut self, _wheel: [f32; 2]) {}

    fn add_focus_event(&mut self, _focused: bool) {}

    fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    fn mouse_cursor(&self) -> Option<MouseCursor> {
        Some(MouseCursor::Arrow)
    }

    fn mouse_draw_cursor(&self) -> bool {
        false
    }

    fn config_flags(&self) -> ConfigFlags {
        ConfigFlags::empty()
    }

    fn backend_flags(&self) -> BackendFlags {
        self.backend_flags
    }

    fn set_backend_flags(&mut self, flags: BackendFlags) {
        self.backend_flags = flags;
    }

    fn set_backend_name(&mut self, _name: Option<&str>) {}

    fn want_capture_mouse(&self) -> bool {
        false
    }

    fn want_capture_keyboard(&self) -> bool {
        false
    }

    fn want_set_mouse_pos(&self) -> bool {
        false
    }

    fn mouse_pos(&self) -> [f32; 2] {
        [0.0, 0.0]
    }

    fn set_display_size(&mut self, _size: [f32; 2]) {}

    fn set_delta_time(&mut self, _seconds: f32) {}

    fn font_atlas_rgba32(&mut self) -> Option<FontAtlasImage> {
        Some(FontAtlasImage {
            width: 2,
            height: 2,
            pixels: vec![0xFF; 16],
        })
    }

    fn set_font_texture_id(&mut self, id: TextureId) {
        self.font_texture = id;
    }
}

#[derive(Debug)]
pub struct MockProvider {
    pub version: Option<u32>,
    pub contexts: usize,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            version: Some(19205),
            contexts: 0,
        }
    }
}

impl UiProvider for MockProvider {
    type Ui = MockUi;

    fn api_version(&self) -> Option<u32> {
        self.version
    }

    fn create_context(&mut self, _config: &UiContextConfig) -> InitResult<MockUi> {
        if self.version.is_none() {
            return Err(InitError::FunctionTableUnavailable);
        }
        self.contexts += 1;
        Ok(MockUi::default())
    }
}
