//! In-memory host, window system and UI doubles for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::Mat4;

use crate::cursor::OsCursor;
use crate::draw::{DrawData, TextureId};
use crate::error::{InitError, InitResult};
use crate::host::{
    HostContext, InputDevice, KeyBufferEntry, PrimitiveVertex, Rect, RenderContext, RenderState,
    TextureStageState, TransformKind, WindowHandle,
};
use crate::keys::ScanCode;
use crate::message::MessageSink;
use crate::ui::{
    BackendFlags, ConfigFlags, FontAtlasImage, Key, MouseButton, MouseCursor, UiBackend,
    UiContextConfig, UiProvider,
};
use crate::window::WindowSystem;

pub const TEST_WINDOW: WindowHandle = WindowHandle(0x1000);

/// Render context recording everything it is asked to do
#[derive(Debug)]
pub struct FakeRender {
    pub window: WindowHandle,
    pub window_rect: Rect,
    pub pretransformed: bool,
    pub states: Vec<RenderState>,
    pub stage_states: Vec<(u32, TextureStageState)>,
    pub transforms: HashMap<TransformKind, Mat4>,
    pub bound_textures: Vec<Option<TextureId>>,
    pub scissors: Vec<[f32; 4]>,
    pub draws: Vec<(Vec<PrimitiveVertex>, Vec<u16>)>,
    pub uploads: Vec<(String, Vec<u8>)>,
    pub textures_created: usize,
    pub textures_destroyed: usize,
    pub live_textures: Vec<TextureId>,
    pub fail_texture_creation: bool,
}

impl Default for FakeRender {
    fn default() -> Self {
        Self {
            window: TEST_WINDOW,
            window_rect: Rect::new(0, 0, 640, 480),
            pretransformed: true,
            states: Vec::new(),
            stage_states: Vec::new(),
            transforms: HashMap::new(),
            bound_textures: Vec::new(),
            scissors: Vec::new(),
            draws: Vec::new(),
            uploads: Vec::new(),
            textures_created: 0,
            textures_destroyed: 0,
            live_textures: Vec::new(),
            fail_texture_creation: false,
        }
    }
}

impl RenderContext for FakeRender {
    fn window_handle(&self) -> WindowHandle {
        self.window
    }

    fn window_rect(&self) -> Rect {
        self.window_rect
    }

    fn pretransformed_vertices(&self) -> bool {
        self.pretransformed
    }

    fn set_state(&mut self, state: RenderState) {
        self.states.push(state);
    }

    fn set_texture_stage_state(&mut self, stage: u32, state: TextureStageState) {
        self.stage_states.push((stage, state));
    }

    fn transform(&self, kind: TransformKind) -> Mat4 {
        self.transforms.get(&kind).copied().unwrap_or(Mat4::IDENTITY)
    }

    fn set_transform(&mut self, kind: TransformKind, matrix: Mat4) {
        self.transforms.insert(kind, matrix);
    }

    fn set_texture(&mut self, texture: Option<TextureId>) {
        self.bound_textures.push(texture);
    }

    fn set_scissor(&mut self, rect: [f32; 4]) {
        self.scissors.push(rect);
    }

    fn draw_primitive(&mut self, vertices: &[PrimitiveVertex], indices: &[u16]) {
        self.draws.push((vertices.to_vec(), indices.to_vec()));
    }

    fn create_texture(
        &mut self,
        name: &str,
        _width: u32,
        _height: u32,
        pixels: &[u8],
    ) -> Option<TextureId> {
        if self.fail_texture_creation {
            return None;
        }
        let texture = TextureId::new(0x100 + self.textures_created);
        self.textures_created += 1;
        self.uploads.push((name.to_string(), pixels.to_vec()));
        self.live_textures.push(texture);
        Some(texture)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures_destroyed += 1;
        self.live_textures.retain(|t| *t != texture);
    }
}

/// Scripted input manager
#[derive(Debug, Default)]
pub struct FakeInput {
    pub mouse_pos: [i32; 2],
    pub relative: [f32; 3],
    pub buttons: [bool; 4],
    pub keys_down: HashSet<ScanCode>,
    pub key_buffer: Vec<KeyBufferEntry>,
    pub chars: HashMap<ScanCode, char>,
    pub repetition: bool,
}

impl InputDevice for FakeInput {
    fn mouse_position(&self) -> [i32; 2] {
        self.mouse_pos
    }

    fn mouse_relative_position(&self) -> [f32; 3] {
        self.relative
    }

    fn mouse_buttons(&self) -> [bool; 4] {
        self.buttons
    }

    fn is_key_down(&self, code: ScanCode) -> bool {
        self.keys_down.contains(&code)
    }

    fn key_buffer(&self) -> &[KeyBufferEntry] {
        &self.key_buffer
    }

    fn scan_code_to_char(&self, code: ScanCode) -> Option<char> {
        self.chars.get(&code).copied()
    }

    fn enable_keyboard_repetition(&mut self, enable: bool) {
        self.repetition = enable;
    }
}

#[derive(Debug)]
pub struct FakeHost {
    pub window: WindowHandle,
    pub render: Option<FakeRender>,
    pub input: Option<FakeInput>,
    pub delta_ms: f32,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            window: TEST_WINDOW,
            render: Some(FakeRender::default()),
            input: Some(FakeInput::default()),
            delta_ms: 16.0,
        }
    }
}

impl HostContext for FakeHost {
    type Render = FakeRender;
    type Input = FakeInput;

    fn main_window(&self) -> WindowHandle {
        self.window
    }

    fn render_context(&mut self) -> Option<&mut FakeRender> {
        self.render.as_mut()
    }

    fn input(&mut self) -> Option<&mut FakeInput> {
        self.input.as_mut()
    }

    fn last_delta_time_ms(&self) -> f32 {
        self.delta_ms
    }
}

/// Window system keeping hooks and cursor calls in memory
#[derive(Debug)]
pub struct FakeWindows {
    pub hooks: Vec<WindowHandle>,
    pub subclassed: Vec<WindowHandle>,
    pub installs: usize,
    pub fail_install: bool,
    pub cursors: Vec<Option<OsCursor>>,
    pub cursor_pos: Option<[i32; 2]>,
    pub client_origin: [i32; 2],
    /// Screen origins of windows other than the main one
    pub child_origins: HashMap<WindowHandle, [i32; 2]>,
    pub foreground: WindowHandle,
    pub sinks: Vec<Arc<MessageSink>>,
}

impl Default for FakeWindows {
    fn default() -> Self {
        Self {
            hooks: Vec::new(),
            subclassed: Vec::new(),
            installs: 0,
            fail_install: false,
            cursors: Vec::new(),
            cursor_pos: None,
            client_origin: [0, 0],
            child_origins: HashMap::new(),
            foreground: TEST_WINDOW,
            sinks: Vec::new(),
        }
    }
}

impl WindowSystem for FakeWindows {
    fn is_window(&self, hwnd: WindowHandle) -> bool {
        !hwnd.is_null()
    }

    fn install_message_hook(
        &mut self,
        hwnd: WindowHandle,
        sink: Arc<MessageSink>,
    ) -> Result<(), String> {
        if self.fail_install {
            return Err("SetWindowsHookEx failed".to_string());
        }
        self.installs += 1;
        self.hooks.push(hwnd);
        self.sinks.push(sink);
        Ok(())
    }

    fn uninstall_message_hook(&mut self, hwnd: WindowHandle) -> Result<(), String> {
        self.hooks.retain(|h| *h != hwnd);
        Ok(())
    }

    fn install_subclass(&mut self, hwnd: WindowHandle, sink: Arc<MessageSink>) -> Result<(), String> {
        if self.fail_install {
            return Err("SetWindowLongPtr failed".to_string());
        }
        self.installs += 1;
        self.subclassed.push(hwnd);
        self.sinks.push(sink);
        Ok(())
    }

    fn uninstall_subclass(&mut self, hwnd: WindowHandle) -> Result<(), String> {
        self.subclassed.retain(|h| *h != hwnd);
        Ok(())
    }

    fn foreground_window(&self) -> WindowHandle {
        self.foreground
    }

    fn set_cursor(&mut self, cursor: Option<OsCursor>) {
        self.cursors.push(cursor);
    }

    fn client_to_screen(&self, hwnd: WindowHandle, point: [i32; 2]) -> Option<[i32; 2]> {
        let origin = self.child_origins.get(&hwnd).unwrap_or(&self.client_origin);
        Some([point[0] + origin[0], point[1] + origin[1]])
    }

    fn set_cursor_pos(&mut self, pos: [i32; 2]) {
        self.cursor_pos = Some(pos);
    }
}

/// Input event as received by [`RecordingUi`]
#[derive(Clone, Debug, PartialEq)]
pub enum UiCall {
    MousePos([f32; 2]),
    MouseButton(MouseButton, bool),
    MouseWheel([f32; 2]),
    Key(Key, bool),
    Char(char),
    Utf16(u16),
    Focus(bool),
}

/// UI backend recording the events it is fed
///
/// Key events only change `keys_down` on the next `new_frame`, like the
/// real library's input queue.
#[derive(Debug)]
pub struct RecordingUi {
    pub calls: Vec<UiCall>,
    pub keys_down: HashSet<Key>,
    pending_keys: Vec<(Key, bool)>,
    pub cursor: Option<MouseCursor>,
    pub draw_cursor: bool,
    pub config_flags: ConfigFlags,
    pub backend_flags: BackendFlags,
    pub backend_name: Option<String>,
    pub want_capture_mouse: bool,
    pub want_capture_keyboard: bool,
    pub want_set_mouse_pos: bool,
    pub mouse_pos: [f32; 2],
    pub display_size: [f32; 2],
    pub delta_time: f32,
    pub atlas: Option<FontAtlasImage>,
    pub font_texture: TextureId,
    pub draw_data: DrawData,
    pub new_frames: usize,
    pub renders: usize,
}

impl Default for RecordingUi {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            keys_down: HashSet::new(),
            pending_keys: Vec::new(),
            cursor: Some(MouseCursor::Arrow),
            draw_cursor: false,
            config_flags: ConfigFlags::empty(),
            backend_flags: BackendFlags::empty(),
            backend_name: None,
            want_capture_mouse: false,
            want_capture_keyboard: false,
            want_set_mouse_pos: false,
            mouse_pos: [0.0, 0.0],
            display_size: [0.0, 0.0],
            delta_time: 0.0,
            atlas: None,
            font_texture: TextureId::null(),
            draw_data: DrawData::default(),
            new_frames: 0,
            renders: 0,
        }
    }
}

impl RecordingUi {
    pub fn count(&self, pred: impl Fn(&UiCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl UiBackend for RecordingUi {
    fn new_frame(&mut self) {
        for (key, down) in self.pending_keys.drain(..) {
            if down {
                self.keys_down.insert(key);
            } else {
                self.keys_down.remove(&key);
            }
        }
        self.new_frames += 1;
    }

    fn render(&mut self) -> &DrawData {
        self.renders += 1;
        &self.draw_data
    }

    fn add_key_event(&mut self, key: Key, down: bool) {
        self.pending_keys.push((key, down));
        self.calls.push(UiCall::Key(key, down));
    }

    fn add_input_character(&mut self, character: char) {
        self.calls.push(UiCall::Char(character));
    }

    fn add_input_character_utf16(&mut self, unit: u16) {
        self.calls.push(UiCall::Utf16(unit));
    }

    fn add_mouse_pos_event(&mut self, pos: [f32; 2]) {
        self.calls.push(UiCall::MousePos(pos));
    }

    fn add_mouse_button_event(&mut self, button: MouseButton, down: bool) {
        self.calls.push(UiCall::MouseButton(button, down));
    }

    fn add_mouse_wheel_event(&mut self, wheel: [f32; 2]) {
        self.calls.push(UiCall::MouseWheel(wheel));
    }

    fn add_focus_event(&mut self, focused: bool) {
        self.calls.push(UiCall::Focus(focused));
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    fn mouse_cursor(&self) -> Option<MouseCursor> {
        self.cursor
    }

    fn mouse_draw_cursor(&self) -> bool {
        self.draw_cursor
    }

    fn config_flags(&self) -> ConfigFlags {
        self.config_flags
    }

    fn backend_flags(&self) -> BackendFlags {
        self.backend_flags
    }

    fn set_backend_flags(&mut self, flags: BackendFlags) {
        self.backend_flags = flags;
    }

    fn set_backend_name(&mut self, name: Option<&str>) {
        self.backend_name = name.map(str::to_string);
    }

    fn want_capture_mouse(&self) -> bool {
        self.want_capture_mouse
    }

    fn want_capture_keyboard(&self) -> bool {
        self.want_capture_keyboard
    }

    fn want_set_mouse_pos(&self) -> bool {
        self.want_set_mouse_pos
    }

    fn mouse_pos(&self) -> [f32; 2] {
        self.mouse_pos
    }

    fn set_display_size(&mut self, size: [f32; 2]) {
        self.display_size = size;
    }

    fn set_delta_time(&mut self, seconds: f32) {
        self.delta_time = seconds;
    }

    fn font_atlas_rgba32(&mut self) -> Option<FontAtlasImage> {
        self.atlas.clone()
    }

    fn set_font_texture_id(&mut self, id: TextureId) {
        self.font_texture = id;
    }
}

/// Provider handing out [`RecordingUi`] contexts
#[derive(Debug)]
pub struct FakeProvider {
    pub version: Option<u32>,
    pub contexts_created: usize,
    pub fail_create: bool,
    pub last_config: Option<UiContextConfig>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            version: Some(19205),
            contexts_created: 0,
            fail_create: false,
            last_config: None,
        }
    }
}

impl UiProvider for FakeProvider {
    type Ui = RecordingUi;

    fn api_version(&self) -> Option<u32> {
        self.version
    }

    fn create_context(&mut self, config: &UiContextConfig) -> InitResult<RecordingUi> {
        if self.fail_create {
            return Err(InitError::BackendAllocation("context creation failed".to_string()));
        }
        self.contexts_created += 1;
        self.last_config = Some(config.clone());
        Ok(RecordingUi {
            config_flags: config.config_flags,
            atlas: Some(FontAtlasImage {
                width: 1,
                height: 1,
                pixels: vec![255; 4],
            }),
            ..Default::default()
        })
    }
}
