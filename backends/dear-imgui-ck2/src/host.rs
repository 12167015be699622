//! Host engine capabilities
//!
//! Engine revisions differ in how the render context, input manager and time
//! manager are reached, but the bridge only needs a handful of primitives
//! from each. Every revision provides one [`HostContext`] implementation and
//! the rest of the crate stays version-agnostic.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::color::ColorOrder;
use crate::draw::TextureId;
use crate::keys::ScanCode;

/// Native window handle (`HWND`)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Window rectangle in pixels
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Whether a client-space point lies inside a rect of this size
    pub fn contains_client_point(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }
}

/// Polygon fill mode
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FillMode {
    Point = 1,
    Wireframe = 2,
    Solid = 3,
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CullMode {
    None = 1,
    Clockwise = 2,
    CounterClockwise = 3,
}

/// Blend factor for source or destination color
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero = 1,
    One = 2,
    SrcColor = 3,
    InvSrcColor = 4,
    SrcAlpha = 5,
    InvSrcAlpha = 6,
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShadeMode {
    Flat = 1,
    Gouraud = 2,
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureAddress {
    Wrap = 1,
    Mirror = 2,
    Clamp = 3,
    Border = 4,
}

/// Fixed-function texture/color combine
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureBlend {
    Decal = 1,
    Modulate = 2,
    DecalAlpha = 3,
    ModulateAlpha = 4,
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest = 1,
    Linear = 2,
}

/// Render-pipeline state the bridge sets
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RenderState {
    FillMode(FillMode),
    CullMode(CullMode),
    /// Texture coordinate wrapping flags for stage 0
    Wrap0(u32),
    SrcBlend(BlendFactor),
    DestBlend(BlendFactor),
    AlphaBlendEnable(bool),
    ZWriteEnable(bool),
    ZEnable(bool),
    ShadeMode(ShadeMode),
    SpecularEnable(bool),
}

/// Per-stage texture state the bridge sets
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureStageState {
    Address(TextureAddress),
    TextureMapBlend(TextureBlend),
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
    /// Color/alpha stage blend modulating texture by diffuse
    StageBlend,
    TextureTransformFlags(u32),
    TexCoordIndex(u32),
}

/// Transform slots of the host pipeline
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransformKind {
    World,
    View,
    Projection,
}

/// One vertex of the host's primitive batch
///
/// `position` is homogeneous `(x, y, z, w)`; `color` is in the host's native
/// order (see [`RenderContext::native_color_order`]).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PrimitiveVertex {
    pub position: [f32; 4],
    pub color: u32,
    pub uv: [f32; 2],
}

/// Render-context primitives consumed by the bridge
pub trait RenderContext {
    /// Window the context renders into
    fn window_handle(&self) -> WindowHandle;

    /// Client rectangle of the render window
    fn window_rect(&self) -> Rect;

    /// Packed color order of primitive vertices
    fn native_color_order(&self) -> ColorOrder {
        ColorOrder::Bgra
    }

    /// Whether vertex positions are screen-space (no transform applied)
    ///
    /// Hosts that run the 2D batch through their 3D pipeline return false and
    /// receive an orthographic projection plus identity world/view.
    fn pretransformed_vertices(&self) -> bool {
        true
    }

    fn set_state(&mut self, state: RenderState);

    fn set_texture_stage_state(&mut self, stage: u32, state: TextureStageState);

    fn transform(&self, kind: TransformKind) -> Mat4;

    fn set_transform(&mut self, kind: TransformKind, matrix: Mat4);

    /// Bind a texture to stage 0, `None` for untextured
    fn set_texture(&mut self, texture: Option<TextureId>);

    /// Restrict drawing to a framebuffer rectangle `[min_x, min_y, max_x, max_y]`
    fn set_scissor(&mut self, _rect: [f32; 4]) {}

    /// Draw an indexed triangle list
    fn draw_primitive(&mut self, vertices: &[PrimitiveVertex], indices: &[u16]);

    /// Create a 32bpp texture and upload `pixels` (host color order)
    fn create_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Option<TextureId>;

    fn destroy_texture(&mut self, texture: TextureId);
}

/// One entry of the polled keyboard buffer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyBufferEntry {
    pub code: ScanCode,
    pub pressed: bool,
}

/// Input-manager primitives consumed by the bridge
pub trait InputDevice {
    /// Mouse position in client coordinates
    fn mouse_position(&self) -> [i32; 2];

    /// Relative mouse motion `(dx, dy, wheel)` since the previous poll
    fn mouse_relative_position(&self) -> [f32; 3];

    /// Left, right, middle and extra button state
    fn mouse_buttons(&self) -> [bool; 4];

    fn is_key_down(&self, code: ScanCode) -> bool;

    /// Key transitions recorded during the last input cycle
    fn key_buffer(&self) -> &[KeyBufferEntry];

    /// Character produced by `code` under the active keyboard layout
    fn scan_code_to_char(&self, code: ScanCode) -> Option<char>;

    fn enable_keyboard_repetition(&mut self, enable: bool);
}

/// Access to one engine instance
pub trait HostContext {
    type Render: RenderContext;
    type Input: InputDevice;

    /// Main application window
    fn main_window(&self) -> WindowHandle;

    /// Player render context, `None` before the device exists
    fn render_context(&mut self) -> Option<&mut Self::Render>;

    fn input(&mut self) -> Option<&mut Self::Input>;

    /// Duration of the last engine frame in milliseconds
    fn last_delta_time_ms(&self) -> f32;
}
