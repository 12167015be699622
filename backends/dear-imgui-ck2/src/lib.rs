//! Virtools (CK2) backend for Dear ImGui
//!
//! This crate hosts an immediate-mode UI overlay inside a Virtools player
//! process. It is both the platform backend (window messages and engine input
//! into UI input events) and the renderer backend (UI draw lists through the
//! engine's 2D primitive API), plus the manager object that ties both to the
//! engine's lifecycle callbacks.
//!
//! # Features
//!
//! - **Three input paths**: engine input polling with IME text from a message
//!   hook, a message-retrieval hook, or a subclassed window procedure
//! - **Input capture**: messages the UI wants are hidden from the engine
//! - **Device reset safe**: font texture and hooks follow the render device
//! - **Pluggable UI library**: Dear ImGui via `dear-imgui-rs` (feature
//!   `dear-imgui`) or any [`UiProvider`]
//!
//! # Example
//!
//! ```rust,ignore
//! use dear_imgui_ck2::{ImGuiProvider, OverlayConfig, OverlayManager};
//! use dear_imgui_ck2::window::win32::Win32WindowSystem;
//!
//! let mut overlay = OverlayManager::new(
//!     ImGuiProvider::new(),
//!     Win32WindowSystem,
//!     OverlayConfig::default(),
//! );
//!
//! // Engine callbacks:
//! overlay.on_ck_init()?;
//! overlay.on_ck_post_reset(&mut host)?;
//! overlay.add_to_frame(|ui| ui.draw(|ui| { ui.text("Hello"); }));
//! // per frame: overlay.pre_process(&mut host); overlay.on_post_sprite_render(&mut host);
//! overlay.pre_clear_all(&mut host)?;
//! overlay.on_ck_end(&mut host)?;
//! ```

mod backend;
pub mod color;
mod cursor;
pub mod draw;
mod error;
mod font;
pub mod host;
#[cfg(feature = "dear-imgui")]
mod imgui;
mod input;
pub mod keys;
mod lifecycle;
pub mod message;
pub mod plugin;
mod render;
pub mod state;
#[cfg(test)]
mod test_util;
pub mod ui;
pub mod window;

pub use backend::Ck2Backend;
pub use cursor::{CursorSettings, OsCursor, to_os_cursor};
pub use draw::{DrawCmd, DrawCmdParams, DrawData, DrawList, DrawVert, TextureId};
pub use error::{InitError, InitResult, host_result};
pub use font::{FONT_TEXTURE_NAME, FontTexture};
pub use host::{HostContext, InputDevice, RenderContext, WindowHandle};
#[cfg(feature = "dear-imgui")]
pub use imgui::{ImGuiProvider, ImGuiUi};
pub use input::InputTranslator;
pub use lifecycle::{
    DEFAULT_INI_FILENAME, DEFAULT_LOG_FILENAME, FrameCallback, FrameCallbackId, LifecycleState,
    OverlayConfig, OverlayManager, RenderHook,
};
pub use message::{InputSource, Interceptor, MessageSink};
pub use plugin::{HostErrorCode, plugin_info};
pub use render::RenderBridge;
pub use ui::{UiBackend, UiProvider};
pub use window::WindowSystem;
