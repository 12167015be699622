//! Lifecycle coordinator
//!
//! [`OverlayManager`] is the engine-facing manager object. The engine drives
//! it through its callbacks; the manager owns the UI context for the whole
//! engine session and a [`Ck2Backend`] for as long as the render device is
//! valid.
//!
//! ```text
//! Uninitialized --on_ck_init--> Created --on_ck_post_reset--> DeviceReady
//!       ^                          |  ^                            |
//!       +-------on_ck_end----------+  +-------pre_clear_all--------+
//! ```

use crate::backend::Ck2Backend;
use crate::error::{InitError, InitResult};
use crate::host::HostContext;
use crate::message::InputSource;
use crate::ui::{ConfigFlags, UiBackend, UiContextConfig, UiProvider};
use crate::window::WindowSystem;

/// Default settings file written by the UI library
pub const DEFAULT_INI_FILENAME: &str = "ImGui.ini";

/// Default log file written by the UI library
pub const DEFAULT_LOG_FILENAME: &str = "ImGui.log";

/// Engine render callback the finished frame is drawn from
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderHook {
    /// After the 3D scene, beneath 2D sprites
    PostRender,
    /// After 2D sprites, on top of everything
    #[default]
    PostSpriteRender,
}

/// Overlay settings
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayConfig {
    pub render_hook: RenderHook,
    pub input_source: InputSource,
    /// Initial visibility
    pub visible: bool,
    pub ini_filename: Option<String>,
    pub log_filename: Option<String>,
    /// Function table version to insist on; `None` takes whatever is offered
    pub required_api_version: Option<u32>,
    pub config_flags: ConfigFlags,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            render_hook: RenderHook::default(),
            input_source: InputSource::default(),
            visible: true,
            ini_filename: Some(DEFAULT_INI_FILENAME.to_string()),
            log_filename: Some(DEFAULT_LOG_FILENAME.to_string()),
            required_api_version: None,
            config_flags: ConfigFlags::empty(),
        }
    }
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_render_hook(mut self, hook: RenderHook) -> Self {
        self.render_hook = hook;
        self
    }

    pub fn with_input_source(mut self, source: InputSource) -> Self {
        self.input_source = source;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_ini_filename(mut self, filename: Option<impl Into<String>>) -> Self {
        self.ini_filename = filename.map(Into::into);
        self
    }

    pub fn with_log_filename(mut self, filename: Option<impl Into<String>>) -> Self {
        self.log_filename = filename.map(Into::into);
        self
    }

    pub fn with_required_api_version(mut self, version: u32) -> Self {
        self.required_api_version = Some(version);
        self
    }

    pub fn with_config_flags(mut self, flags: ConfigFlags) -> Self {
        self.config_flags = flags;
        self
    }

    fn context_config(&self) -> UiContextConfig {
        UiContextConfig {
            ini_filename: self.ini_filename.clone(),
            log_filename: self.log_filename.clone(),
            config_flags: self.config_flags,
        }
    }
}

/// Where the overlay is in its life
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// No UI context
    Uninitialized,
    /// UI context exists, no device resources or hooks
    Created,
    /// Backend is up and frames are produced
    DeviceReady,
    /// Engine teardown in progress
    ShuttingDown,
}

/// Handle returned by [`OverlayManager::add_to_frame`]
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameCallbackId(u64);

/// Per-frame UI building callback
pub type FrameCallback<U> = Box<dyn FnMut(&mut U)>;

/// Engine manager driving the overlay
pub struct OverlayManager<P: UiProvider, W: WindowSystem> {
    config: OverlayConfig,
    provider: P,
    windows: W,
    state: LifecycleState,
    ui: Option<P::Ui>,
    backend: Option<Ck2Backend>,
    visible: bool,
    render_hook: RenderHook,
    /// A UI frame was begun and not yet rendered
    frame_open: bool,
    callbacks: Vec<(FrameCallbackId, FrameCallback<P::Ui>)>,
    next_callback: u64,
}

impl<P: UiProvider, W: WindowSystem> OverlayManager<P, W> {
    pub fn new(provider: P, windows: W, config: OverlayConfig) -> Self {
        Self {
            visible: config.visible,
            render_hook: config.render_hook,
            config,
            provider,
            windows,
            state: LifecycleState::Uninitialized,
            ui: None,
            backend: None,
            frame_open: false,
            callbacks: Vec::new(),
            next_callback: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Whether the backend is up and frames are being produced
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state == LifecycleState::DeviceReady
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn render_hook(&self) -> RenderHook {
        self.render_hook
    }

    pub fn ui(&self) -> Option<&P::Ui> {
        self.ui.as_ref()
    }

    pub fn ui_mut(&mut self) -> Option<&mut P::Ui> {
        self.ui.as_mut()
    }

    pub fn backend(&self) -> Option<&Ck2Backend> {
        self.backend.as_ref()
    }

    pub fn windows(&self) -> &W {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut W {
        &mut self.windows
    }

    /// Show or hide the overlay, effective from the next engine frame
    pub fn show(&mut self, visible: bool) {
        if self.visible != visible {
            tracing::debug!(target: "dear-imgui-ck2", "Overlay visibility: {}", visible);
        }
        self.visible = visible;
    }

    /// Draw above sprites (`true`) or beneath them (`false`)
    pub fn draw_on_top_most(&mut self, top_most: bool) {
        self.render_hook = if top_most {
            RenderHook::PostSpriteRender
        } else {
            RenderHook::PostRender
        };
    }

    /// Register a callback that builds UI every frame
    pub fn add_to_frame(&mut self, callback: impl FnMut(&mut P::Ui) + 'static) -> FrameCallbackId {
        let id = FrameCallbackId(self.next_callback);
        self.next_callback += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Unregister a frame callback; returns whether it was registered
    pub fn remove_from_frame(&mut self, id: FrameCallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cid, _)| *cid != id);
        self.callbacks.len() != before
    }

    /// Engine init: obtain the function table and create the UI context
    pub fn on_ck_init(&mut self) -> InitResult<()> {
        if self.state != LifecycleState::Uninitialized {
            return Ok(());
        }

        let found = self
            .provider
            .api_version()
            .ok_or(InitError::FunctionTableUnavailable)?;
        if let Some(expected) = self.config.required_api_version.filter(|&v| v != found) {
            tracing::error!(
                target: "dear-imgui-ck2",
                "UI library version {} does not match required {}",
                found,
                expected
            );
            return Err(InitError::VersionMismatch { expected, found });
        }

        let ui = self.provider.create_context(&self.config.context_config())?;
        self.ui = Some(ui);
        self.state = LifecycleState::Created;
        tracing::info!(target: "dear-imgui-ck2", "UI context created (api {})", found);
        Ok(())
    }

    /// Device ready: bring up the backend, once per device lifetime
    pub fn on_ck_post_reset<H: HostContext + ?Sized>(&mut self, host: &mut H) -> InitResult<()> {
        match self.state {
            LifecycleState::DeviceReady => return Ok(()),
            LifecycleState::Uninitialized | LifecycleState::ShuttingDown => {
                return Err(InitError::NotCreated);
            }
            LifecycleState::Created => {}
        }
        let ui = self.ui.as_mut().ok_or(InitError::NotCreated)?;

        match Ck2Backend::init(ui, host, &mut self.windows, self.config.input_source) {
            Ok(backend) => {
                self.backend = Some(backend);
                self.frame_open = false;
                self.state = LifecycleState::DeviceReady;
                tracing::info!(target: "dear-imgui-ck2", "Overlay backend ready");
                Ok(())
            }
            Err(err) => {
                tracing::error!(target: "dear-imgui-ck2", "Overlay backend init failed: {}", err);
                Err(err)
            }
        }
    }

    /// Device about to go away: release device resources and hooks
    ///
    /// The UI context survives. A no-op unless the backend is up.
    pub fn pre_clear_all<H: HostContext + ?Sized>(&mut self, host: &mut H) -> InitResult<()> {
        if self.state != LifecycleState::DeviceReady {
            return Ok(());
        }
        self.frame_open = false;
        self.state = LifecycleState::Created;

        let (Some(ui), Some(backend)) = (self.ui.as_mut(), self.backend.take()) else {
            return Ok(());
        };
        let result = backend.shutdown(ui, host, &mut self.windows);
        match &result {
            Ok(()) => tracing::info!(target: "dear-imgui-ck2", "Overlay backend released"),
            Err(err) => tracing::warn!(target: "dear-imgui-ck2", "Overlay backend release: {}", err),
        }
        result
    }

    /// Engine end: tear everything down and destroy the UI context
    pub fn on_ck_end<H: HostContext + ?Sized>(&mut self, host: &mut H) -> InitResult<()> {
        if self.state == LifecycleState::Uninitialized {
            return Ok(());
        }
        let released = self.pre_clear_all(host);

        self.state = LifecycleState::ShuttingDown;
        self.callbacks.clear();
        self.ui = None;
        self.state = LifecycleState::Uninitialized;
        tracing::info!(target: "dear-imgui-ck2", "UI context destroyed");
        released
    }

    /// Start of an engine frame: begin a UI frame when visible
    pub fn pre_process<H: HostContext + ?Sized>(&mut self, host: &mut H) {
        if self.state != LifecycleState::DeviceReady {
            return;
        }
        let (Some(ui), Some(backend)) = (self.ui.as_mut(), self.backend.as_mut()) else {
            return;
        };

        if !self.visible {
            backend.discard_input();
            self.frame_open = false;
            return;
        }

        backend.new_frame(ui, host, &mut self.windows);
        ui.new_frame();
        self.frame_open = true;
    }

    /// Engine post-render callback
    pub fn on_post_render<H: HostContext + ?Sized>(&mut self, host: &mut H) {
        self.render_frame(host, RenderHook::PostRender);
    }

    /// Engine post-sprite-render callback
    pub fn on_post_sprite_render<H: HostContext + ?Sized>(&mut self, host: &mut H) {
        self.render_frame(host, RenderHook::PostSpriteRender);
    }

    fn render_frame<H: HostContext + ?Sized>(&mut self, host: &mut H, hook: RenderHook) {
        if hook != self.render_hook || !self.frame_open {
            return;
        }
        self.frame_open = false;
        let (Some(ui), Some(backend)) = (self.ui.as_mut(), self.backend.as_mut()) else {
            return;
        };

        for (_, callback) in self.callbacks.iter_mut() {
            callback(ui);
        }

        let draw_data = ui.render();
        backend.render_draw_data(host, draw_data);
        backend.update_capture(ui);
    }
}

impl<P: UiProvider, W: WindowSystem> std::fmt::Debug for OverlayManager<P, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayManager")
            .field("state", &self.state)
            .field("visible", &self.visible)
            .field("render_hook", &self.render_hook)
            .field("frame_open", &self.frame_open)
            .field("callbacks", &self.callbacks.len())
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
