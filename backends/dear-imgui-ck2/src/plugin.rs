//! Host plugin ABI surface
//!
//! The engine discovers managers through a plugin info table and asks each
//! manager which lifecycle callbacks it wants (a bitmask) and at which
//! priority they should run relative to other managers. The values here use
//! the engine's own numbering so an FFI shim can forward them verbatim.

use bitflags::bitflags;

/// 64-bit engine GUID split in two dwords
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Guid(pub u32, pub u32);

/// GUID under which the overlay manager registers itself
pub const IMGUI_MANAGER_GUID: Guid = Guid(0x019E_7A87, 0x095E_7972);

/// Manager display name
pub const IMGUI_MANAGER_NAME: &str = "ImGui Manager";

/// Name reported to the UI library for both platform and renderer
pub const BACKEND_NAME: &str = "imgui_impl_ck2";

/// Error codes understood by the host's plugin error channel
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HostErrorCode {
    Ok = 0,
    InvalidParameter = -1,
    InvalidOperation = -4,
    OutOfMemory = -6,
    NotInitialized = -21,
}

impl HostErrorCode {
    /// Raw integer value handed to the engine
    #[inline]
    pub fn raw(self) -> i32 {
        self as i32
    }
}

/// Kind of plugin exposed through the plugin info table
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PluginType {
    Manager,
}

/// Plugin info table entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginInfo {
    pub guid: Guid,
    pub author: &'static str,
    pub description: &'static str,
    pub summary: &'static str,
    pub extension: &'static str,
    pub plugin_type: PluginType,
    pub version: u32,
}

/// The single entry of this plugin's info table
pub fn plugin_info() -> PluginInfo {
    PluginInfo {
        guid: IMGUI_MANAGER_GUID,
        author: "Kakuty",
        description: IMGUI_MANAGER_NAME,
        summary: IMGUI_MANAGER_NAME,
        extension: "",
        plugin_type: PluginType::Manager,
        version: 0x0000_0001,
    }
}

bitflags! {
    /// Lifecycle callbacks a manager can subscribe to
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ManagerFunctions: u32 {
        const PRE_CLEAR_ALL = 0x0000_0001;
        const POST_CLEAR_ALL = 0x0000_0002;
        const PRE_PROCESS = 0x0000_0004;
        const POST_PROCESS = 0x0000_0008;
        const ON_CK_INIT = 0x0000_0100;
        const ON_CK_END = 0x0000_0200;
        const ON_CK_RESET = 0x0000_0400;
        const ON_CK_POST_RESET = 0x0000_0800;
        const ON_PRE_RENDER = 0x0010_0000;
        const ON_POST_RENDER = 0x0020_0000;
        const ON_POST_SPRITE_RENDER = 0x0040_0000;
    }
}

/// Callbacks the overlay manager needs from the engine
pub fn valid_functions_mask() -> ManagerFunctions {
    ManagerFunctions::ON_CK_INIT
        | ManagerFunctions::ON_CK_END
        | ManagerFunctions::PRE_CLEAR_ALL
        | ManagerFunctions::ON_CK_POST_RESET
        | ManagerFunctions::PRE_PROCESS
        | ManagerFunctions::ON_POST_RENDER
        | ManagerFunctions::ON_POST_SPRITE_RENDER
}

/// Call priority for a subscribed callback (higher runs earlier)
///
/// Input is gathered before other managers consume it and the overlay draws
/// after every other renderer so it always ends up on top.
pub fn function_priority(function: ManagerFunctions) -> i32 {
    if function == ManagerFunctions::PRE_PROCESS {
        10_000
    } else if function == ManagerFunctions::ON_POST_RENDER
        || function == ManagerFunctions::ON_POST_SPRITE_RENDER
    {
        -10_000
    } else {
        0
    }
}
