//! Error types for the CK2 backend
//!
//! Only initialization can fail. Per-frame rendering and input translation
//! never surface errors: degenerate frames are skipped and unmapped input is
//! ignored.

use thiserror::Error;

use crate::plugin::HostErrorCode;

/// Errors raised while bringing the overlay up (engine init or device reset)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// The host did not provide a usable window handle
    #[error("Invalid window handle")]
    InvalidWindow,

    /// Installing the message interceptor failed
    #[error("Failed to install message hook: {0}")]
    HookInstall(String),

    /// Removing the message interceptor failed
    #[error("Failed to uninstall message hook: {0}")]
    HookUninstall(String),

    /// The backend context could not be allocated
    #[error("Failed to allocate backend: {0}")]
    BackendAllocation(String),

    /// The UI library function table could not be obtained
    #[error("UI library function table is unavailable")]
    FunctionTableUnavailable,

    /// The UI library function table has an unexpected version
    #[error("UI library version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// The font atlas texture could not be created
    #[error("Failed to create font texture: {0}")]
    FontTexture(String),

    /// A device-level transition was requested before the UI context exists
    #[error("UI context has not been created")]
    NotCreated,
}

impl InitError {
    /// Error code reported back through the host's plugin error channel
    pub fn host_code(&self) -> HostErrorCode {
        match self {
            InitError::InvalidWindow => HostErrorCode::InvalidParameter,
            InitError::HookInstall(_) | InitError::HookUninstall(_) => {
                HostErrorCode::InvalidOperation
            }
            InitError::BackendAllocation(_) | InitError::FontTexture(_) => {
                HostErrorCode::OutOfMemory
            }
            InitError::FunctionTableUnavailable
            | InitError::VersionMismatch { .. }
            | InitError::NotCreated => HostErrorCode::NotInitialized,
        }
    }
}

/// Result type for initialization operations
pub type InitResult<T> = Result<T, InitError>;

/// Collapse an initialization result into the code returned to the host
pub fn host_result<T>(result: &InitResult<T>) -> HostErrorCode {
    match result {
        Ok(_) => HostErrorCode::Ok,
        Err(err) => err.host_code(),
    }
}
