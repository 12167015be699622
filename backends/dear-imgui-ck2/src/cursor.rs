//! Cursor management for the CK2 backend
//!
//! Maps UI cursor requests onto stock Win32 cursor resources and caches the
//! last applied settings so the OS cursor is only touched on change.

use crate::ui::MouseCursor;
use crate::window::WindowSystem;

/// Stock OS cursor resource (`IDC_*` identifier)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OsCursor(pub u16);

#[allow(missing_docs)]
impl OsCursor {
    pub const ARROW: OsCursor = OsCursor(32512);
    pub const IBEAM: OsCursor = OsCursor(32513);
    pub const SIZENWSE: OsCursor = OsCursor(32642);
    pub const SIZENESW: OsCursor = OsCursor(32643);
    pub const SIZEWE: OsCursor = OsCursor(32644);
    pub const SIZENS: OsCursor = OsCursor(32645);
    pub const SIZEALL: OsCursor = OsCursor(32646);
    pub const NO: OsCursor = OsCursor(32648);
    pub const HAND: OsCursor = OsCursor(32649);
}

/// Cursor settings cache to avoid unnecessary cursor changes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CursorSettings {
    pub cursor: Option<MouseCursor>,
    pub draw_cursor: bool,
}

impl CursorSettings {
    /// Apply cursor settings through the window system
    ///
    /// A hidden cursor, or one the UI draws itself, hides the OS cursor.
    pub fn apply<W: WindowSystem + ?Sized>(&self, windows: &mut W) {
        match self.cursor {
            Some(mouse_cursor) if !self.draw_cursor => {
                windows.set_cursor(Some(to_os_cursor(mouse_cursor)));
            }
            _ => windows.set_cursor(None),
        }
    }
}

/// Convert a UI cursor to the OS cursor resource
pub fn to_os_cursor(cursor: MouseCursor) -> OsCursor {
    match cursor {
        MouseCursor::Arrow => OsCursor::ARROW,
        MouseCursor::TextInput => OsCursor::IBEAM,
        MouseCursor::ResizeAll => OsCursor::SIZEALL,
        MouseCursor::ResizeNS => OsCursor::SIZENS,
        MouseCursor::ResizeEW => OsCursor::SIZEWE,
        MouseCursor::ResizeNESW => OsCursor::SIZENESW,
        MouseCursor::ResizeNWSE => OsCursor::SIZENWSE,
        MouseCursor::Hand => OsCursor::HAND,
        MouseCursor::NotAllowed => OsCursor::NO,
    }
}
