//! OS window-system capabilities
//!
//! [`WindowSystem`] is what the interceptor and the input translator need
//! from the OS: hook installation, focus and cursor control. The Win32
//! implementation lives in [`win32`]; tests use in-memory fakes.

use std::sync::Arc;

use crate::cursor::OsCursor;
use crate::host::WindowHandle;
use crate::message::MessageSink;

/// Window-system operations used by the backend
///
/// Hook operations report failures as the OS error text; the interceptor
/// wraps them into [`InitError`](crate::error::InitError).
pub trait WindowSystem {
    fn is_window(&self, hwnd: WindowHandle) -> bool;

    /// Route messages retrieved for `hwnd`'s thread through `sink`
    fn install_message_hook(
        &mut self,
        hwnd: WindowHandle,
        sink: Arc<MessageSink>,
    ) -> Result<(), String>;

    fn uninstall_message_hook(&mut self, hwnd: WindowHandle) -> Result<(), String>;

    /// Replace `hwnd`'s window procedure, chaining unclaimed messages to the original
    fn install_subclass(&mut self, hwnd: WindowHandle, sink: Arc<MessageSink>)
    -> Result<(), String>;

    /// Restore the window procedure saved by `install_subclass`
    fn uninstall_subclass(&mut self, hwnd: WindowHandle) -> Result<(), String>;

    fn foreground_window(&self) -> WindowHandle;

    /// Show the given stock cursor, or hide the cursor
    fn set_cursor(&mut self, cursor: Option<OsCursor>);

    fn client_to_screen(&self, hwnd: WindowHandle, point: [i32; 2]) -> Option<[i32; 2]>;

    fn set_cursor_pos(&mut self, pos: [i32; 2]);
}

/// Take the state saved in `slot` for `hwnd`
///
/// State saved for another window stays in place and is reported as an error.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn take_window_slot<T>(
    slot: &mut Option<T>,
    hwnd: WindowHandle,
    owner: impl Fn(&T) -> WindowHandle,
) -> Result<Option<T>, String> {
    match slot.as_ref() {
        Some(saved) if owner(saved) != hwnd => {
            Err(format!("window {:?} is not the subclassed window", hwnd))
        }
        _ => Ok(slot.take()),
    }
}

#[cfg(target_os = "windows")]
pub mod win32 {
    //! Win32 window system via `windows-sys`

    use std::ptr;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use windows_sys::Win32::Foundation::{GetLastError, HWND, LPARAM, LRESULT, POINT, WPARAM};
    use windows_sys::Win32::Graphics::Gdi::ClientToScreen;
    use windows_sys::Win32::UI::Input::Ime::{
        GCS_RESULTSTR, ImmGetCompositionStringW, ImmGetContext, ImmReleaseContext,
    };
    use windows_sys::Win32::UI::Input::KeyboardAndMouse::{TME_LEAVE, TRACKMOUSEEVENT, TrackMouseEvent};
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        CallNextHookEx, CallWindowProcW, DefWindowProcW, GWLP_WNDPROC, GetForegroundWindow,
        GetWindowThreadProcessId, HC_ACTION, HHOOK, IsWindow, LoadCursorW, MSG, PM_REMOVE,
        SetCursor, SetCursorPos, SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx,
        WH_GETMESSAGE, WNDPROC,
    };

    use super::{WindowSystem, take_window_slot};
    use crate::cursor::OsCursor;
    use crate::host::WindowHandle;
    use crate::message::{MessageServices, MessageSink, WM_MOUSELEAVE, WM_MOUSEMOVE, WindowMessage};

    struct HookSlot {
        hook: HHOOK,
        sink: Arc<MessageSink>,
    }

    struct SubclassSlot {
        hwnd: HWND,
        original: isize,
        sink: Arc<MessageSink>,
        tracking_mouse: bool,
    }

    static MESSAGE_HOOK: Mutex<Option<HookSlot>> = parking_lot::const_mutex(None);
    static SUBCLASS: Mutex<Option<SubclassSlot>> = parking_lot::const_mutex(None);

    /// Process-wide Win32 window system
    #[derive(Copy, Clone, Debug, Default)]
    pub struct Win32WindowSystem;

    impl From<&MSG> for WindowMessage {
        fn from(msg: &MSG) -> Self {
            WindowMessage::new(WindowHandle(msg.hwnd), msg.message, msg.wParam, msg.lParam)
        }
    }

    unsafe extern "system" fn get_message_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        let slot = MESSAGE_HOOK
            .lock()
            .as_ref()
            .map(|slot| (slot.hook, Arc::clone(&slot.sink)));
        let Some((hook, sink)) = slot else {
            return unsafe { CallNextHookEx(0, code, wparam, lparam) };
        };

        if code == HC_ACTION as i32 && lparam != 0 && sink.is_alive() {
            // SAFETY: for WH_GETMESSAGE, lParam points to the retrieved MSG.
            let msg = unsafe { &mut *(lparam as *mut MSG) };
            let mut message = WindowMessage::from(&*msg);
            sink.filter_retrieved(&mut message, wparam as u32 == PM_REMOVE, &Win32WindowSystem);
            msg.message = message.message;
        }
        unsafe { CallNextHookEx(hook, code, wparam, lparam) }
    }

    unsafe extern "system" fn subclass_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        let slot = {
            let mut guard = SUBCLASS.lock();
            guard.as_mut().filter(|slot| slot.hwnd == hwnd).map(|slot| {
                let start_tracking = msg == WM_MOUSEMOVE && !slot.tracking_mouse;
                match msg {
                    WM_MOUSEMOVE => slot.tracking_mouse = true,
                    WM_MOUSELEAVE => slot.tracking_mouse = false,
                    _ => {}
                }
                (slot.original, Arc::clone(&slot.sink), start_tracking)
            })
        };
        let Some((original, sink, start_tracking)) = slot else {
            return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
        };

        if start_tracking {
            let mut track = TRACKMOUSEEVENT {
                cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
                dwFlags: TME_LEAVE,
                hwndTrack: hwnd,
                dwHoverTime: 0,
            };
            unsafe { TrackMouseEvent(&mut track) };
        }

        if sink.is_alive()
            && sink.handle_window_message(&WindowMessage::new(WindowHandle(hwnd), msg, wparam, lparam))
        {
            return 0;
        }
        // SAFETY: `original` was returned by SetWindowLong(Ptr)W for this window.
        let original: WNDPROC = unsafe { std::mem::transmute::<isize, WNDPROC>(original) };
        unsafe { CallWindowProcW(original, hwnd, msg, wparam, lparam) }
    }

    #[cfg(target_pointer_width = "64")]
    unsafe fn set_window_proc(hwnd: HWND, proc_addr: isize) -> isize {
        use windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW;
        unsafe { SetWindowLongPtrW(hwnd, GWLP_WNDPROC, proc_addr) }
    }

    #[cfg(target_pointer_width = "32")]
    unsafe fn set_window_proc(hwnd: HWND, proc_addr: isize) -> isize {
        use windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongW;
        unsafe { SetWindowLongW(hwnd, GWLP_WNDPROC, proc_addr as i32) as isize }
    }

    fn last_error(call: &str) -> String {
        format!("{call} failed (error {})", unsafe { GetLastError() })
    }

    impl WindowSystem for Win32WindowSystem {
        fn is_window(&self, hwnd: WindowHandle) -> bool {
            unsafe { IsWindow(hwnd.0) != 0 }
        }

        fn install_message_hook(
            &mut self,
            hwnd: WindowHandle,
            sink: Arc<MessageSink>,
        ) -> Result<(), String> {
            let mut slot = MESSAGE_HOOK.lock();
            if slot.is_some() {
                return Err("a message hook is already installed".into());
            }
            let thread = unsafe { GetWindowThreadProcessId(hwnd.0, ptr::null_mut()) };
            let hook = unsafe { SetWindowsHookExW(WH_GETMESSAGE, Some(get_message_proc), 0, thread) };
            if hook == 0 {
                return Err(last_error("SetWindowsHookExW"));
            }
            *slot = Some(HookSlot { hook, sink });
            Ok(())
        }

        fn uninstall_message_hook(&mut self, _hwnd: WindowHandle) -> Result<(), String> {
            let Some(slot) = MESSAGE_HOOK.lock().take() else {
                return Ok(());
            };
            if unsafe { UnhookWindowsHookEx(slot.hook) } == 0 {
                return Err(last_error("UnhookWindowsHookEx"));
            }
            Ok(())
        }

        fn install_subclass(
            &mut self,
            hwnd: WindowHandle,
            sink: Arc<MessageSink>,
        ) -> Result<(), String> {
            if SUBCLASS.lock().is_some() {
                return Err("a window is already subclassed".into());
            }
            let original = unsafe { set_window_proc(hwnd.0, subclass_proc as usize as isize) };
            if original == 0 {
                return Err(last_error("SetWindowLongPtrW"));
            }
            *SUBCLASS.lock() = Some(SubclassSlot {
                hwnd: hwnd.0,
                original,
                sink,
                tracking_mouse: false,
            });
            Ok(())
        }

        fn uninstall_subclass(&mut self, hwnd: WindowHandle) -> Result<(), String> {
            let slot = take_window_slot(&mut *SUBCLASS.lock(), hwnd, |slot| WindowHandle(slot.hwnd))?;
            let Some(slot) = slot else {
                return Ok(());
            };
            if unsafe { set_window_proc(slot.hwnd, slot.original) } == 0 {
                return Err(last_error("SetWindowLongPtrW"));
            }
            Ok(())
        }

        fn foreground_window(&self) -> WindowHandle {
            WindowHandle(unsafe { GetForegroundWindow() })
        }

        fn set_cursor(&mut self, cursor: Option<OsCursor>) {
            unsafe {
                match cursor {
                    Some(cursor) => {
                        SetCursor(LoadCursorW(0, cursor.0 as usize as *const u16));
                    }
                    None => {
                        SetCursor(0);
                    }
                }
            }
        }

        fn client_to_screen(&self, hwnd: WindowHandle, point: [i32; 2]) -> Option<[i32; 2]> {
            let mut pt = POINT {
                x: point[0],
                y: point[1],
            };
            (unsafe { ClientToScreen(hwnd.0, &mut pt) } != 0).then_some([pt.x, pt.y])
        }

        fn set_cursor_pos(&mut self, pos: [i32; 2]) {
            unsafe { SetCursorPos(pos[0], pos[1]) };
        }
    }

    impl MessageServices for Win32WindowSystem {
        fn ime_result_string(&self, hwnd: WindowHandle) -> Vec<u16> {
            let himc = unsafe { ImmGetContext(hwnd.0) };
            if himc == 0 {
                return Vec::new();
            }
            let mut units = Vec::new();
            let bytes = unsafe { ImmGetCompositionStringW(himc, GCS_RESULTSTR, ptr::null_mut(), 0) };
            if bytes > 0 {
                units.resize(bytes as usize / 2, 0u16);
                let written = unsafe {
                    ImmGetCompositionStringW(himc, GCS_RESULTSTR, units.as_mut_ptr().cast(), bytes as u32)
                };
                units.truncate(written.max(0) as usize / 2);
            }
            unsafe { ImmReleaseContext(hwnd.0, himc) };
            units
        }

        fn translate(&self, msg: &WindowMessage) {
            let raw = MSG {
                hwnd: msg.hwnd.0,
                message: msg.message,
                wParam: msg.wparam,
                lParam: msg.lparam,
                time: 0,
                pt: POINT { x: 0, y: 0 },
            };
            unsafe { TranslateMessage(&raw) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_kept_for_other_window() {
        let mut slot = Some((WindowHandle(0x10), 0xBEEF));
        let result = take_window_slot(&mut slot, WindowHandle(0x20), |saved| saved.0);
        assert!(result.is_err());
        assert_eq!(slot, Some((WindowHandle(0x10), 0xBEEF)));

        let taken = take_window_slot(&mut slot, WindowHandle(0x10), |saved| saved.0);
        assert_eq!(taken, Ok(Some((WindowHandle(0x10), 0xBEEF))));
        assert_eq!(slot, None);
        assert_eq!(take_window_slot(&mut slot, WindowHandle(0x10), |saved| saved.0), Ok(None));
    }
}
