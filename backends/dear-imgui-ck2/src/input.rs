//! Input translation for the CK2 backend
//!
//! Turns engine input-manager polling state and queued window messages into
//! UI library input events. Everything emitted here is queued by the UI
//! library and applied on its next `new_frame`, so one tick always produces
//! a consistent snapshot.

use crate::cursor::CursorSettings;
use crate::host::{InputDevice, Rect};
use crate::keys::{MODIFIERS, ScanCode, scan_code_to_key};
use crate::message::InputEvent;
use crate::ui::{ConfigFlags, Key, MOUSE_POS_ABSENT, MouseButton, UiBackend};
use crate::window::WindowSystem;

/// Symmetric keys whose release the OS may swallow while the twin is held
const RELEASE_WORKAROUND_KEYS: [(Key, ScanCode); 4] = [
    (Key::LeftShift, ScanCode::LSHIFT),
    (Key::RightShift, ScanCode::RSHIFT),
    (Key::LeftSuper, ScanCode::LWIN),
    (Key::RightSuper, ScanCode::RWIN),
];

const WHEEL_DELTA: f32 = 120.0;

/// Per-session input translation state
#[derive(Debug, Default)]
pub struct InputTranslator {
    mouse_buttons: [bool; 4],
    /// Left/right state of each modifier pair, in `MODIFIERS` order
    modifier_sides: [[bool; 2]; 4],
    modifier_combined: [bool; 4],
    focused: Option<bool>,
    mouse_tracked: bool,
    last_cursor: Option<CursorSettings>,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether queued messages have placed the mouse inside the window
    #[inline]
    pub fn mouse_tracked(&self) -> bool {
        self.mouse_tracked
    }

    /// Poll the engine input manager once
    ///
    /// `using_ime` suppresses layout-translated characters while an IME
    /// composition owns text input.
    pub fn process_polled<U, I>(&mut self, ui: &mut U, input: &I, window_rect: Rect, using_ime: bool)
    where
        U: UiBackend + ?Sized,
        I: InputDevice + ?Sized,
    {
        let [x, y] = input.mouse_position();
        if window_rect.contains_client_point(x, y) {
            ui.add_mouse_pos_event([x as f32, y as f32]);
        } else {
            ui.add_mouse_pos_event(MOUSE_POS_ABSENT);
        }

        let [_, _, wheel] = input.mouse_relative_position();
        if wheel != 0.0 {
            ui.add_mouse_wheel_event([0.0, wheel / WHEEL_DELTA]);
        }

        let buttons = input.mouse_buttons();
        for (i, (&down, button)) in buttons.iter().zip(MouseButton::POLLED).enumerate() {
            if down != self.mouse_buttons[i] {
                ui.add_mouse_button_event(button, down);
                self.mouse_buttons[i] = down;
            }
        }

        let mut released = Vec::new();
        for entry in input.key_buffer() {
            let Some(key) = scan_code_to_key(entry.code) else {
                continue;
            };
            ui.add_key_event(key, entry.pressed);
            ui.set_key_event_native_data(key, -1, entry.code.0 as i32);
            if !entry.pressed {
                released.push(key);
            }

            if entry.pressed && !using_ime {
                if let Some(c) = input.scan_code_to_char(entry.code) {
                    if !c.is_control() {
                        ui.add_input_character(c);
                    }
                }
            }
        }

        for (pair, modifier) in MODIFIERS.iter().enumerate() {
            self.modifier_sides[pair] = [
                input.is_key_down(modifier.left.0),
                input.is_key_down(modifier.right.0),
            ];
            self.sync_combined_modifier(ui, pair);
        }

        for (key, code) in RELEASE_WORKAROUND_KEYS {
            if ui.is_key_down(key) && !input.is_key_down(code) && !released.contains(&key) {
                ui.add_key_event(key, false);
            }
        }
    }

    /// Apply events queued by the message interceptor
    ///
    /// Returns true when the OS asked for a cursor refresh.
    pub fn apply_queued<U, E>(&mut self, ui: &mut U, events: E) -> bool
    where
        U: UiBackend + ?Sized,
        E: IntoIterator<Item = InputEvent>,
    {
        let mut cursor_requested = false;
        for event in events {
            match event {
                InputEvent::MousePos(pos) => {
                    self.mouse_tracked = pos != MOUSE_POS_ABSENT;
                    ui.add_mouse_pos_event(pos);
                }
                InputEvent::MouseButton(button, down) => ui.add_mouse_button_event(button, down),
                InputEvent::MouseWheel(wheel) => ui.add_mouse_wheel_event(wheel),
                InputEvent::Key {
                    key,
                    down,
                    native_keycode,
                    native_scancode,
                } => {
                    ui.add_key_event(key, down);
                    ui.set_key_event_native_data(key, native_keycode, native_scancode);
                    self.track_modifier_key(ui, key, down);
                }
                InputEvent::Char(c) => {
                    if !c.is_control() {
                        ui.add_input_character(c);
                    }
                }
                InputEvent::Utf16(unit) => {
                    if unit >= 0x20 && unit != 0x7F {
                        ui.add_input_character_utf16(unit);
                    }
                }
                InputEvent::Focus(focused) => {
                    self.focused = Some(focused);
                    ui.add_focus_event(focused);
                }
                InputEvent::UpdateCursor => cursor_requested = true,
            }
        }
        cursor_requested
    }

    /// Report focus changes of the target window
    pub fn update_focus<U: UiBackend + ?Sized>(&mut self, ui: &mut U, focused: bool) {
        if self.focused != Some(focused) {
            self.focused = Some(focused);
            ui.add_focus_event(focused);
        }
    }

    /// Apply the UI's cursor request to the OS cursor
    ///
    /// Skipped entirely when the UI disabled cursor changes. `force` bypasses
    /// the cache, e.g. after the OS reset the cursor itself.
    pub fn update_mouse_cursor<U, W>(&mut self, ui: &U, windows: &mut W, force: bool)
    where
        U: UiBackend + ?Sized,
        W: WindowSystem + ?Sized,
    {
        if ui.config_flags().contains(ConfigFlags::NO_MOUSE_CURSOR_CHANGE) {
            return;
        }
        let settings = CursorSettings {
            cursor: ui.mouse_cursor(),
            draw_cursor: ui.mouse_draw_cursor(),
        };
        if force || self.last_cursor != Some(settings) {
            settings.apply(windows);
            self.last_cursor = Some(settings);
        }
    }

    fn track_modifier_key<U: UiBackend + ?Sized>(&mut self, ui: &mut U, key: Key, down: bool) {
        for (pair, modifier) in MODIFIERS.iter().enumerate() {
            let side = if modifier.left.1 == key {
                0
            } else if modifier.right.1 == key {
                1
            } else {
                continue;
            };
            self.modifier_sides[pair][side] = down;
            self.sync_combined_modifier(ui, pair);
        }
    }

    fn sync_combined_modifier<U: UiBackend + ?Sized>(&mut self, ui: &mut U, pair: usize) {
        let down = self.modifier_sides[pair][0] || self.modifier_sides[pair][1];
        if down != self.modifier_combined[pair] {
            ui.add_key_event(MODIFIERS[pair].combined, down);
            self.modifier_combined[pair] = down;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::OsCursor;
    use crate::host::KeyBufferEntry;
    use crate::test_util::{FakeInput, FakeWindows, RecordingUi, UiCall};
    use crate::ui::MouseCursor;
    use pretty_assertions::assert_eq;

    const RECT: Rect = Rect::new(0, 0, 640, 480);

    #[test]
    fn test_mouse_sentinel() {
        let mut ui = RecordingUi::default();
        let mut input = FakeInput::default();
        input.mouse_pos = [-1, -1];
        let mut translator = InputTranslator::new();
        translator.process_polled(&mut ui, &input, RECT, false);

        assert_eq!(ui.calls, vec![UiCall::MousePos(MOUSE_POS_ABSENT)]);
    }

    #[test]
    fn test_mouse_buttons_are_edge_triggered() {
        let mut ui = RecordingUi::default();
        let mut input = FakeInput::default();
        input.mouse_pos = [10, 20];
        input.buttons = [true, false, false, true];
        input.relative = [3.0, 4.0, -240.0];
        let mut translator = InputTranslator::new();

        translator.process_polled(&mut ui, &input, RECT, false);
        assert_eq!(
            ui.calls,
            vec![
                UiCall::MousePos([10.0, 20.0]),
                UiCall::MouseWheel([0.0, -2.0]),
                UiCall::MouseButton(MouseButton::Left, true),
                UiCall::MouseButton(MouseButton::Extra1, true),
            ]
        );

        ui.calls.clear();
        input.relative = [0.0; 3];
        translator.process_polled(&mut ui, &input, RECT, false);
        assert_eq!(ui.calls, vec![UiCall::MousePos([10.0, 20.0])]);
    }

    #[test]
    fn test_keys_and_characters() {
        let mut ui = RecordingUi::default();
        let mut input = FakeInput::default();
        input.key_buffer = vec![
            KeyBufferEntry {
                code: ScanCode::A,
                pressed: true,
            },
            KeyBufferEntry {
                code: ScanCode(0x54),
                pressed: true,
            },
            KeyBufferEntry {
                code: ScanCode::BACK,
                pressed: true,
            },
        ];
        input.chars.insert(ScanCode::A, 'a');
        input.chars.insert(ScanCode::BACK, '\u{8}');
        let mut translator = InputTranslator::new();

        translator.process_polled(&mut ui, &input, RECT, false);
        let keys: Vec<_> = ui.calls.iter().filter(|c| !matches!(c, UiCall::MousePos(_))).cloned().collect();
        assert_eq!(
            keys,
            vec![
                UiCall::Key(Key::A, true),
                UiCall::Char('a'),
                UiCall::Key(Key::Backspace, true),
            ]
        );

        ui.calls.clear();
        translator.process_polled(&mut ui, &input, RECT, true);
        assert!(!ui.calls.iter().any(|c| matches!(c, UiCall::Char(_))));
    }

    #[test]
    fn test_combined_modifier_from_polling() {
        let mut ui = RecordingUi::default();
        let mut input = FakeInput::default();
        input.keys_down.insert(ScanCode::LSHIFT);
        input.keys_down.insert(ScanCode::RSHIFT);
        let mut translator = InputTranslator::new();

        translator.process_polled(&mut ui, &input, RECT, false);
        assert_eq!(ui.count(|c| *c == UiCall::Key(Key::ModShift, true)), 1);

        ui.calls.clear();
        input.keys_down.remove(&ScanCode::LSHIFT);
        translator.process_polled(&mut ui, &input, RECT, false);
        assert_eq!(ui.count(|c| matches!(c, UiCall::Key(Key::ModShift, _))), 0);

        input.keys_down.remove(&ScanCode::RSHIFT);
        translator.process_polled(&mut ui, &input, RECT, false);
        assert_eq!(ui.count(|c| *c == UiCall::Key(Key::ModShift, false)), 1);
    }

    #[test]
    fn test_shift_release_synthesis() {
        let mut ui = RecordingUi::default();
        ui.keys_down.insert(Key::LeftShift);
        let input = FakeInput::default();
        let mut translator = InputTranslator::new();

        translator.process_polled(&mut ui, &input, RECT, false);
        assert_eq!(ui.count(|c| *c == UiCall::Key(Key::LeftShift, false)), 1);
        assert_eq!(ui.count(|c| *c == UiCall::Key(Key::LeftShift, true)), 0);
    }

    #[test]
    fn test_no_duplicate_release() {
        let mut ui = RecordingUi::default();
        ui.keys_down.insert(Key::RightSuper);
        let mut input = FakeInput::default();
        input.key_buffer = vec![KeyBufferEntry {
            code: ScanCode::RWIN,
            pressed: false,
        }];
        let mut translator = InputTranslator::new();

        translator.process_polled(&mut ui, &input, RECT, false);
        assert_eq!(ui.count(|c| *c == UiCall::Key(Key::RightSuper, false)), 1);
    }

    #[test]
    fn test_apply_queued() {
        let mut ui = RecordingUi::default();
        let mut translator = InputTranslator::new();
        let requested = translator.apply_queued(
            &mut ui,
            [
                InputEvent::MousePos([5.0, 6.0]),
                InputEvent::Key {
                    key: Key::RightCtrl,
                    down: true,
                    native_keycode: 0x11,
                    native_scancode: 0x1D,
                },
                InputEvent::Utf16(0x0D),
                InputEvent::Utf16(0xD83D),
                InputEvent::Char('\u{7F}'),
                InputEvent::Focus(false),
                InputEvent::UpdateCursor,
            ],
        );
        assert!(requested);
        assert!(translator.mouse_tracked());
        assert_eq!(
            ui.calls,
            vec![
                UiCall::MousePos([5.0, 6.0]),
                UiCall::Key(Key::RightCtrl, true),
                UiCall::Key(Key::ModCtrl, true),
                UiCall::Utf16(0xD83D),
                UiCall::Focus(false),
            ]
        );

        translator.apply_queued(&mut ui, [InputEvent::MousePos(MOUSE_POS_ABSENT)]);
        assert!(!translator.mouse_tracked());
    }

    #[test]
    fn test_focus_reported_on_change() {
        let mut ui = RecordingUi::default();
        let mut translator = InputTranslator::new();
        translator.update_focus(&mut ui, true);
        translator.update_focus(&mut ui, true);
        translator.update_focus(&mut ui, false);
        assert_eq!(ui.calls, vec![UiCall::Focus(true), UiCall::Focus(false)]);
    }

    #[test]
    fn test_cursor_update() {
        let mut ui = RecordingUi::default();
        let mut windows = FakeWindows::default();
        let mut translator = InputTranslator::new();

        ui.cursor = Some(MouseCursor::TextInput);
        translator.update_mouse_cursor(&ui, &mut windows, false);
        translator.update_mouse_cursor(&ui, &mut windows, false);
        assert_eq!(windows.cursors, vec![Some(OsCursor::IBEAM)]);

        translator.update_mouse_cursor(&ui, &mut windows, true);
        ui.draw_cursor = true;
        translator.update_mouse_cursor(&ui, &mut windows, false);
        assert_eq!(
            windows.cursors,
            vec![Some(OsCursor::IBEAM), Some(OsCursor::IBEAM), None]
        );

        ui.config_flags = ConfigFlags::NO_MOUSE_CURSOR_CHANGE;
        ui.cursor = Some(MouseCursor::Hand);
        ui.draw_cursor = false;
        translator.update_mouse_cursor(&ui, &mut windows, true);
        assert_eq!(windows.cursors.len(), 3);
    }
}
