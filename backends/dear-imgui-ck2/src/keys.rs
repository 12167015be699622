//! Key code tables
//!
//! The engine's input manager reports DirectInput scan codes. The window
//! procedure path sees Win32 virtual-key codes instead. Both are mapped onto
//! the UI library's [`Key`] through fixed tables; anything not listed is
//! ignored.

use crate::ui::Key;

/// Engine keyboard scan code (DirectInput numbering)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScanCode(pub u32);

#[allow(missing_docs)]
impl ScanCode {
    pub const ESCAPE: ScanCode = ScanCode(0x01);
    pub const KEY_1: ScanCode = ScanCode(0x02);
    pub const KEY_2: ScanCode = ScanCode(0x03);
    pub const KEY_3: ScanCode = ScanCode(0x04);
    pub const KEY_4: ScanCode = ScanCode(0x05);
    pub const KEY_5: ScanCode = ScanCode(0x06);
    pub const KEY_6: ScanCode = ScanCode(0x07);
    pub const KEY_7: ScanCode = ScanCode(0x08);
    pub const KEY_8: ScanCode = ScanCode(0x09);
    pub const KEY_9: ScanCode = ScanCode(0x0A);
    pub const KEY_0: ScanCode = ScanCode(0x0B);
    pub const MINUS: ScanCode = ScanCode(0x0C);
    pub const EQUALS: ScanCode = ScanCode(0x0D);
    pub const BACK: ScanCode = ScanCode(0x0E);
    pub const TAB: ScanCode = ScanCode(0x0F);
    pub const Q: ScanCode = ScanCode(0x10);
    pub const W: ScanCode = ScanCode(0x11);
    pub const E: ScanCode = ScanCode(0x12);
    pub const R: ScanCode = ScanCode(0x13);
    pub const T: ScanCode = ScanCode(0x14);
    pub const Y: ScanCode = ScanCode(0x15);
    pub const U: ScanCode = ScanCode(0x16);
    pub const I: ScanCode = ScanCode(0x17);
    pub const O: ScanCode = ScanCode(0x18);
    pub const P: ScanCode = ScanCode(0x19);
    pub const LBRACKET: ScanCode = ScanCode(0x1A);
    pub const RBRACKET: ScanCode = ScanCode(0x1B);
    pub const RETURN: ScanCode = ScanCode(0x1C);
    pub const LCONTROL: ScanCode = ScanCode(0x1D);
    pub const A: ScanCode = ScanCode(0x1E);
    pub const S: ScanCode = ScanCode(0x1F);
    pub const D: ScanCode = ScanCode(0x20);
    pub const F: ScanCode = ScanCode(0x21);
    pub const G: ScanCode = ScanCode(0x22);
    pub const H: ScanCode = ScanCode(0x23);
    pub const J: ScanCode = ScanCode(0x24);
    pub const K: ScanCode = ScanCode(0x25);
    pub const L: ScanCode = ScanCode(0x26);
    pub const SEMICOLON: ScanCode = ScanCode(0x27);
    pub const APOSTROPHE: ScanCode = ScanCode(0x28);
    pub const GRAVE: ScanCode = ScanCode(0x29);
    pub const LSHIFT: ScanCode = ScanCode(0x2A);
    pub const BACKSLASH: ScanCode = ScanCode(0x2B);
    pub const Z: ScanCode = ScanCode(0x2C);
    pub const X: ScanCode = ScanCode(0x2D);
    pub const C: ScanCode = ScanCode(0x2E);
    pub const V: ScanCode = ScanCode(0x2F);
    pub const B: ScanCode = ScanCode(0x30);
    pub const N: ScanCode = ScanCode(0x31);
    pub const M: ScanCode = ScanCode(0x32);
    pub const COMMA: ScanCode = ScanCode(0x33);
    pub const PERIOD: ScanCode = ScanCode(0x34);
    pub const SLASH: ScanCode = ScanCode(0x35);
    pub const RSHIFT: ScanCode = ScanCode(0x36);
    pub const MULTIPLY: ScanCode = ScanCode(0x37);
    pub const LMENU: ScanCode = ScanCode(0x38);
    pub const SPACE: ScanCode = ScanCode(0x39);
    pub const CAPITAL: ScanCode = ScanCode(0x3A);
    pub const F1: ScanCode = ScanCode(0x3B);
    pub const F2: ScanCode = ScanCode(0x3C);
    pub const F3: ScanCode = ScanCode(0x3D);
    pub const F4: ScanCode = ScanCode(0x3E);
    pub const F5: ScanCode = ScanCode(0x3F);
    pub const F6: ScanCode = ScanCode(0x40);
    pub const F7: ScanCode = ScanCode(0x41);
    pub const F8: ScanCode = ScanCode(0x42);
    pub const F9: ScanCode = ScanCode(0x43);
    pub const F10: ScanCode = ScanCode(0x44);
    pub const NUMLOCK: ScanCode = ScanCode(0x45);
    pub const SCROLL: ScanCode = ScanCode(0x46);
    pub const NUMPAD7: ScanCode = ScanCode(0x47);
    pub const NUMPAD8: ScanCode = ScanCode(0x48);
    pub const NUMPAD9: ScanCode = ScanCode(0x49);
    pub const SUBTRACT: ScanCode = ScanCode(0x4A);
    pub const NUMPAD4: ScanCode = ScanCode(0x4B);
    pub const NUMPAD5: ScanCode = ScanCode(0x4C);
    pub const NUMPAD6: ScanCode = ScanCode(0x4D);
    pub const ADD: ScanCode = ScanCode(0x4E);
    pub const NUMPAD1: ScanCode = ScanCode(0x4F);
    pub const NUMPAD2: ScanCode = ScanCode(0x50);
    pub const NUMPAD3: ScanCode = ScanCode(0x51);
    pub const NUMPAD0: ScanCode = ScanCode(0x52);
    pub const DECIMAL: ScanCode = ScanCode(0x53);
    pub const F11: ScanCode = ScanCode(0x57);
    pub const F12: ScanCode = ScanCode(0x58);
    pub const NUMPADEQUALS: ScanCode = ScanCode(0x8D);
    pub const NUMPADENTER: ScanCode = ScanCode(0x9C);
    pub const RCONTROL: ScanCode = ScanCode(0x9D);
    pub const DIVIDE: ScanCode = ScanCode(0xB5);
    pub const RMENU: ScanCode = ScanCode(0xB8);
    pub const HOME: ScanCode = ScanCode(0xC7);
    pub const UP: ScanCode = ScanCode(0xC8);
    pub const PRIOR: ScanCode = ScanCode(0xC9);
    pub const LEFT: ScanCode = ScanCode(0xCB);
    pub const RIGHT: ScanCode = ScanCode(0xCD);
    pub const END: ScanCode = ScanCode(0xCF);
    pub const DOWN: ScanCode = ScanCode(0xD0);
    pub const NEXT: ScanCode = ScanCode(0xD1);
    pub const INSERT: ScanCode = ScanCode(0xD2);
    pub const DELETE: ScanCode = ScanCode(0xD3);
    pub const LWIN: ScanCode = ScanCode(0xDB);
    pub const RWIN: ScanCode = ScanCode(0xDC);
    pub const APPS: ScanCode = ScanCode(0xDD);
}

/// Map an engine scan code to a UI key
pub fn scan_code_to_key(code: ScanCode) -> Option<Key> {
    let key = match code {
        ScanCode::TAB => Key::Tab,
        ScanCode::LEFT => Key::LeftArrow,
        ScanCode::RIGHT => Key::RightArrow,
        ScanCode::UP => Key::UpArrow,
        ScanCode::DOWN => Key::DownArrow,
        ScanCode::PRIOR => Key::PageUp,
        ScanCode::NEXT => Key::PageDown,
        ScanCode::HOME => Key::Home,
        ScanCode::END => Key::End,
        ScanCode::INSERT => Key::Insert,
        ScanCode::DELETE => Key::Delete,
        ScanCode::BACK => Key::Backspace,
        ScanCode::SPACE => Key::Space,
        ScanCode::RETURN => Key::Enter,
        ScanCode::ESCAPE => Key::Escape,
        ScanCode::APOSTROPHE => Key::Apostrophe,
        ScanCode::COMMA => Key::Comma,
        ScanCode::MINUS => Key::Minus,
        ScanCode::PERIOD => Key::Period,
        ScanCode::SLASH => Key::Slash,
        ScanCode::SEMICOLON => Key::Semicolon,
        ScanCode::EQUALS => Key::Equal,
        ScanCode::LBRACKET => Key::LeftBracket,
        ScanCode::BACKSLASH => Key::Backslash,
        ScanCode::RBRACKET => Key::RightBracket,
        ScanCode::GRAVE => Key::GraveAccent,
        ScanCode::CAPITAL => Key::CapsLock,
        ScanCode::SCROLL => Key::ScrollLock,
        ScanCode::NUMLOCK => Key::NumLock,
        ScanCode::NUMPAD0 => Key::Keypad0,
        ScanCode::NUMPAD1 => Key::Keypad1,
        ScanCode::NUMPAD2 => Key::Keypad2,
        ScanCode::NUMPAD3 => Key::Keypad3,
        ScanCode::NUMPAD4 => Key::Keypad4,
        ScanCode::NUMPAD5 => Key::Keypad5,
        ScanCode::NUMPAD6 => Key::Keypad6,
        ScanCode::NUMPAD7 => Key::Keypad7,
        ScanCode::NUMPAD8 => Key::Keypad8,
        ScanCode::NUMPAD9 => Key::Keypad9,
        ScanCode::DECIMAL => Key::KeypadDecimal,
        ScanCode::DIVIDE => Key::KeypadDivide,
        ScanCode::MULTIPLY => Key::KeypadMultiply,
        ScanCode::SUBTRACT => Key::KeypadSubtract,
        ScanCode::ADD => Key::KeypadAdd,
        ScanCode::NUMPADENTER => Key::KeypadEnter,
        ScanCode::NUMPADEQUALS => Key::KeypadEqual,
        ScanCode::LCONTROL => Key::LeftCtrl,
        ScanCode::LSHIFT => Key::LeftShift,
        ScanCode::LMENU => Key::LeftAlt,
        ScanCode::LWIN => Key::LeftSuper,
        ScanCode::RCONTROL => Key::RightCtrl,
        ScanCode::RSHIFT => Key::RightShift,
        ScanCode::RMENU => Key::RightAlt,
        ScanCode::RWIN => Key::RightSuper,
        ScanCode::APPS => Key::Menu,
        ScanCode::KEY_0 => Key::Key0,
        ScanCode::KEY_1 => Key::Key1,
        ScanCode::KEY_2 => Key::Key2,
        ScanCode::KEY_3 => Key::Key3,
        ScanCode::KEY_4 => Key::Key4,
        ScanCode::KEY_5 => Key::Key5,
        ScanCode::KEY_6 => Key::Key6,
        ScanCode::KEY_7 => Key::Key7,
        ScanCode::KEY_8 => Key::Key8,
        ScanCode::KEY_9 => Key::Key9,
        ScanCode::A => Key::A,
        ScanCode::B => Key::B,
        ScanCode::C => Key::C,
        ScanCode::D => Key::D,
        ScanCode::E => Key::E,
        ScanCode::F => Key::F,
        ScanCode::G => Key::G,
        ScanCode::H => Key::H,
        ScanCode::I => Key::I,
        ScanCode::J => Key::J,
        ScanCode::K => Key::K,
        ScanCode::L => Key::L,
        ScanCode::M => Key::M,
        ScanCode::N => Key::N,
        ScanCode::O => Key::O,
        ScanCode::P => Key::P,
        ScanCode::Q => Key::Q,
        ScanCode::R => Key::R,
        ScanCode::S => Key::S,
        ScanCode::T => Key::T,
        ScanCode::U => Key::U,
        ScanCode::V => Key::V,
        ScanCode::W => Key::W,
        ScanCode::X => Key::X,
        ScanCode::Y => Key::Y,
        ScanCode::Z => Key::Z,
        ScanCode::F1 => Key::F1,
        ScanCode::F2 => Key::F2,
        ScanCode::F3 => Key::F3,
        ScanCode::F4 => Key::F4,
        ScanCode::F5 => Key::F5,
        ScanCode::F6 => Key::F6,
        ScanCode::F7 => Key::F7,
        ScanCode::F8 => Key::F8,
        ScanCode::F9 => Key::F9,
        ScanCode::F10 => Key::F10,
        ScanCode::F11 => Key::F11,
        ScanCode::F12 => Key::F12,
        _ => return None,
    };
    Some(key)
}

/// Modifier families tracked with a left/right pair and a combined key
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ModifierPair {
    pub left: (ScanCode, Key),
    pub right: (ScanCode, Key),
    pub combined: Key,
}

/// Ctrl, Shift, Alt and Super in submission order
pub const MODIFIERS: [ModifierPair; 4] = [
    ModifierPair {
        left: (ScanCode::LCONTROL, Key::LeftCtrl),
        right: (ScanCode::RCONTROL, Key::RightCtrl),
        combined: Key::ModCtrl,
    },
    ModifierPair {
        left: (ScanCode::LSHIFT, Key::LeftShift),
        right: (ScanCode::RSHIFT, Key::RightShift),
        combined: Key::ModShift,
    },
    ModifierPair {
        left: (ScanCode::LMENU, Key::LeftAlt),
        right: (ScanCode::RMENU, Key::RightAlt),
        combined: Key::ModAlt,
    },
    ModifierPair {
        left: (ScanCode::LWIN, Key::LeftSuper),
        right: (ScanCode::RWIN, Key::RightSuper),
        combined: Key::ModSuper,
    },
];

/// Win32 virtual-key code
pub type VirtualKey = u32;

pub const VK_BACK: VirtualKey = 0x08;
pub const VK_TAB: VirtualKey = 0x09;
pub const VK_RETURN: VirtualKey = 0x0D;
pub const VK_SHIFT: VirtualKey = 0x10;
pub const VK_CONTROL: VirtualKey = 0x11;
pub const VK_MENU: VirtualKey = 0x12;
pub const VK_PAUSE: VirtualKey = 0x13;
pub const VK_CAPITAL: VirtualKey = 0x14;
pub const VK_ESCAPE: VirtualKey = 0x1B;
pub const VK_SPACE: VirtualKey = 0x20;
pub const VK_PRIOR: VirtualKey = 0x21;
pub const VK_NEXT: VirtualKey = 0x22;
pub const VK_END: VirtualKey = 0x23;
pub const VK_HOME: VirtualKey = 0x24;
pub const VK_LEFT: VirtualKey = 0x25;
pub const VK_UP: VirtualKey = 0x26;
pub const VK_RIGHT: VirtualKey = 0x27;
pub const VK_DOWN: VirtualKey = 0x28;
pub const VK_SNAPSHOT: VirtualKey = 0x2C;
pub const VK_INSERT: VirtualKey = 0x2D;
pub const VK_DELETE: VirtualKey = 0x2E;
pub const VK_LWIN: VirtualKey = 0x5B;
pub const VK_RWIN: VirtualKey = 0x5C;
pub const VK_APPS: VirtualKey = 0x5D;
pub const VK_NUMPAD0: VirtualKey = 0x60;
pub const VK_MULTIPLY: VirtualKey = 0x6A;
pub const VK_ADD: VirtualKey = 0x6B;
pub const VK_SUBTRACT: VirtualKey = 0x6D;
pub const VK_DECIMAL: VirtualKey = 0x6E;
pub const VK_DIVIDE: VirtualKey = 0x6F;
pub const VK_F1: VirtualKey = 0x70;
pub const VK_NUMLOCK: VirtualKey = 0x90;
pub const VK_SCROLL: VirtualKey = 0x91;
pub const VK_LSHIFT: VirtualKey = 0xA0;
pub const VK_RSHIFT: VirtualKey = 0xA1;
pub const VK_LCONTROL: VirtualKey = 0xA2;
pub const VK_RCONTROL: VirtualKey = 0xA3;
pub const VK_LMENU: VirtualKey = 0xA4;
pub const VK_RMENU: VirtualKey = 0xA5;
pub const VK_OEM_1: VirtualKey = 0xBA;
pub const VK_OEM_PLUS: VirtualKey = 0xBB;
pub const VK_OEM_COMMA: VirtualKey = 0xBC;
pub const VK_OEM_MINUS: VirtualKey = 0xBD;
pub const VK_OEM_PERIOD: VirtualKey = 0xBE;
pub const VK_OEM_2: VirtualKey = 0xBF;
pub const VK_OEM_3: VirtualKey = 0xC0;
pub const VK_OEM_4: VirtualKey = 0xDB;
pub const VK_OEM_5: VirtualKey = 0xDC;
pub const VK_OEM_6: VirtualKey = 0xDD;
pub const VK_OEM_7: VirtualKey = 0xDE;

/// Map a Win32 virtual key to a UI key
///
/// `extended` is bit 24 of the key message `lParam`; `scan_code` is bits
/// 16..24. They disambiguate the generic Shift/Ctrl/Alt codes and keypad
/// Enter.
pub fn virtual_key_to_key(vk: VirtualKey, scan_code: u32, extended: bool) -> Option<Key> {
    const DIGITS: [Key; 10] = [
        Key::Key0,
        Key::Key1,
        Key::Key2,
        Key::Key3,
        Key::Key4,
        Key::Key5,
        Key::Key6,
        Key::Key7,
        Key::Key8,
        Key::Key9,
    ];
    const KEYPAD: [Key; 10] = [
        Key::Keypad0,
        Key::Keypad1,
        Key::Keypad2,
        Key::Keypad3,
        Key::Keypad4,
        Key::Keypad5,
        Key::Keypad6,
        Key::Keypad7,
        Key::Keypad8,
        Key::Keypad9,
    ];
    const LETTERS: [Key; 26] = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
    ];
    const FUNCTION: [Key; 12] = [
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
    ];

    let key = match vk {
        0x30..=0x39 => DIGITS[(vk - 0x30) as usize],
        0x41..=0x5A => LETTERS[(vk - 0x41) as usize],
        0x60..=0x69 => KEYPAD[(vk - VK_NUMPAD0) as usize],
        0x70..=0x7B => FUNCTION[(vk - VK_F1) as usize],
        VK_TAB => Key::Tab,
        VK_LEFT => Key::LeftArrow,
        VK_RIGHT => Key::RightArrow,
        VK_UP => Key::UpArrow,
        VK_DOWN => Key::DownArrow,
        VK_PRIOR => Key::PageUp,
        VK_NEXT => Key::PageDown,
        VK_HOME => Key::Home,
        VK_END => Key::End,
        VK_INSERT => Key::Insert,
        VK_DELETE => Key::Delete,
        VK_BACK => Key::Backspace,
        VK_SPACE => Key::Space,
        VK_RETURN if extended => Key::KeypadEnter,
        VK_RETURN => Key::Enter,
        VK_ESCAPE => Key::Escape,
        VK_OEM_7 => Key::Apostrophe,
        VK_OEM_COMMA => Key::Comma,
        VK_OEM_MINUS => Key::Minus,
        VK_OEM_PERIOD => Key::Period,
        VK_OEM_2 => Key::Slash,
        VK_OEM_1 => Key::Semicolon,
        VK_OEM_PLUS => Key::Equal,
        VK_OEM_4 => Key::LeftBracket,
        VK_OEM_5 => Key::Backslash,
        VK_OEM_6 => Key::RightBracket,
        VK_OEM_3 => Key::GraveAccent,
        VK_CAPITAL => Key::CapsLock,
        VK_SCROLL => Key::ScrollLock,
        VK_NUMLOCK => Key::NumLock,
        VK_SNAPSHOT => Key::PrintScreen,
        VK_PAUSE => Key::Pause,
        VK_DECIMAL => Key::KeypadDecimal,
        VK_DIVIDE => Key::KeypadDivide,
        VK_MULTIPLY => Key::KeypadMultiply,
        VK_SUBTRACT => Key::KeypadSubtract,
        VK_ADD => Key::KeypadAdd,
        VK_SHIFT if scan_code == ScanCode::RSHIFT.0 => Key::RightShift,
        VK_SHIFT | VK_LSHIFT => Key::LeftShift,
        VK_RSHIFT => Key::RightShift,
        VK_CONTROL if extended => Key::RightCtrl,
        VK_CONTROL | VK_LCONTROL => Key::LeftCtrl,
        VK_RCONTROL => Key::RightCtrl,
        VK_MENU if extended => Key::RightAlt,
        VK_MENU | VK_LMENU => Key::LeftAlt,
        VK_RMENU => Key::RightAlt,
        VK_LWIN => Key::LeftSuper,
        VK_RWIN => Key::RightSuper,
        VK_APPS => Key::Menu,
        _ => return None,
    };
    Some(key)
}
