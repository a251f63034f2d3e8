// Vkbd HID Usage Codes
// Keyboard/keypad, consumer and generic-desktop system usages plus host LED bits

// Keyboard/keypad page

/// Highest usage representable in the keyboard report bitmap
pub const HID_LAST_KEY: u8 = 0xDD;
pub const HID_KEYBOARD_FIRST_MODIFIER: u8 = 0xE0;
pub const HID_KEYBOARD_LAST_MODIFIER: u8 = 0xE7;

pub const HID_KEYBOARD_A: u8 = 0x04;
pub const HID_KEYBOARD_B: u8 = 0x05;
pub const HID_KEYBOARD_C: u8 = 0x06;
pub const HID_KEYBOARD_Z: u8 = 0x1D;
pub const HID_KEYBOARD_1: u8 = 0x1E;
pub const HID_KEYBOARD_0: u8 = 0x27;
pub const HID_KEYBOARD_ENTER: u8 = 0x28;
pub const HID_KEYBOARD_ESCAPE: u8 = 0x29;
pub const HID_KEYBOARD_TAB: u8 = 0x2B;
pub const HID_KEYBOARD_SPACEBAR: u8 = 0x2C;
pub const HID_KEYBOARD_CAPS_LOCK: u8 = 0x39;
pub const HID_KEYBOARD_F1: u8 = 0x3A;
pub const HID_KEYBOARD_F12: u8 = 0x45;
pub const HID_KEYPAD_NUM_LOCK_AND_CLEAR: u8 = 0x53;
pub const HID_KEYBOARD_LOCKING_NUM_LOCK: u8 = 0x83;
pub const HID_KEYBOARD_INTERNATIONAL1: u8 = 0x87;
pub const HID_KEYPAD_HEXADECIMAL: u8 = 0xDD;

pub const HID_KEYBOARD_LEFT_CONTROL: u8 = 0xE0;
pub const HID_KEYBOARD_LEFT_SHIFT: u8 = 0xE1;
pub const HID_KEYBOARD_LEFT_ALT: u8 = 0xE2;
pub const HID_KEYBOARD_LEFT_GUI: u8 = 0xE3;
pub const HID_KEYBOARD_RIGHT_CONTROL: u8 = 0xE4;
pub const HID_KEYBOARD_RIGHT_SHIFT: u8 = 0xE5;
pub const HID_KEYBOARD_RIGHT_ALT: u8 = 0xE6;
pub const HID_KEYBOARD_RIGHT_GUI: u8 = 0xE7;

// Host LED state bits reported back to the keyboard

pub const LED_NUM_LOCK: u8 = 0x01;
pub const LED_CAPS_LOCK: u8 = 0x02;
pub const LED_SCROLL_LOCK: u8 = 0x04;
pub const LED_COMPOSE: u8 = 0x08;
pub const LED_KANA: u8 = 0x10;

// Consumer page

pub const CONSUMER_PLAY_PAUSE: u16 = 0xCD;
pub const CONSUMER_MUTE: u16 = 0xE2;
pub const CONSUMER_VOLUME_INCREMENT: u16 = 0xE9;
pub const CONSUMER_VOLUME_DECREMENT: u16 = 0xEA;
pub const CONSUMER_SCAN_NEXT_TRACK: u16 = 0xB5;
pub const CONSUMER_SCAN_PREVIOUS_TRACK: u16 = 0xB6;

// Generic desktop page, system controls

pub const SYSTEM_POWER_DOWN: u8 = 0x81;
pub const SYSTEM_SLEEP: u8 = 0x82;
pub const SYSTEM_WAKE_UP: u8 = 0x83;

/// Returns true for codes in the modifier range
pub fn is_modifier(code: u8) -> bool {
    (HID_KEYBOARD_FIRST_MODIFIER..=HID_KEYBOARD_LAST_MODIFIER).contains(&code)
}

/// Returns true for either num lock usage
pub fn is_num_lock(code: u8) -> bool {
    code == HID_KEYPAD_NUM_LOCK_AND_CLEAR || code == HID_KEYBOARD_LOCKING_NUM_LOCK
}

/// Display names of the eight modifier bits, bit 0 first
pub const MODIFIER_NAMES: [&str; 8] = [
    "lctrl", "lshift", "lalt", "lgui", "rctrl", "rshift", "ralt", "rgui",
];

/// Display names of keyboard usages 0x00..=0x87.
///
/// Anything above this range is rendered as `(other)`.
pub const KEY_NAMES: [&str; 136] = [
    // 0x00
    "NO_EVENT", "ERROR_ROLLOVER", "POST_FAIL", "ERROR_UNDEFINED", "a", "b", "c", "d",
    // 0x08
    "e", "f", "g", "h", "i", "j", "k", "l",
    // 0x10
    "m", "n", "o", "p", "q", "r", "s", "t",
    // 0x18
    "u", "v", "w", "x", "y", "z", "1/!", "2/@",
    // 0x20
    "3/#", "4/$", "5/%", "6/^", "7/&", "8/*", "9/(", "0/)",
    // 0x28
    "enter", "esc", "del/bksp", "tab", "space", "-/_", "=/+", "[/{",
    // 0x30
    "]/}", "\\/|", "#/~", ";/:", "'/\"", "`/~", ",/<", "./>",
    // 0x38
    "//?", "capslock", "F1", "F2", "F3", "F4", "F5", "F6",
    // 0x40
    "F7", "F8", "F9", "F10", "F11", "F12", "prtscr", "scrolllock",
    // 0x48
    "pause", "ins", "home", "pgup", "del", "end", "pgdn", "r_arrow",
    // 0x50
    "l_arrow", "d_arrow", "u_arrow", "numlock", "num/", "num*", "num-", "num+",
    // 0x58
    "numenter", "num1", "num2", "num3", "num4", "num5", "num6", "num7",
    // 0x60
    "num8", "num9", "num0", "num.", "\\/|", "app", "power", "num=",
    // 0x68
    "F13", "F14", "F15", "F16", "F17", "F18", "F19", "F20",
    // 0x70
    "F21", "F22", "F23", "F24", "exec", "help", "menu", "sel",
    // 0x78
    "stop", "again", "undo", "cut", "copy", "paste", "find", "mute",
    // 0x80
    "volup", "voldn", "capslock_l", "numlock_l", "scrolllock_l", "num,", "num=", "(other)",
];

/// Display name of a keyboard usage, if it has a dedicated one
pub fn key_name(code: u8) -> Option<&'static str> {
    KEY_NAMES.get(code as usize).copied()
}
