// Vkbd HID Report Model
// Byte-exact report records and the shared current/last-sent diffing engine

use super::usage::{is_modifier, HID_KEYBOARD_FIRST_MODIFIER};

/// Bytes in the keyboard key bitmap (one bit per usage 0x00..=0xDF)
pub const KEY_BYTES: usize = 28;
pub const KEYBOARD_REPORT_LEN: usize = 1 + KEY_BYTES;
pub const MOUSE_REPORT_LEN: usize = 5;
/// Usage slots in a consumer control report
pub const CONSUMER_SLOTS: usize = 4;
pub const CONSUMER_REPORT_LEN: usize = CONSUMER_SLOTS * 2;
pub const ABSOLUTE_MOUSE_REPORT_LEN: usize = 6;

/// A fixed-layout HID report.
///
/// Reports are stored as their wire bytes, so equality and emptiness are
/// byte-for-byte.
pub trait HidReport: Copy + PartialEq + Default {
    /// Event name the report is logged under
    const NAME: &'static str;

    /// The report exactly as it would go on the wire
    fn as_bytes(&self) -> &[u8];

    /// Returns true if every byte is zero
    fn is_empty(&self) -> bool {
        self.as_bytes().iter().all(|b| *b == 0)
    }
}

/// NKRO keyboard report: modifier byte followed by a key bitmap.
///
/// Byte 0 holds the modifiers (bit `n` is usage `0xE0 + n`); bit `n % 8` of
/// byte `1 + n / 8` is usage `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardReport {
    bytes: [u8; KEYBOARD_REPORT_LEN],
}

impl KeyboardReport {
    pub fn from_bytes(bytes: [u8; KEYBOARD_REPORT_LEN]) -> Self {
        Self { bytes }
    }

    pub fn modifiers(&self) -> u8 {
        self.bytes[0]
    }

    /// The key bitmap without the modifier byte
    pub fn keys(&self) -> &[u8] {
        &self.bytes[1..]
    }

    /// Test the bitmap bit of a usage; false beyond the bitmap
    pub fn key_bit(&self, code: u8) -> bool {
        let byte = 1 + code as usize / 8;
        byte < KEYBOARD_REPORT_LEN && self.bytes[byte] & (1 << (code % 8)) != 0
    }

    pub(crate) fn set_key_bit(&mut self, code: u8) {
        self.bytes[1 + code as usize / 8] |= 1 << (code % 8);
    }

    pub(crate) fn clear_key_bit(&mut self, code: u8) {
        self.bytes[1 + code as usize / 8] &= !(1 << (code % 8));
    }

    /// Test the modifier bit of a modifier usage (0xE0..=0xE7); false for
    /// any other code
    pub fn modifier_bit(&self, code: u8) -> bool {
        is_modifier(code) && self.bytes[0] & (1 << (code - HID_KEYBOARD_FIRST_MODIFIER)) != 0
    }

    pub(crate) fn set_modifier_bit(&mut self, code: u8) {
        self.bytes[0] |= 1 << (code - HID_KEYBOARD_FIRST_MODIFIER);
    }

    pub(crate) fn clear_modifier_bit(&mut self, code: u8) {
        self.bytes[0] &= !(1 << (code - HID_KEYBOARD_FIRST_MODIFIER));
    }

    pub(crate) fn clear(&mut self) {
        self.bytes = [0; KEYBOARD_REPORT_LEN];
    }
}

impl HidReport for KeyboardReport {
    const NAME: &'static str = "Keyboard HID report";

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Relative mouse report: buttons, x, y, vertical wheel, horizontal wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MouseReport {
    bytes: [u8; MOUSE_REPORT_LEN],
}

impl MouseReport {
    pub fn buttons(&self) -> u8 {
        self.bytes[0]
    }

    pub fn x(&self) -> i8 {
        self.bytes[1] as i8
    }

    pub fn y(&self) -> i8 {
        self.bytes[2] as i8
    }

    pub fn v_wheel(&self) -> i8 {
        self.bytes[3] as i8
    }

    pub fn h_wheel(&self) -> i8 {
        self.bytes[4] as i8
    }

    pub(crate) fn set_buttons(&mut self, buttons: u8) {
        self.bytes[0] = buttons;
    }

    pub(crate) fn set_axes(&mut self, x: i8, y: i8, v_wheel: i8, h_wheel: i8) {
        self.bytes[1] = x as u8;
        self.bytes[2] = y as u8;
        self.bytes[3] = v_wheel as u8;
        self.bytes[4] = h_wheel as u8;
    }

    pub(crate) fn clear(&mut self) {
        self.bytes = [0; MOUSE_REPORT_LEN];
    }
}

impl HidReport for MouseReport {
    const NAME: &'static str = "Mouse HID report";

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Consumer control report: little-endian 16-bit usages, 0 marks a free slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConsumerControlReport {
    bytes: [u8; CONSUMER_REPORT_LEN],
}

impl ConsumerControlReport {
    pub fn slot(&self, slot: usize) -> u16 {
        u16::from_le_bytes([self.bytes[slot * 2], self.bytes[slot * 2 + 1]])
    }

    pub fn slots(&self) -> [u16; CONSUMER_SLOTS] {
        std::array::from_fn(|i| self.slot(i))
    }

    pub(crate) fn set_slot(&mut self, slot: usize, code: u16) {
        let [lo, hi] = code.to_le_bytes();
        self.bytes[slot * 2] = lo;
        self.bytes[slot * 2 + 1] = hi;
    }

    pub(crate) fn clear(&mut self) {
        self.bytes = [0; CONSUMER_REPORT_LEN];
    }
}

impl HidReport for ConsumerControlReport {
    const NAME: &'static str = "ConsumerControl HID report";

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// System control report: one usage byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SystemControlReport {
    bytes: [u8; 1],
}

impl SystemControlReport {
    pub fn new(code: u8) -> Self {
        Self { bytes: [code] }
    }

    pub fn code(&self) -> u8 {
        self.bytes[0]
    }
}

impl HidReport for SystemControlReport {
    const NAME: &'static str = "SystemControl HID report";

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Absolute mouse report: buttons, x (u16 LE), y (u16 LE), wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AbsoluteMouseReport {
    bytes: [u8; ABSOLUTE_MOUSE_REPORT_LEN],
}

impl AbsoluteMouseReport {
    pub fn buttons(&self) -> u8 {
        self.bytes[0]
    }

    pub fn x(&self) -> u16 {
        u16::from_le_bytes([self.bytes[1], self.bytes[2]])
    }

    pub fn y(&self) -> u16 {
        u16::from_le_bytes([self.bytes[3], self.bytes[4]])
    }

    pub fn wheel(&self) -> i8 {
        self.bytes[5] as i8
    }

    pub(crate) fn set_buttons(&mut self, buttons: u8) {
        self.bytes[0] = buttons;
    }

    pub(crate) fn set_position(&mut self, x: u16, y: u16, wheel: i8) {
        self.bytes[1..3].copy_from_slice(&x.to_le_bytes());
        self.bytes[3..5].copy_from_slice(&y.to_le_bytes());
        self.bytes[5] = wheel as u8;
    }
}

impl HidReport for AbsoluteMouseReport {
    const NAME: &'static str = "SingleAbsoluteMouse HID report";

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Rule deciding when a report pair suppresses a send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPolicy {
    /// Suppress when the report equals the last-sent report
    SkipUnchanged,
    /// Suppress only when the report equals the last-sent report and is all
    /// zero; repeated non-empty reports (continuous motion) still go out
    SkipRepeatedEmpty,
}

/// Result of a diffed send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The report was emitted and is now the last-sent baseline
    Sent,
    /// Nothing was emitted; the baseline is untouched
    Unchanged,
}

impl SendOutcome {
    pub fn is_sent(self) -> bool {
        self == SendOutcome::Sent
    }
}

/// Current and last-sent instance of one report kind.
///
/// The last-sent report only changes inside [`send_with`](Self::send_with),
/// after the report has been handed to the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPair<R: HidReport> {
    current: R,
    last_sent: R,
    policy: SendPolicy,
}

impl<R: HidReport> ReportPair<R> {
    pub fn new(policy: SendPolicy) -> Self {
        Self {
            current: R::default(),
            last_sent: R::default(),
            policy,
        }
    }

    pub fn current(&self) -> &R {
        &self.current
    }

    pub(crate) fn current_mut(&mut self) -> &mut R {
        &mut self.current
    }

    pub fn last_sent(&self) -> &R {
        &self.last_sent
    }

    pub fn policy(&self) -> SendPolicy {
        self.policy
    }

    /// Returns true if the policy lets the current report through
    pub fn should_send(&self) -> bool {
        let unchanged = self.current == self.last_sent;
        match self.policy {
            SendPolicy::SkipUnchanged => !unchanged,
            SendPolicy::SkipRepeatedEmpty => !(unchanged && self.current.is_empty()),
        }
    }

    /// Emit the current report if the policy allows it, then snapshot it as
    /// the new baseline.
    pub fn send_with<F>(&mut self, emit: F) -> SendOutcome
    where
        F: FnOnce(&R),
    {
        if !self.should_send() {
            log::debug!("{} unchanged, not sent", R::NAME);
            return SendOutcome::Unchanged;
        }
        emit(&self.current);
        self.last_sent = self.current;
        SendOutcome::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::usage::*;

    #[test]
    fn test_keyboard_report_layout() {
        let mut report = KeyboardReport::default();
        report.set_key_bit(HID_KEYBOARD_A);
        report.set_modifier_bit(HID_KEYBOARD_LEFT_SHIFT);

        let bytes = report.as_bytes();
        assert_eq!(bytes.len(), KEYBOARD_REPORT_LEN);
        assert_eq!(bytes[0], 0b0000_0010);
        assert_eq!(bytes[1], 0b0001_0000);
        assert!(bytes[2..].iter().all(|b| *b == 0));

        assert!(report.key_bit(HID_KEYBOARD_A));
        assert!(report.modifier_bit(HID_KEYBOARD_LEFT_SHIFT));
        assert!(!report.key_bit(0xF0));
    }

    #[test]
    fn test_modifier_bit_rejects_non_modifiers() {
        let mut report = KeyboardReport::default();
        report.set_modifier_bit(HID_KEYBOARD_LEFT_CONTROL);
        assert!(!report.modifier_bit(0x00));
        assert!(!report.modifier_bit(HID_KEYBOARD_A));
        assert!(!report.modifier_bit(0xDF));
        assert!(!report.modifier_bit(0xE8));
        assert!(report.modifier_bit(HID_KEYBOARD_LEFT_CONTROL));
    }

    #[test]
    fn test_keyboard_last_key_fits_bitmap() {
        let mut report = KeyboardReport::default();
        report.set_key_bit(HID_LAST_KEY);
        assert_eq!(report.as_bytes()[1 + 0xDD / 8], 1 << (0xDD % 8));
        report.clear_key_bit(HID_LAST_KEY);
        assert!(report.is_empty());
    }

    #[test]
    fn test_mouse_report_signed_axes() {
        let mut report = MouseReport::default();
        report.set_axes(5, -3, -128, 127);
        assert_eq!(report.as_bytes(), &[0, 5, 0xfd, 0x80, 0x7f]);
        assert_eq!(report.y(), -3);
        assert_eq!(report.v_wheel(), -128);
    }

    #[test]
    fn test_consumer_slots_little_endian() {
        let mut report = ConsumerControlReport::default();
        report.set_slot(1, 0x01E9);
        assert_eq!(report.as_bytes(), &[0, 0, 0xe9, 0x01, 0, 0, 0, 0]);
        assert_eq!(report.slots(), [0, 0x01E9, 0, 0]);
    }

    #[test]
    fn test_absolute_mouse_layout() {
        let mut report = AbsoluteMouseReport::default();
        report.set_buttons(1);
        report.set_position(0x1234, 0x0102, -1);
        assert_eq!(report.as_bytes(), &[1, 0x34, 0x12, 0x02, 0x01, 0xff]);
        assert_eq!(report.x(), 0x1234);
        assert_eq!(report.wheel(), -1);
    }

    #[test]
    fn test_skip_unchanged_policy() {
        let mut pair = ReportPair::<KeyboardReport>::new(SendPolicy::SkipUnchanged);
        let mut sent = 0;

        assert_eq!(pair.send_with(|_| sent += 1), SendOutcome::Unchanged);
        pair.current_mut().set_key_bit(HID_KEYBOARD_B);
        assert_eq!(pair.send_with(|_| sent += 1), SendOutcome::Sent);
        assert_eq!(pair.send_with(|_| sent += 1), SendOutcome::Unchanged);
        assert_eq!(sent, 1);
        assert_eq!(pair.last_sent(), pair.current());
    }

    #[test]
    fn test_skip_repeated_empty_policy() {
        let mut pair = ReportPair::<MouseReport>::new(SendPolicy::SkipRepeatedEmpty);
        let mut sent = 0;

        assert!(!pair.send_with(|_| sent += 1).is_sent());
        pair.current_mut().set_axes(1, 1, 0, 0);
        assert!(pair.send_with(|_| sent += 1).is_sent());
        assert!(pair.send_with(|_| sent += 1).is_sent());
        pair.current_mut().clear();
        assert!(pair.send_with(|_| sent += 1).is_sent());
        assert!(!pair.send_with(|_| sent += 1).is_sent());
        assert_eq!(sent, 3);
    }

    #[test]
    fn test_baseline_untouched_when_suppressed() {
        let mut pair = ReportPair::<ConsumerControlReport>::new(SendPolicy::SkipUnchanged);
        pair.current_mut().set_slot(0, CONSUMER_MUTE);
        pair.send_with(|_| {});
        let baseline = *pair.last_sent();

        pair.send_with(|_| {});
        assert_eq!(*pair.last_sent(), baseline);
    }
}
