// Vkbd Virtual Mouse
// Relative mouse reports; repeated non-empty reports are always sent

use serde::{Deserialize, Serialize};
use std::ops::BitOr;
use strum_macros::{Display, EnumIter, EnumString};

use super::report::{HidReport, MouseReport, ReportPair, SendOutcome, SendPolicy};
use crate::sink::{EventSink, SharedLog};

/// A set of mouse buttons as a report bitfield.
///
/// Defaults to the primary (left) button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseButtons(u8);

impl MouseButtons {
    pub const LEFT: MouseButtons = MouseButtons(1 << 0);
    pub const RIGHT: MouseButtons = MouseButtons(1 << 1);
    pub const MIDDLE: MouseButtons = MouseButtons(1 << 2);
    pub const PREV: MouseButtons = MouseButtons(1 << 3);
    pub const NEXT: MouseButtons = MouseButtons(1 << 4);
    pub const ALL: MouseButtons = MouseButtons(0b1_1111);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        MouseButtons(bits)
    }
}

impl Default for MouseButtons {
    fn default() -> Self {
        MouseButtons::LEFT
    }
}

impl BitOr for MouseButtons {
    type Output = MouseButtons;

    fn bitor(self, rhs: Self) -> Self::Output {
        MouseButtons(self.0 | rhs.0)
    }
}

/// A single named mouse button
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Prev,
    Next,
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
            MouseButton::Prev => MouseButtons::PREV,
            MouseButton::Next => MouseButtons::NEXT,
        }
    }
}

impl FromIterator<MouseButton> for MouseButtons {
    fn from_iter<I: IntoIterator<Item = MouseButton>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MouseButtons(0), |acc, b| acc | MouseButtons::from(b))
    }
}

/// Virtual relative mouse
#[derive(Debug, Clone)]
pub struct Mouse {
    report: ReportPair<MouseReport>,
    log: SharedLog,
}

impl Mouse {
    pub fn new(log: SharedLog) -> Self {
        Self {
            report: ReportPair::new(SendPolicy::SkipRepeatedEmpty),
            log,
        }
    }

    pub fn begin(&mut self) {
        self.end();
    }

    pub fn end(&mut self) {
        self.release_all();
        self.send_report();
    }

    /// Overwrite the motion and wheel deltas of the current report
    pub fn move_by(&mut self, x: i8, y: i8, v_wheel: i8, h_wheel: i8) {
        self.report.current_mut().set_axes(x, y, v_wheel, h_wheel);
    }

    pub fn press(&mut self, buttons: MouseButtons) {
        let current = self.report.current().buttons();
        self.report.current_mut().set_buttons(current | buttons.bits());
    }

    pub fn release(&mut self, buttons: MouseButtons) {
        let current = self.report.current().buttons();
        self.report.current_mut().set_buttons(current & !buttons.bits());
    }

    /// Press, send, release. The send always emits since the press changed
    /// the report.
    pub fn click(&mut self, buttons: MouseButtons) {
        self.press(buttons);
        self.send_report();
        self.release(buttons);
    }

    /// Returns true if any of the buttons is down in the current report
    pub fn is_pressed(&self, buttons: MouseButtons) -> bool {
        self.report.current().buttons() & buttons.bits() != 0
    }

    pub fn release_all(&mut self) {
        self.report.current_mut().clear();
    }

    /// Send the current report; only a repeated all-zero report is suppressed
    pub fn send_report(&mut self) -> SendOutcome {
        let log = &mut self.log;
        self.report.send_with(|report| {
            log::info!("A virtual Mouse HID report was sent.");
            log.usb_event(MouseReport::NAME, report.as_bytes());
        })
    }

    pub fn report(&self) -> &MouseReport {
        self.report.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    const NAME: &str = "Mouse HID report";

    #[test]
    fn test_repeated_motion_is_sent() {
        let log = SharedLog::new();
        let mut mouse = Mouse::new(log.clone());

        mouse.move_by(5, -3, 0, 0);
        assert_eq!(mouse.send_report(), SendOutcome::Sent);
        assert_eq!(mouse.send_report(), SendOutcome::Sent);
        assert_eq!(log.count_named(NAME), 2);
        assert_eq!(log.last_payload(NAME), Some(vec![0, 5, 0xfd, 0, 0]));
    }

    #[test]
    fn test_repeated_empty_is_suppressed() {
        let log = SharedLog::new();
        let mut mouse = Mouse::new(log.clone());

        mouse.move_by(1, 0, 0, 0);
        mouse.send_report();
        mouse.move_by(0, 0, 0, 0);
        assert!(mouse.send_report().is_sent());
        assert!(!mouse.send_report().is_sent());
        assert!(!mouse.send_report().is_sent());
        assert_eq!(log.count_named(NAME), 2);
    }

    #[test]
    fn test_initial_empty_report_not_sent() {
        let log = SharedLog::new();
        let mut mouse = Mouse::new(log.clone());
        mouse.begin();
        assert!(log.is_empty());
    }

    #[test]
    fn test_click_emits_pressed_report() {
        let log = SharedLog::new();
        let mut mouse = Mouse::new(log.clone());

        mouse.click(MouseButtons::default());
        assert_eq!(log.count_named(NAME), 1);
        assert_eq!(log.last_payload(NAME), Some(vec![1, 0, 0, 0, 0]));
        assert!(!mouse.is_pressed(MouseButtons::LEFT));

        mouse.send_report();
        assert_eq!(log.last_payload(NAME), Some(vec![0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_press_release_buttons() {
        let mut mouse = Mouse::new(SharedLog::new());
        mouse.press(MouseButtons::RIGHT | MouseButtons::MIDDLE);
        assert!(mouse.is_pressed(MouseButtons::RIGHT));
        assert!(mouse.is_pressed(MouseButtons::MIDDLE));
        assert!(!mouse.is_pressed(MouseButtons::LEFT));

        mouse.release(MouseButtons::RIGHT);
        assert_eq!(mouse.report().buttons(), MouseButtons::MIDDLE.bits());

        mouse.press(MouseButtons::ALL);
        mouse.release_all();
        assert!(mouse.report().is_empty());
    }

    #[test]
    fn test_end_sends_release() {
        let log = SharedLog::new();
        let mut mouse = Mouse::new(log.clone());
        mouse.press(MouseButtons::LEFT);
        mouse.send_report();
        mouse.end();
        assert_eq!(log.count_named(NAME), 2);
        assert_eq!(log.last_payload(NAME), Some(vec![0; 5]));
    }

    #[test]
    fn test_named_buttons() {
        assert_eq!(MouseButton::from_str("middle").unwrap(), MouseButton::Middle);
        let all: MouseButtons = MouseButton::iter().collect();
        assert_eq!(all, MouseButtons::ALL);
    }
}
