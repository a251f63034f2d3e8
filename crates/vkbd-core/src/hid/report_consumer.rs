// Vkbd Keyboard Report Consumers
// Observers that receive every keyboard report the virtual keyboard sends

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::Arc;

use super::report::{HidReport, KeyboardReport};
use super::usage::{KEY_NAMES, MODIFIER_NAMES};
use crate::sink::{EventSink, SharedLog};

/// Receives each keyboard report after it passes change detection
pub trait KeyboardReportConsumer {
    fn process_keyboard_report(&mut self, report: &KeyboardReport);
}

/// Render the pressed modifiers and keys of a report as a space-separated list.
///
/// Modifiers come first, then named usages in usage order, then one
/// `(other)` per non-zero bitmap byte past the named range. An empty report
/// renders as `none`.
pub fn describe_keyboard_report(report: &KeyboardReport) -> String {
    if report.is_empty() {
        return "none".to_string();
    }

    let mut names: SmallVec<[&'static str; 8]> = SmallVec::new();

    for (bit, name) in MODIFIER_NAMES.iter().enumerate() {
        if report.modifiers() & (1 << bit) != 0 {
            names.push(*name);
        }
    }

    for (code, name) in KEY_NAMES.iter().enumerate() {
        if report.key_bit(code as u8) {
            names.push(*name);
        }
    }

    let named_bytes = KEY_NAMES.len() / 8;
    for byte in &report.keys()[named_bytes..] {
        // may undercount when several unnamed keys share a byte
        if *byte != 0 {
            names.push("(other)");
        }
    }

    names.join(" ")
}

/// Default consumer: logs the decoded key list and the raw report bytes
#[derive(Debug, Clone)]
pub struct StandardKeyboardReportConsumer {
    log: SharedLog,
}

impl StandardKeyboardReportConsumer {
    pub fn new(log: SharedLog) -> Self {
        Self { log }
    }
}

impl KeyboardReportConsumer for StandardKeyboardReportConsumer {
    fn process_keyboard_report(&mut self, report: &KeyboardReport) {
        let keys = describe_keyboard_report(report);
        log::info!("Sent virtual HID report. Pressed keys: {}", keys);
        self.log.usb_event(KeyboardReport::NAME, report.as_bytes());
        self.log
            .keyboard_event(&format!("Keyboard HID report; pressed keys: {}", keys));
    }
}

/// Consumer that records every report for later inspection
#[derive(Debug, Clone, Default)]
pub struct CapturingKeyboardReportConsumer {
    reports: Arc<Mutex<Vec<KeyboardReport>>>,
}

impl CapturingKeyboardReportConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far, oldest first
    pub fn reports(&self) -> Vec<KeyboardReport> {
        self.reports.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    pub fn last(&self) -> Option<KeyboardReport> {
        self.reports.lock().last().copied()
    }
}

impl KeyboardReportConsumer for CapturingKeyboardReportConsumer {
    fn process_keyboard_report(&mut self, report: &KeyboardReport) {
        self.reports.lock().push(*report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::usage::*;

    #[test]
    fn test_describe_empty_report() {
        assert_eq!(describe_keyboard_report(&KeyboardReport::default()), "none");
    }

    #[test]
    fn test_describe_modifiers_before_keys() {
        let mut report = KeyboardReport::default();
        report.set_key_bit(HID_KEYBOARD_Z);
        report.set_key_bit(HID_KEYBOARD_A);
        report.set_modifier_bit(HID_KEYBOARD_RIGHT_ALT);
        report.set_modifier_bit(HID_KEYBOARD_LEFT_CONTROL);

        assert_eq!(describe_keyboard_report(&report), "lctrl ralt a z");
    }

    #[test]
    fn test_describe_unnamed_keys_as_other() {
        let mut report = KeyboardReport::default();
        report.set_key_bit(0x90);
        report.set_key_bit(0x91);
        report.set_key_bit(0xA0);

        // 0x90 and 0x91 share a byte
        assert_eq!(describe_keyboard_report(&report), "(other) (other)");
    }

    #[test]
    fn test_standard_consumer_logs_both_channels() {
        let log = SharedLog::new();
        let mut consumer = StandardKeyboardReportConsumer::new(log.clone());
        let mut report = KeyboardReport::default();
        report.set_key_bit(HID_KEYBOARD_ENTER);

        consumer.process_keyboard_report(&report);

        let events = log.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "Keyboard HID report");
        assert_eq!(events[0].payload, report.as_bytes());
        assert_eq!(events[1].name, "Keyboard HID report; pressed keys: enter");
    }

    #[test]
    fn test_capturing_consumer_shares_buffer() {
        let capture = CapturingKeyboardReportConsumer::new();
        let mut handle = capture.clone();
        handle.process_keyboard_report(&KeyboardReport::default());

        assert_eq!(capture.len(), 1);
        assert_eq!(capture.last(), Some(KeyboardReport::default()));
    }
}
