// Vkbd Virtual Keyboard
// NKRO keyboard report mutation, num lock tracking and change-detected sends

use super::report::{KeyboardReport, ReportPair, SendOutcome, SendPolicy};
use super::report_consumer::{KeyboardReportConsumer, StandardKeyboardReportConsumer};
use super::usage::{is_modifier, is_num_lock, HID_LAST_KEY, LED_NUM_LOCK};
use crate::sink::SharedLog;

/// Virtual HID keyboard.
///
/// Sent reports go to a pluggable [`KeyboardReportConsumer`]; by default the
/// decoded key list and raw bytes are written to the shared event log.
pub struct Keyboard {
    report: ReportPair<KeyboardReport>,
    consumer: Box<dyn KeyboardReportConsumer>,
    system_leds: u8,
    num_lock_pressed: bool,
}

impl Keyboard {
    /// Create a keyboard that logs through the standard report consumer
    pub fn new(log: SharedLog) -> Self {
        Self::with_consumer(Box::new(StandardKeyboardReportConsumer::new(log)))
    }

    pub fn with_consumer(consumer: Box<dyn KeyboardReportConsumer>) -> Self {
        Self {
            report: ReportPair::new(SendPolicy::SkipUnchanged),
            consumer,
            system_leds: 0,
            num_lock_pressed: false,
        }
    }

    /// Replace the consumer that receives sent reports
    pub fn set_report_consumer(&mut self, consumer: Box<dyn KeyboardReportConsumer>) {
        self.consumer = consumer;
    }

    pub fn begin(&mut self) {
        self.release_all();
    }

    pub fn end(&mut self) {
        self.release_all();
    }

    /// Add a key to the current report.
    ///
    /// Returns false for codes that are neither in the key bitmap nor
    /// modifiers; the report is left unchanged for those.
    pub fn press(&mut self, code: u8) -> bool {
        if is_num_lock(code) && !self.num_lock_pressed {
            // held num lock must not flicker the LED on repeated presses
            self.num_lock_pressed = true;
            self.system_leds ^= LED_NUM_LOCK;
        }

        if code <= HID_LAST_KEY {
            self.report.current_mut().set_key_bit(code);
            true
        } else if is_modifier(code) {
            self.report.current_mut().set_modifier_bit(code);
            true
        } else {
            false
        }
    }

    /// Remove a key from the current report
    pub fn release(&mut self, code: u8) -> bool {
        if is_num_lock(code) {
            self.num_lock_pressed = false;
        }

        if code <= HID_LAST_KEY {
            self.report.current_mut().clear_key_bit(code);
            true
        } else if is_modifier(code) {
            self.report.current_mut().clear_modifier_bit(code);
            true
        } else {
            false
        }
    }

    /// Clear every key and modifier of the current report
    pub fn release_all(&mut self) {
        self.report.current_mut().clear();
    }

    /// Returns true if the modifier is set in the current report
    pub fn is_modifier_active(&self, code: u8) -> bool {
        is_modifier(code) && self.report.current().modifier_bit(code)
    }

    /// Returns true if the modifier was set in the last sent report
    pub fn was_modifier_active(&self, code: u8) -> bool {
        is_modifier(code) && self.report.last_sent().modifier_bit(code)
    }

    /// Returns true if the key bit is set in the current report
    pub fn is_key_pressed(&self, code: u8) -> bool {
        code <= HID_LAST_KEY && self.report.current().key_bit(code)
    }

    /// Send the current report unless it is identical to the last one sent
    pub fn send_report(&mut self) -> SendOutcome {
        let consumer = &mut self.consumer;
        self.report
            .send_with(|report| consumer.process_keyboard_report(report))
    }

    /// Host-reported LED state (only num lock is tracked)
    pub fn leds(&self) -> u8 {
        self.system_leds
    }

    pub fn report(&self) -> &KeyboardReport {
        self.report.current()
    }

    pub fn last_report(&self) -> &KeyboardReport {
        self.report.last_sent()
    }
}
