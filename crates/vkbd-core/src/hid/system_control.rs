// Vkbd Virtual System Control
// Power, sleep and wake usages; every call is reported to the host

use super::report::{HidReport, SystemControlReport};
use crate::sink::{EventSink, SharedLog};

/// Virtual system control device.
///
/// There is no change detection: each press, release or write emits a report.
#[derive(Debug, Clone)]
pub struct SystemControl {
    log: SharedLog,
}

impl SystemControl {
    pub fn new(log: SharedLog) -> Self {
        Self { log }
    }

    pub fn begin(&mut self) {
        self.release_all();
    }

    pub fn end(&mut self) {
        self.release_all();
    }

    pub fn press(&mut self, code: u8) {
        self.send_report(SystemControlReport::new(code));
    }

    pub fn release(&mut self) {
        self.send_report(SystemControlReport::default());
    }

    pub fn release_all(&mut self) {
        self.release();
    }

    /// Press immediately followed by release: two reports
    pub fn write(&mut self, code: u8) {
        self.press(code);
        self.release();
    }

    fn send_report(&mut self, report: SystemControlReport) {
        log::info!("A virtual SystemControl HID report was sent.");
        self.log.usb_event(SystemControlReport::NAME, report.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::usage::*;

    const NAME: &str = "SystemControl HID report";

    #[test]
    fn test_every_call_emits() {
        let log = SharedLog::new();
        let mut system = SystemControl::new(log.clone());

        system.press(SYSTEM_SLEEP);
        system.press(SYSTEM_SLEEP);
        assert_eq!(log.count_named(NAME), 2);
        assert_eq!(log.last_payload(NAME), Some(vec![SYSTEM_SLEEP]));

        system.release();
        system.release();
        assert_eq!(log.count_named(NAME), 4);
        assert_eq!(log.last_payload(NAME), Some(vec![0]));
    }

    #[test]
    fn test_write_is_press_then_release() {
        let log = SharedLog::new();
        let mut system = SystemControl::new(log.clone());
        system.write(SYSTEM_POWER_DOWN);

        let payloads: Vec<Vec<u8>> = log.snapshot().into_iter().map(|e| e.payload).collect();
        assert_eq!(payloads, vec![vec![SYSTEM_POWER_DOWN], vec![0]]);
    }

    #[test]
    fn test_begin_and_end_release() {
        let log = SharedLog::new();
        let mut system = SystemControl::new(log.clone());
        system.begin();
        system.end();
        assert_eq!(log.count_named(NAME), 2);
    }
}
