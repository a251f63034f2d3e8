// Vkbd Virtual Absolute Mouse
// Absolute pointer reports, sent as soon as they are built

use super::mouse::MouseButtons;
use super::report::{AbsoluteMouseReport, HidReport, ABSOLUTE_MOUSE_REPORT_LEN};
use crate::sink::{EventSink, SharedLog};

/// Virtual absolute-positioning mouse.
///
/// Unlike [`Mouse`](super::mouse::Mouse) this device keeps no baseline;
/// every operation emits a report.
#[derive(Debug, Clone)]
pub struct AbsoluteMouse {
    report: AbsoluteMouseReport,
    log: SharedLog,
}

impl AbsoluteMouse {
    pub fn new(log: SharedLog) -> Self {
        Self {
            report: AbsoluteMouseReport::default(),
            log,
        }
    }

    /// Nothing to announce; the first report goes out on the first operation
    pub fn begin(&mut self) {}

    pub fn end(&mut self) {
        self.report = AbsoluteMouseReport::default();
        self.send();
    }

    /// Emit an already-encoded report verbatim
    pub fn send_report(&mut self, bytes: &[u8; ABSOLUTE_MOUSE_REPORT_LEN]) {
        log::info!("A virtual SingleAbsoluteMouse HID report was sent.");
        self.log.usb_event(AbsoluteMouseReport::NAME, bytes);
    }

    pub fn move_to(&mut self, x: u16, y: u16, wheel: i8) {
        self.report.set_position(x, y, wheel);
        self.send();
    }

    pub fn press(&mut self, buttons: MouseButtons) {
        let held = self.report.buttons() | buttons.bits();
        self.report.set_buttons(held);
        self.send();
    }

    pub fn release(&mut self, buttons: MouseButtons) {
        let held = self.report.buttons() & !buttons.bits();
        self.report.set_buttons(held);
        self.send();
    }

    pub fn click(&mut self, buttons: MouseButtons) {
        self.press(buttons);
        self.release(buttons);
    }

    pub fn report(&self) -> &AbsoluteMouseReport {
        &self.report
    }

    fn send(&mut self) {
        let mut bytes = [0u8; ABSOLUTE_MOUSE_REPORT_LEN];
        bytes.copy_from_slice(self.report.as_bytes());
        self.send_report(&bytes);
    }
}
