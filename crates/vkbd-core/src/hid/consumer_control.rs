// Vkbd Virtual Consumer Control
// Multimedia usages held in a fixed set of report slots

use super::report::{
    ConsumerControlReport, HidReport, ReportPair, SendOutcome, SendPolicy, CONSUMER_SLOTS,
};
use crate::sink::{EventSink, SharedLog};

/// Virtual consumer control device (media keys)
#[derive(Debug, Clone)]
pub struct ConsumerControl {
    report: ReportPair<ConsumerControlReport>,
    log: SharedLog,
    dropped_presses: u64,
}

impl ConsumerControl {
    pub fn new(log: SharedLog) -> Self {
        Self {
            report: ReportPair::new(SendPolicy::SkipUnchanged),
            log,
            dropped_presses: 0,
        }
    }

    pub fn begin(&mut self) {
        self.end();
    }

    pub fn end(&mut self) {
        self.release_all();
        self.send_report();
    }

    /// Put a usage into the first free slot.
    ///
    /// Returns false when every slot is taken; the press is dropped and
    /// counted in [`dropped_presses`](Self::dropped_presses).
    pub fn press(&mut self, code: u16) -> bool {
        let report = self.report.current_mut();
        match (0..CONSUMER_SLOTS).find(|&slot| report.slot(slot) == 0) {
            Some(slot) => {
                report.set_slot(slot, code);
                true
            }
            None => {
                self.dropped_presses += 1;
                log::warn!(
                    "consumer control report full, dropping usage {:#06x} ({} dropped so far)",
                    code,
                    self.dropped_presses
                );
                false
            }
        }
    }

    /// Clear every slot holding `code`
    pub fn release(&mut self, code: u16) {
        let report = self.report.current_mut();
        for slot in 0..CONSUMER_SLOTS {
            if report.slot(slot) == code {
                report.set_slot(slot, 0);
            }
        }
    }

    /// Momentary press: press immediately followed by release
    pub fn write(&mut self, code: u16) {
        self.press(code);
        self.release(code);
    }

    pub fn release_all(&mut self) {
        self.report.current_mut().clear();
    }

    /// Send the current report unless it is identical to the last one sent
    pub fn send_report(&mut self) -> SendOutcome {
        let log = &mut self.log;
        self.report.send_with(|report| {
            log::info!("A virtual ConsumerControl HID report was sent.");
            log.usb_event(ConsumerControlReport::NAME, report.as_bytes());
        })
    }

    /// Presses lost because no slot was free
    pub fn dropped_presses(&self) -> u64 {
        self.dropped_presses
    }

    pub fn report(&self) -> &ConsumerControlReport {
        self.report.current()
    }
}
