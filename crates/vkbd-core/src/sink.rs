// Vkbd Event Sink
// Observable output of the virtual hardware: emitted reports and LED snapshots

use parking_lot::{Mutex, MutexGuard};
use std::fmt::Write as _;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};

/// Output channel an event was written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum EventChannel {
    /// Raw HID report bytes
    Usb,
    /// Human-readable decoded keyboard report
    Keyboard,
    /// Full LED array snapshot
    Led,
}

/// Receiver for everything the virtual hardware emits.
///
/// This is the only externally observable output of the backend. Payloads
/// must be kept byte-exact so consumers can re-parse them as HID reports.
pub trait EventSink {
    /// A HID report of the given kind was sent
    fn usb_event(&mut self, name: &str, payload: &[u8]);

    /// Decoded, human-readable description of a keyboard report
    fn keyboard_event(&mut self, text: &str);

    /// The LED array was synced (r, g, b per LED)
    fn led_sync(&mut self, payload: &[u8]);
}

/// A single entry in the event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent {
    /// Scan cycle the event was emitted in
    pub cycle: u64,
    pub channel: EventChannel,
    /// Event name (report kind, or the decoded text on the keyboard channel)
    pub name: String,
    /// Raw bytes (empty on the keyboard channel)
    pub payload: Vec<u8>,
}

impl LoggedEvent {
    /// Render the event as one transcript line
    pub fn to_line(&self) -> String {
        let mut line = format!("[cycle {}] {} {}", self.cycle, self.channel, self.name);
        if !self.payload.is_empty() {
            line.push(':');
            for byte in &self.payload {
                let _ = write!(line, " {:02x}", byte);
            }
        }
        line
    }
}

/// In-memory event log stamped with the current scan cycle
#[derive(Debug, Default)]
pub struct EventLog {
    cycle: u64,
    events: Vec<LoggedEvent>,
}

impl EventLog {
    /// Create an empty log at cycle 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cycle stamped onto subsequent events
    pub fn set_cycle(&mut self, cycle: u64) {
        self.cycle = cycle;
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// All events in emission order
    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Events with the given name, in emission order
    pub fn events_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a LoggedEvent> + 'a {
        self.events.iter().filter(move |e| e.name == name)
    }

    /// Events written to the given channel, in emission order
    pub fn events_on(&self, channel: EventChannel) -> impl Iterator<Item = &LoggedEvent> + '_ {
        self.events.iter().filter(move |e| e.channel == channel)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop all recorded events (the cycle stamp is kept)
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Render every event, one per line
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&event.to_line());
            out.push('\n');
        }
        out
    }

    fn push(&mut self, channel: EventChannel, name: &str, payload: &[u8]) {
        self.events.push(LoggedEvent {
            cycle: self.cycle,
            channel,
            name: name.to_string(),
            payload: payload.to_vec(),
        });
    }
}

impl EventSink for EventLog {
    fn usb_event(&mut self, name: &str, payload: &[u8]) {
        self.push(EventChannel::Usb, name, payload);
    }

    fn keyboard_event(&mut self, text: &str) {
        self.push(EventChannel::Keyboard, text, &[]);
    }

    fn led_sync(&mut self, payload: &[u8]) {
        self.push(EventChannel::Led, "LED sync", payload);
    }
}

/// Cloneable handle to one event log shared by every virtual device
#[derive(Debug, Clone, Default)]
pub struct SharedLog {
    inner: Arc<Mutex<EventLog>>,
}

impl SharedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the underlying log for inspection
    pub fn lock(&self) -> MutexGuard<'_, EventLog> {
        self.inner.lock()
    }

    pub fn set_cycle(&self, cycle: u64) {
        self.inner.lock().set_cycle(cycle);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of all events recorded so far
    pub fn snapshot(&self) -> Vec<LoggedEvent> {
        self.inner.lock().events().to_vec()
    }

    /// Number of events with the given name
    pub fn count_named(&self, name: &str) -> usize {
        self.inner.lock().events_named(name).count()
    }

    /// Payload of the most recent event with the given name
    pub fn last_payload(&self, name: &str) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .events_named(name)
            .last()
            .map(|e| e.payload.clone())
    }

    pub fn transcript(&self) -> String {
        self.inner.lock().transcript()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl EventSink for SharedLog {
    fn usb_event(&mut self, name: &str, payload: &[u8]) {
        self.inner.lock().usb_event(name, payload);
    }

    fn keyboard_event(&mut self, text: &str) {
        self.inner.lock().keyboard_event(text);
    }

    fn led_sync(&mut self, payload: &[u8]) {
        self.inner.lock().led_sync(payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_log_stamps_cycle() {
        let mut log = EventLog::new();
        log.usb_event("Mouse HID report", &[1, 0, 0, 0, 0]);
        log.set_cycle(7);
        log.led_sync(&[0, 0, 0]);

        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].cycle, 0);
        assert_eq!(log.events()[1].cycle, 7);
        assert_eq!(log.events()[1].channel, EventChannel::Led);
    }

    #[test]
    fn test_transcript_line_format() {
        let mut log = EventLog::new();
        log.set_cycle(3);
        log.usb_event("SystemControl HID report", &[0x81]);
        log.keyboard_event("Keyboard HID report; pressed keys: a ");

        let transcript = log.transcript();
        let lines: Vec<&str> = transcript.lines().collect();
        assert_eq!(lines[0], "[cycle 3] usb SystemControl HID report: 81");
        assert_eq!(lines[1], "[cycle 3] keyboard Keyboard HID report; pressed keys: a ");
    }

    #[test]
    fn test_shared_log_clones_share_state() {
        let log = SharedLog::new();
        let mut handle = log.clone();
        handle.usb_event("ConsumerControl HID report", &[0xe9, 0x00]);

        assert_eq!(log.len(), 1);
        assert_eq!(log.count_named("ConsumerControl HID report"), 1);
        assert_eq!(
            log.last_payload("ConsumerControl HID report"),
            Some(vec![0xe9, 0x00])
        );

        log.clear();
        assert!(handle.is_empty());
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(EventChannel::Usb.to_string(), "usb");
        assert_eq!(EventChannel::from_str("led").unwrap(), EventChannel::Led);
    }

    #[test]
    fn test_events_on_channel() {
        let mut log = EventLog::new();
        log.usb_event("Keyboard HID report", &[0; 29]);
        log.keyboard_event("Keyboard HID report; pressed keys: none");
        log.usb_event("Mouse HID report", &[0; 5]);

        assert_eq!(log.events_on(EventChannel::Usb).count(), 2);
        assert_eq!(log.events_on(EventChannel::Keyboard).count(), 1);
    }
}
