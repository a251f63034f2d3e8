// Vkbd Virtual Keyboard Harness
// One virtual device: matrix, LEDs, HID interfaces and clock sharing one event log

use crate::clock::ScanClock;
use crate::hid::{AbsoluteMouse, ConsumerControl, Keyboard, Mouse, SystemControl};
use crate::led::LedStore;
use crate::matrix::{InputSource, KeyswitchEvent, ScriptedInput, VirtualMatrix};
use crate::settings::Settings;
use crate::sink::SharedLog;

/// A complete virtual keyboard.
///
/// Every device writes to the same [`SharedLog`]; the log is stamped with
/// the clock's cycle after each [`run_cycle`](Self::run_cycle).
pub struct VirtualKeyboard {
    matrix: VirtualMatrix,
    leds: LedStore,
    keyboard: Keyboard,
    mouse: Mouse,
    consumer_control: ConsumerControl,
    system_control: SystemControl,
    absolute_mouse: AbsoluteMouse,
    clock: ScanClock,
    log: SharedLog,
}

impl Default for VirtualKeyboard {
    fn default() -> Self {
        Self::new(Box::new(ScriptedInput::new()))
    }
}

impl VirtualKeyboard {
    pub fn new(input: Box<dyn InputSource>) -> Self {
        Self::with_clock(input, ScanClock::default())
    }

    fn with_clock(input: Box<dyn InputSource>, clock: ScanClock) -> Self {
        let log = SharedLog::new();
        log.set_cycle(clock.current_cycle());
        Self {
            matrix: VirtualMatrix::new(input),
            leds: LedStore::new(log.clone()),
            keyboard: Keyboard::new(log.clone()),
            mouse: Mouse::new(log.clone()),
            consumer_control: ConsumerControl::new(log.clone()),
            system_control: SystemControl::new(log.clone()),
            absolute_mouse: AbsoluteMouse::new(log.clone()),
            clock,
            log,
        }
    }

    /// Build a keyboard configured from `settings`
    pub fn from_settings(settings: &Settings, input: Box<dyn InputSource>) -> Self {
        let mut vk = Self::with_clock(input, ScanClock::new(settings.millis_per_cycle()));
        vk.matrix
            .set_read_matrix_enabled(settings.read_matrix_enabled());
        vk.matrix.set_keyscan_interval(settings.keyscan_interval());
        vk
    }

    /// Reset the matrix and attach to the (virtual) host
    pub fn setup(&mut self) {
        self.matrix.setup();
        self.matrix.attach_to_host();
    }

    /// Scan the matrix once, then advance the clock.
    ///
    /// Returns the keyswitch events observed by the scan. Events emitted
    /// afterwards are stamped with the new cycle.
    pub fn run_cycle(&mut self) -> Vec<KeyswitchEvent> {
        let events = self.matrix.scan_matrix();
        let cycle = self.clock.tick();
        self.log.set_cycle(cycle);
        log::debug!("scan cycle {} done, {} keyswitch events", cycle, events.len());
        events
    }

    pub fn matrix(&self) -> &VirtualMatrix {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut VirtualMatrix {
        &mut self.matrix
    }

    pub fn leds(&self) -> &LedStore {
        &self.leds
    }

    pub fn leds_mut(&mut self) -> &mut LedStore {
        &mut self.leds
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn mouse(&self) -> &Mouse {
        &self.mouse
    }

    pub fn mouse_mut(&mut self) -> &mut Mouse {
        &mut self.mouse
    }

    pub fn consumer_control(&self) -> &ConsumerControl {
        &self.consumer_control
    }

    pub fn consumer_control_mut(&mut self) -> &mut ConsumerControl {
        &mut self.consumer_control
    }

    pub fn system_control_mut(&mut self) -> &mut SystemControl {
        &mut self.system_control
    }

    pub fn absolute_mouse(&self) -> &AbsoluteMouse {
        &self.absolute_mouse
    }

    pub fn absolute_mouse_mut(&mut self) -> &mut AbsoluteMouse {
        &mut self.absolute_mouse
    }

    pub fn clock(&self) -> &ScanClock {
        &self.clock
    }

    /// Handle to the event log every device writes to
    pub fn log(&self) -> &SharedLog {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::usage::HID_KEYBOARD_A;
    use crate::layout::KeyPosition;
    use crate::matrix::KeyState;

    #[test]
    fn test_run_cycle_advances_clock_and_log() {
        let mut vk = VirtualKeyboard::default();
        assert_eq!(vk.clock().millis(), 0);

        vk.run_cycle();
        vk.run_cycle();
        assert_eq!(vk.clock().current_cycle(), 2);
        assert_eq!(vk.clock().millis(), 10);
        assert_eq!(vk.log().lock().cycle(), 2);
    }

    #[test]
    fn test_events_stamped_with_cycle() {
        let mut vk = VirtualKeyboard::default();
        vk.run_cycle();
        vk.keyboard_mut().press(HID_KEYBOARD_A);
        vk.keyboard_mut().send_report();

        let events = vk.log().snapshot();
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.cycle == 1));
    }

    #[test]
    fn test_scripted_input_drives_scan() {
        let position = KeyPosition::new(1, 2).unwrap();
        let input = ScriptedInput::from_frames(vec![
            vec![(position, KeyState::Pressed)],
            vec![],
            vec![(position, KeyState::NotPressed)],
        ]);
        let mut vk = VirtualKeyboard::new(Box::new(input));

        let first = vk.run_cycle();
        assert_eq!(first.len(), 1);
        assert!(first[0].toggled_on());
        assert_eq!(first[0].index.get(), 19);

        let second = vk.run_cycle();
        assert!(second[0].held());

        let third = vk.run_cycle();
        assert!(third[0].toggled_off());
        assert!(vk.run_cycle().is_empty());
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::new();
        settings.set_millis_per_cycle(8).unwrap();
        settings.set_read_matrix_enabled(false);
        settings.set_keyscan_interval(4).unwrap();

        let position = KeyPosition::new(0, 0).unwrap();
        let input = ScriptedInput::from_frames(vec![vec![(position, KeyState::Pressed)]]);
        let mut vk = VirtualKeyboard::from_settings(&settings, Box::new(input));

        assert!(!vk.matrix().read_matrix_enabled());
        assert_eq!(vk.matrix().keyscan_interval(), 4);
        assert!(vk.run_cycle().is_empty());
        assert_eq!(vk.clock().millis(), 8);
    }

    #[test]
    fn test_setup_attaches() {
        let mut vk = VirtualKeyboard::default();
        vk.setup();
        assert!(vk.matrix().is_attached());
        assert!(vk.log().is_empty());
    }
}
