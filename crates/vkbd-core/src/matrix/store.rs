// Vkbd Matrix Store
// Current/previous keystate grids with a masking overlay

use super::input::{InputSource, ScriptedInput};
use super::keyswitch::{KeyState, KeyswitchEvent};
use crate::layout::{KeyIndex, KeyPosition, KEY_COUNT};

/// The virtual keyswitch matrix.
///
/// Holds the keystate of every position for the current and the previous
/// scan cycle, plus a mask that hides a position from scans and "pressed"
/// queries without touching its underlying state.
pub struct VirtualMatrix {
    keystates: [KeyState; KEY_COUNT],
    keystates_prev: [KeyState; KEY_COUNT],
    mask: [bool; KEY_COUNT],
    input: Box<dyn InputSource>,
    read_enabled: bool,
    keyscan_interval: u8,
    attached: bool,
}

impl Default for VirtualMatrix {
    fn default() -> Self {
        Self::new(Box::new(ScriptedInput::new()))
    }
}

impl VirtualMatrix {
    /// Create a matrix with every key released, reading from `input`
    pub fn new(input: Box<dyn InputSource>) -> Self {
        Self {
            keystates: [KeyState::NotPressed; KEY_COUNT],
            keystates_prev: [KeyState::NotPressed; KEY_COUNT],
            mask: [false; KEY_COUNT],
            input,
            read_enabled: true,
            keyscan_interval: 1,
            attached: false,
        }
    }

    /// Replace the input collaborator
    pub fn set_input(&mut self, input: Box<dyn InputSource>) {
        self.input = input;
    }

    /// Reset both grids and the mask
    pub fn setup(&mut self) {
        self.keystates = [KeyState::NotPressed; KEY_COUNT];
        self.keystates_prev = [KeyState::NotPressed; KEY_COUNT];
        self.mask = [false; KEY_COUNT];
        log::debug!("virtual matrix set up");
    }

    pub fn set_keystate(&mut self, position: KeyPosition, state: KeyState) {
        self.keystates[position.offset()] = state;
    }

    pub fn keystate(&self, position: KeyPosition) -> KeyState {
        self.keystates[position.offset()]
    }

    /// State of a position as of the previous scan cycle
    pub fn previous_keystate(&self, position: KeyPosition) -> KeyState {
        self.keystates_prev[position.offset()]
    }

    pub fn mask_key(&mut self, position: KeyPosition) {
        self.mask[position.offset()] = true;
    }

    pub fn unmask_key(&mut self, position: KeyPosition) {
        self.mask[position.offset()] = false;
    }

    pub fn is_key_masked(&self, position: KeyPosition) -> bool {
        self.mask[position.offset()]
    }

    /// Mask every position that is currently pressed.
    ///
    /// The mask stays in place until the position is explicitly unmasked.
    pub fn mask_held_keys(&mut self) {
        for (masked, state) in self.mask.iter_mut().zip(self.keystates.iter()) {
            if *state == KeyState::Pressed {
                *masked = true;
            }
        }
    }

    /// Enable or disable pulling frames from the input collaborator
    pub fn set_read_matrix_enabled(&mut self, enabled: bool) {
        self.read_enabled = enabled;
    }

    pub fn read_matrix_enabled(&self) -> bool {
        self.read_enabled
    }

    /// Snapshot the input collaborator's state into the current grid
    pub fn read_matrix(&mut self) {
        if !self.read_enabled {
            return;
        }
        let frame = self.input.next_frame(self.anything_held());
        for (position, state) in frame {
            self.keystates[position.offset()] = state;
        }
    }

    /// Report the transitions of this cycle and promote current into previous.
    ///
    /// Every unmasked key that is or was pressed yields one event. A `Tap`
    /// yields a press event followed by a release event and leaves the
    /// position released in both grids.
    pub fn act_on_matrix_scan(&mut self) -> Vec<KeyswitchEvent> {
        let mut events = Vec::new();

        for position in KeyPosition::all() {
            let offset = position.offset();
            let previous = self.keystates_prev[offset];
            let current = self.keystates[offset];

            if previous == KeyState::Tap {
                log::error!("keystate of {} in previous grid should never be tap", position);
            }

            let was_pressed = previous == KeyState::Pressed;
            let is_pressed = current.is_down();

            if !self.mask[offset] && (was_pressed || is_pressed) {
                events.push(KeyswitchEvent::new(position, was_pressed, is_pressed));
                if current == KeyState::Tap {
                    events.push(KeyswitchEvent::new(position, true, false));
                }
            }

            if current == KeyState::Tap {
                self.keystates[offset] = KeyState::NotPressed;
                self.keystates_prev[offset] = KeyState::NotPressed;
            } else {
                self.keystates_prev[offset] = current;
            }
        }

        events
    }

    /// One full scan cycle: read then act
    pub fn scan_matrix(&mut self) -> Vec<KeyswitchEvent> {
        self.read_matrix();
        self.act_on_matrix_scan()
    }

    /// Returns true if the key at `position` is pressed and not masked
    pub fn is_keyswitch_pressed(&self, position: KeyPosition) -> bool {
        let offset = position.offset();
        !self.mask[offset] && self.keystates[offset] == KeyState::Pressed
    }

    /// Same as [`is_keyswitch_pressed`](Self::is_keyswitch_pressed), addressed by key index
    pub fn is_keyswitch_pressed_at(&self, index: KeyIndex) -> bool {
        self.is_keyswitch_pressed(index.position())
    }

    /// Number of unmasked keys that are pressed
    pub fn pressed_keyswitch_count(&self) -> usize {
        self.keystates
            .iter()
            .zip(self.mask.iter())
            .filter(|(state, masked)| **state == KeyState::Pressed && !**masked)
            .count()
    }

    pub(crate) fn anything_held(&self) -> bool {
        self.pressed_keyswitch_count() > 0
    }

    pub fn attach_to_host(&mut self) {
        self.attached = true;
        log::debug!("virtual matrix attached to host");
    }

    pub fn detach_from_host(&mut self) {
        self.attached = false;
        log::debug!("virtual matrix detached from host");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Recorded only; virtual scans are driven explicitly
    pub fn set_keyscan_interval(&mut self, interval: u8) {
        self.keyscan_interval = interval;
        log::debug!("keyscan interval set to {}", interval);
    }

    pub fn keyscan_interval(&self) -> u8 {
        self.keyscan_interval
    }
}
