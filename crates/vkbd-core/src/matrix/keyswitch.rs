// Vkbd Keyswitch State
// Per-key scan states and the transitions a scan reports

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::layout::{KeyIndex, KeyPosition};

/// State of a single keyswitch in one scan cycle.
///
/// `Tap` is a transient state injected by a test: the key counts as pressed
/// for exactly one scan and is then released.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    Pressed,
    #[default]
    NotPressed,
    Tap,
}

impl KeyState {
    /// Returns true for states that count as pressed during a scan
    pub fn is_down(self) -> bool {
        matches!(self, KeyState::Pressed | KeyState::Tap)
    }
}

/// Transition of one keyswitch observed by a matrix scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyswitchEvent {
    pub position: KeyPosition,
    pub index: KeyIndex,
    /// Pressed in the previous cycle
    pub was_pressed: bool,
    /// Pressed in this cycle
    pub is_pressed: bool,
}

impl KeyswitchEvent {
    pub fn new(position: KeyPosition, was_pressed: bool, is_pressed: bool) -> Self {
        Self {
            position,
            index: position.index(),
            was_pressed,
            is_pressed,
        }
    }

    /// Key went down this cycle
    pub fn toggled_on(&self) -> bool {
        self.is_pressed && !self.was_pressed
    }

    /// Key came up this cycle
    pub fn toggled_off(&self) -> bool {
        self.was_pressed && !self.is_pressed
    }

    /// Key stayed down across both cycles
    pub fn held(&self) -> bool {
        self.was_pressed && self.is_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_keystate_names() {
        assert_eq!(KeyState::NotPressed.to_string(), "not_pressed");
        assert_eq!(KeyState::from_str("tap").unwrap(), KeyState::Tap);
        assert_eq!(KeyState::default(), KeyState::NotPressed);
    }

    #[test]
    fn test_keystate_is_down() {
        assert!(KeyState::Pressed.is_down());
        assert!(KeyState::Tap.is_down());
        assert!(!KeyState::NotPressed.is_down());
    }

    #[test]
    fn test_event_transitions() {
        let pos = KeyPosition::new(1, 2).unwrap();

        let on = KeyswitchEvent::new(pos, false, true);
        assert!(on.toggled_on());
        assert!(!on.toggled_off());
        assert!(!on.held());
        assert_eq!(on.index.get(), 19);

        let off = KeyswitchEvent::new(pos, true, false);
        assert!(off.toggled_off());

        let held = KeyswitchEvent::new(pos, true, true);
        assert!(held.held());
        assert!(!held.toggled_on());
    }
}
