// Vkbd Core Library
// Virtual keyboard hardware: matrix, LEDs, HID reports and scan clock

pub mod clock;
pub mod harness;
pub mod hid;
pub mod layout;
pub mod led;
pub mod matrix;
pub mod scenario;
pub mod settings;
pub mod sink;

pub use clock::ScanClock;
pub use harness::VirtualKeyboard;
pub use hid::{
    AbsoluteMouse, ConsumerControl, HidReport, Keyboard, KeyboardReport, Mouse, MouseButton,
    MouseButtons, SendOutcome, SystemControl,
};
pub use layout::{KeyIndex, KeyPosition, LayoutError, LED_COUNT, MATRIX_COLUMNS, MATRIX_ROWS};
pub use led::{Crgb, LedStore};
pub use matrix::{InputSource, KeyState, KeyswitchEvent, ScriptedInput, VirtualMatrix};
pub use scenario::{Scenario, ScenarioError, ScenarioSummary, Step};
pub use settings::{Settings, SettingsError};
pub use sink::{EventChannel, EventLog, EventSink, LoggedEvent, SharedLog};
