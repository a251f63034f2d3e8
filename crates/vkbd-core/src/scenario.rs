// Vkbd Scenario Module
// Scripted test sessions replayed against a virtual keyboard

use serde::Deserialize;
use std::fmt;
#[cfg(feature = "config")]
use std::path::Path;

use crate::harness::VirtualKeyboard;
use crate::hid::{MouseButton, MouseButtons};
use crate::layout::{KeyPosition, LayoutError};
use crate::led::Crgb;
use crate::matrix::KeyState;

/// Errors that can occur while loading or replaying a scenario
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("step {step}: {source}")]
    InvalidStep {
        step: usize,
        #[source]
        source: LayoutError,
    },
}

fn one() -> u32 {
    1
}

/// One scripted operation.
///
/// In TOML each step is a `[[step]]` table whose `op` field names the
/// operation:
///
/// ```toml
/// [[step]]
/// op = "keystate"
/// row = 0
/// col = 3
/// state = "pressed"
///
/// [[step]]
/// op = "scan"
/// cycles = 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    Keystate { row: u8, col: u8, state: KeyState },
    Scan {
        #[serde(default = "one")]
        cycles: u32,
    },
    Mask { row: u8, col: u8 },
    Unmask { row: u8, col: u8 },
    MaskHeld,

    KeyPress { code: u8 },
    KeyRelease { code: u8 },
    KeyReleaseAll,
    KeySend,

    MouseMove {
        #[serde(default)]
        x: i8,
        #[serde(default)]
        y: i8,
        #[serde(default)]
        v_wheel: i8,
        #[serde(default)]
        h_wheel: i8,
    },
    /// An empty button list means the primary button
    MousePress {
        #[serde(default)]
        buttons: Vec<MouseButton>,
    },
    MouseRelease {
        #[serde(default)]
        buttons: Vec<MouseButton>,
    },
    MouseClick {
        #[serde(default)]
        buttons: Vec<MouseButton>,
    },
    MouseSend,

    ConsumerPress { code: u16 },
    ConsumerRelease { code: u16 },
    ConsumerWrite { code: u16 },
    ConsumerSend,

    SystemPress { code: u8 },
    SystemRelease,

    SetLed {
        index: usize,
        #[serde(default)]
        r: u8,
        #[serde(default)]
        g: u8,
        #[serde(default)]
        b: u8,
    },
    SyncLeds,
}

fn mouse_buttons(buttons: &[MouseButton]) -> MouseButtons {
    if buttons.is_empty() {
        MouseButtons::default()
    } else {
        buttons.iter().copied().collect()
    }
}

/// What a scenario run did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScenarioSummary {
    /// Steps applied
    pub steps: usize,
    /// Scan cycles run
    pub cycles: u64,
    /// Keyswitch events observed by the scans
    pub keyswitch_events: usize,
    /// Events written to the log during the run
    pub events: usize,
}

impl fmt::Display for ScenarioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps, {} scan cycles, {} keyswitch events, {} events emitted",
            self.steps, self.cycles, self.keyswitch_events, self.events
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioToml {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    step: Vec<Step>,
}

/// An ordered list of steps
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scenario {
    name: Option<String>,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { name: None, steps }
    }

    /// Load a scenario from a TOML file
    #[cfg(feature = "config")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a scenario from a TOML string
    #[cfg(feature = "config")]
    pub fn from_toml(content: &str) -> Result<Self, ScenarioError> {
        let parsed: ScenarioToml =
            toml::from_str(content).map_err(|e| ScenarioError::TomlParse(e.to_string()))?;
        Ok(Self {
            name: parsed.name,
            steps: parsed.step,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step in order.
    ///
    /// Stops at the first step that names a position or LED outside the
    /// matrix; steps before it stay applied.
    pub fn run(&self, vk: &mut VirtualKeyboard) -> Result<ScenarioSummary, ScenarioError> {
        let events_before = vk.log().len();
        let mut summary = ScenarioSummary::default();

        for (i, step) in self.steps.iter().enumerate() {
            // steps are numbered from 1 in messages
            let number = i + 1;
            if let Err(source) = apply_step(step, vk, &mut summary) {
                log::warn!("rejected scenario step {} ({:?}): {}", number, step, source);
                return Err(ScenarioError::InvalidStep {
                    step: number,
                    source,
                });
            }
            summary.steps += 1;
        }

        summary.events = vk.log().len() - events_before;
        log::debug!("scenario finished: {}", summary);
        Ok(summary)
    }
}

fn apply_step(
    step: &Step,
    vk: &mut VirtualKeyboard,
    summary: &mut ScenarioSummary,
) -> Result<(), LayoutError> {
    match *step {
        Step::Keystate { row, col, state } => {
            let position = KeyPosition::new(row, col)?;
            vk.matrix_mut().set_keystate(position, state);
        }
        Step::Scan { cycles } => {
            for _ in 0..cycles {
                summary.keyswitch_events += vk.run_cycle().len();
                summary.cycles += 1;
            }
        }
        Step::Mask { row, col } => {
            let position = KeyPosition::new(row, col)?;
            vk.matrix_mut().mask_key(position);
        }
        Step::Unmask { row, col } => {
            let position = KeyPosition::new(row, col)?;
            vk.matrix_mut().unmask_key(position);
        }
        Step::MaskHeld => vk.matrix_mut().mask_held_keys(),

        Step::KeyPress { code } => {
            if !vk.keyboard_mut().press(code) {
                log::debug!("ignored keyboard press of {:#04x}", code);
            }
        }
        Step::KeyRelease { code } => {
            vk.keyboard_mut().release(code);
        }
        Step::KeyReleaseAll => vk.keyboard_mut().release_all(),
        Step::KeySend => {
            vk.keyboard_mut().send_report();
        }

        Step::MouseMove {
            x,
            y,
            v_wheel,
            h_wheel,
        } => vk.mouse_mut().move_by(x, y, v_wheel, h_wheel),
        Step::MousePress { ref buttons } => vk.mouse_mut().press(mouse_buttons(buttons)),
        Step::MouseRelease { ref buttons } => vk.mouse_mut().release(mouse_buttons(buttons)),
        Step::MouseClick { ref buttons } => vk.mouse_mut().click(mouse_buttons(buttons)),
        Step::MouseSend => {
            vk.mouse_mut().send_report();
        }

        Step::ConsumerPress { code } => {
            vk.consumer_control_mut().press(code);
        }
        Step::ConsumerRelease { code } => vk.consumer_control_mut().release(code),
        Step::ConsumerWrite { code } => vk.consumer_control_mut().write(code),
        Step::ConsumerSend => {
            vk.consumer_control_mut().send_report();
        }

        Step::SystemPress { code } => vk.system_control_mut().press(code),
        Step::SystemRelease => vk.system_control_mut().release(),

        Step::SetLed { index, r, g, b } => {
            vk.leds_mut().set_crgb_at_index(index, Crgb::new(r, g, b))?;
        }
        Step::SyncLeds => vk.leds_mut().sync_leds(),
    }
    Ok(())
}
