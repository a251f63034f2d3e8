// Vkbd LED Store
// Per-LED color state, emitted as a full snapshot on every sync

use serde::{Deserialize, Serialize};

use crate::layout::{KeyPosition, LayoutError, LED_COUNT};
use crate::sink::{EventSink, SharedLog};

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Crgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Crgb {
    pub const OFF: Crgb = Crgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color state of every LED.
///
/// LEDs share the row-major position convention of the key matrix, so the
/// LED under `(row, col)` is `row * MATRIX_COLUMNS + col`.
#[derive(Debug, Clone)]
pub struct LedStore {
    leds: [Crgb; LED_COUNT],
    log: SharedLog,
}

impl LedStore {
    /// Create a store with every LED off
    pub fn new(log: SharedLog) -> Self {
        Self {
            leds: [Crgb::OFF; LED_COUNT],
            log,
        }
    }

    pub fn set_crgb_at(&mut self, position: KeyPosition, color: Crgb) {
        self.leds[position.offset()] = color;
    }

    pub fn crgb_at(&self, position: KeyPosition) -> Crgb {
        self.leds[position.offset()]
    }

    pub fn set_crgb_at_index(&mut self, index: usize, color: Crgb) -> Result<(), LayoutError> {
        let led = self
            .leds
            .get_mut(index)
            .ok_or(LayoutError::LedOutOfRange(index))?;
        *led = color;
        Ok(())
    }

    pub fn crgb_at_index(&self, index: usize) -> Result<Crgb, LayoutError> {
        self.leds
            .get(index)
            .copied()
            .ok_or(LayoutError::LedOutOfRange(index))
    }

    /// All LED colors in index order
    pub fn leds(&self) -> &[Crgb] {
        &self.leds
    }

    /// The LED array as r, g, b bytes per LED
    pub fn to_bytes(&self) -> Vec<u8> {
        self.leds.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    /// Hand the whole LED array to the event sink.
    ///
    /// Every call emits, whether or not any color changed.
    pub fn sync_leds(&mut self) {
        let payload = self.to_bytes();
        self.log.led_sync(&payload);
        log::debug!("synced {} LEDs", LED_COUNT);
    }
}
