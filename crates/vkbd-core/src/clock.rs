// Vkbd Scan-Cycle Clock
// Virtual time derived from the number of completed scan cycles

/// Estimated length of one scan cycle on real hardware
pub const DEFAULT_MILLIS_PER_CYCLE: u64 = 5;

/// Free-running scan-cycle counter.
///
/// Time only moves when the driver calls [`tick`](Self::tick); `millis()`
/// therefore updates once per scan cycle and tests run faster than real time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanClock {
    cycle: u64,
    millis_per_cycle: u64,
}

impl Default for ScanClock {
    fn default() -> Self {
        Self::new(DEFAULT_MILLIS_PER_CYCLE)
    }
}

impl ScanClock {
    pub fn new(millis_per_cycle: u64) -> Self {
        Self {
            cycle: 0,
            millis_per_cycle,
        }
    }

    /// Advance by one completed scan cycle, returning the new cycle
    pub fn tick(&mut self) -> u64 {
        self.cycle += 1;
        self.cycle
    }

    pub fn current_cycle(&self) -> u64 {
        self.cycle
    }

    pub fn millis_per_cycle(&self) -> u64 {
        self.millis_per_cycle
    }

    /// Wraps on overflow, like a hardware millisecond counter
    pub fn millis(&self) -> u64 {
        self.cycle.wrapping_mul(self.millis_per_cycle)
    }

    /// Wraps on overflow
    pub fn micros(&self) -> u64 {
        self.millis().wrapping_mul(1000)
    }

    /// No-op: virtual time never advances while sleeping
    pub fn delay(&self, _ms: u64) {}

    /// No-op: virtual time never advances while sleeping
    pub fn delay_microseconds(&self, _us: u64) {}
}
