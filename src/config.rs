// Timing calibration for the entropy timer. These are measured values for the
// reference oscillator, not derived at runtime.

/// Core clock the overflow thresholds were calibrated against.
pub const REFERENCE_CLOCK_HZ: u32 = 9_600_000;

/// Ticks per hardware counter overflow (8-bit counter).
pub const COUNTER_PERIOD: u32 = 256;

/// Counter clock source, relative to the core clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ufmt::derive::uDebug)]
pub enum Prescale {
    /// Core clock, finest grain.
    Div1,
    /// Core clock / 1024.
    Div1024,
}

impl Prescale {
    pub const fn divisor(self) -> u32 {
        match self {
            Prescale::Div1 => 1,
            Prescale::Div1024 => 1024,
        }
    }
}

/// Overflow thresholds for the two timer modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calibration {
    /// Overflows between animation frames while the button is held (~1/6 s).
    pub animation_overflows: u16,
    /// Overflows before the result is blanked and the die powers down (~7 s).
    pub display_hold_overflows: u16,
}

impl Calibration {
    pub const REFERENCE: Calibration = Calibration {
        animation_overflows: 6300,
        display_hold_overflows: 255,
    };
}

impl Default for Calibration {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Nominal time between two counter overflows at the reference clock.
pub const fn overflow_period_ns(prescale: Prescale) -> u64 {
    COUNTER_PERIOD as u64 * prescale.divisor() as u64 * 1_000_000_000 / REFERENCE_CLOCK_HZ as u64
}
