//! Free-running 8-bit counter with a software overflow extension.
//!
//! The same counter doubles as entropy source (finest grain, sampled on
//! button release) and as a coarse clock for the display timeout.
use crate::config::Prescale;
use crate::platform::Platform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ufmt::derive::uDebug)]
pub enum TimerMode {
    /// Coarse ticks counting down the display hold.
    IdleTimeout,
    /// Unprescaled ticks sampled for the next roll.
    EntropyCollect,
}

impl TimerMode {
    pub const fn prescale(self) -> Prescale {
        match self {
            TimerMode::IdleTimeout => Prescale::Div1024,
            TimerMode::EntropyCollect => Prescale::Div1,
        }
    }
}

/// Raw mode tag that names no [`TimerMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownTimerMode(pub u8);

impl TryFrom<u8> for TimerMode {
    type Error = UnknownTimerMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TimerMode::IdleTimeout),
            1 => Ok(TimerMode::EntropyCollect),
            other => Err(UnknownTimerMode(other)),
        }
    }
}

#[derive(Debug, Default)]
pub struct EntropyTimer {
    mode: Option<TimerMode>,
    extension: u16,
}

impl EntropyTimer {
    pub const fn new() -> Self {
        EntropyTimer {
            mode: None,
            extension: 0,
        }
    }

    /// Mode the counter was last armed in, `None` while stopped.
    #[inline(always)]
    pub fn mode(&self) -> Option<TimerMode> {
        self.mode
    }

    #[inline(always)]
    pub fn extension(&self) -> u16 {
        self.extension
    }

    /// Stops the counter, then restarts it from `seed` in `mode`.
    pub fn arm<P: Platform>(&mut self, hw: &mut P, mode: TimerMode, seed: u8) {
        // old configuration must be gone before the new mode is visible
        hw.counter_stop();
        self.mode = Some(mode);
        self.extension = 0;
        hw.counter_load(seed);
        hw.overflow_interrupt(true);
        hw.counter_start(mode.prescale());
    }

    /// Arms from a raw mode tag. Unknown tags leave the counter stopped.
    pub fn arm_raw<P: Platform>(
        &mut self,
        hw: &mut P,
        mode: u8,
        seed: u8,
    ) -> Result<(), UnknownTimerMode> {
        match TimerMode::try_from(mode) {
            Ok(mode) => {
                self.arm(hw, mode, seed);
                Ok(())
            }
            Err(e) => {
                self.disarm(hw);
                Err(e)
            }
        }
    }

    /// Stops the counter and masks its overflow interrupt.
    pub fn disarm<P: Platform>(&mut self, hw: &mut P) {
        hw.counter_stop();
        hw.overflow_interrupt(false);
        self.mode = None;
        self.extension = 0;
    }

    /// Counts one hardware overflow. Returns the active mode, or `None` if the
    /// overflow arrived while stopped.
    pub fn overflow(&mut self) -> Option<TimerMode> {
        let mode = self.mode?;
        self.extension = self.extension.wrapping_add(1);
        Some(mode)
    }

    /// Restarts the extension count without touching the hardware counter.
    #[inline(always)]
    pub fn restart_extension(&mut self) {
        self.extension = 0;
    }

    pub fn sample<P: Platform>(&self, hw: &P) -> u8 {
        hw.counter_value()
    }
}
