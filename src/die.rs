//! Power-phase controller: the two interrupt handlers and the state they share.
use crate::button::{Edge, Level};
use crate::config::Calibration;
use crate::display::{encode, LedPattern};
use crate::platform::{Platform, SleepDepth};
use crate::timer::{EntropyTimer, TimerMode};
use crate::trace::{TraceEvent, TraceLog};

pub const NUM_FACES: u8 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ufmt::derive::uDebug)]
pub enum Phase {
    /// Display blank, counter stopped, core powered down.
    DeepSleep,
    /// Button held, counter running unprescaled, display rolling.
    ArmedCollecting,
    /// Result shown, counter timing the display hold.
    DisplayingCountingDown,
}

/// Face for an arbitrary byte, always in 1..=6.
#[inline(always)]
pub const fn face_of(value: u8) -> u8 {
    value % NUM_FACES + 1
}

pub struct Die<P: Platform> {
    hw: P,
    calibration: Calibration,
    timer: EntropyTimer,
    animation_phase: u8,
    // raw xor mix, carried across presses as the next seed
    mix: u8,
    trace: TraceLog,
}

impl<P: Platform> Die<P> {
    pub fn new(hw: P) -> Self {
        Self::with_calibration(hw, Calibration::REFERENCE)
    }

    /// Takes ownership of the hardware, blanks the display and selects deep sleep.
    pub fn with_calibration(mut hw: P, calibration: Calibration) -> Self {
        hw.show(LedPattern::BLANK);
        hw.select_sleep(SleepDepth::Deep);
        Die {
            hw,
            calibration,
            timer: EntropyTimer::new(),
            animation_phase: 0,
            mix: 0,
            trace: TraceLog::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.timer.mode() {
            None => Phase::DeepSleep,
            Some(TimerMode::EntropyCollect) => Phase::ArmedCollecting,
            Some(TimerMode::IdleTimeout) => Phase::DisplayingCountingDown,
        }
    }

    /// Most recently rolled face.
    #[inline(always)]
    pub fn last_result(&self) -> u8 {
        face_of(self.mix)
    }

    /// Seed the next press will arm the counter with.
    #[inline(always)]
    pub fn seed(&self) -> u8 {
        self.mix
    }

    #[inline(always)]
    pub fn animation_phase(&self) -> u8 {
        self.animation_phase
    }

    pub fn timer(&self) -> &EntropyTimer {
        &self.timer
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    pub fn hw(&self) -> &P {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut P {
        &mut self.hw
    }

    /// Pin-change handler. Direction is taken from the level at interrupt time.
    pub fn on_pin_change(&mut self) {
        let edge = Level::from_high(self.hw.button_pressed()).edge();
        self.on_edge(edge);
    }

    pub fn on_edge(&mut self, edge: Edge) {
        match edge {
            Edge::Rising => self.press(),
            Edge::Falling => self.release(),
        }
    }

    fn press(&mut self) {
        self.animation_phase = 0;
        self.timer.arm(&mut self.hw, TimerMode::EntropyCollect, self.mix);
        // counter has to keep running while the core idles
        self.hw.select_sleep(SleepDepth::Light);
        self.trace.record(TraceEvent::Armed {
            mode: TimerMode::EntropyCollect,
            seed: self.mix,
        });
    }

    fn release(&mut self) {
        let counter = self.timer.sample(&self.hw);
        self.mix ^= counter;
        let face = face_of(self.mix);
        self.hw.show(encode(face));
        self.timer.arm(&mut self.hw, TimerMode::IdleTimeout, 0);
        self.trace.record(TraceEvent::Released {
            counter,
            mix: self.mix,
            face,
        });
    }

    /// Counter overflow handler.
    pub fn on_overflow(&mut self) {
        let Some(mode) = self.timer.overflow() else {
            return;
        };

        match mode {
            TimerMode::IdleTimeout => {
                if self.timer.extension() >= self.calibration.display_hold_overflows {
                    self.timer.disarm(&mut self.hw);
                    self.hw.show(LedPattern::BLANK);
                    self.hw.select_sleep(SleepDepth::Deep);
                    self.trace.record(TraceEvent::TimedOut);
                }
            }
            TimerMode::EntropyCollect => {
                if self.timer.extension() >= self.calibration.animation_overflows {
                    self.animation_phase = self.animation_phase.wrapping_add(1);
                    let face = face_of(self.animation_phase);
                    self.hw.show(encode(face));
                    self.timer.restart_extension();
                    self.trace.record(TraceEvent::AnimationTick { face });
                }
            }
        }
    }
}
