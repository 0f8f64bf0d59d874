//! Cycle-level stand-in for the board, used by the tests and the host binary.
use crate::config::{Calibration, Prescale, COUNTER_PERIOD, REFERENCE_CLOCK_HZ};
use crate::die::{Die, Phase};
use crate::display::LedPattern;
use crate::platform::{Platform, SleepDepth};

#[derive(Debug)]
pub struct SimBoard {
    counter: u8,
    // core cycles since the last counter tick
    residue: u32,
    prescale: Option<Prescale>,
    overflow_enabled: bool,
    // TOV flag: set on wrap, cleared by delivery or by stopping the counter
    overflow_pending: bool,
    // counter writes made while it was still running
    live_writes: u32,
    pattern: LedPattern,
    show_count: u32,
    sleep_depth: SleepDepth,
    button: bool,
}

impl SimBoard {
    pub const fn new() -> Self {
        SimBoard {
            counter: 0,
            residue: 0,
            prescale: None,
            overflow_enabled: false,
            overflow_pending: false,
            live_writes: 0,
            pattern: LedPattern::BLANK,
            show_count: 0,
            sleep_depth: SleepDepth::Deep,
            button: false,
        }
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    pub fn set_counter(&mut self, value: u8) {
        self.counter = value;
        self.residue = 0;
    }

    /// Clock source of the running counter, `None` while stopped.
    pub fn prescale(&self) -> Option<Prescale> {
        self.prescale
    }

    pub fn overflow_enabled(&self) -> bool {
        self.overflow_enabled
    }

    pub fn pattern(&self) -> LedPattern {
        self.pattern
    }

    pub fn show_count(&self) -> u32 {
        self.show_count
    }

    pub fn sleep_depth(&self) -> SleepDepth {
        self.sleep_depth
    }

    pub fn set_button(&mut self, pressed: bool) {
        self.button = pressed;
    }

    /// Core cycles until the counter next wraps, `None` while stopped.
    pub fn cycles_to_overflow(&self) -> Option<u64> {
        let divisor = self.prescale?.divisor() as u64;
        let ticks = COUNTER_PERIOD as u64 - self.counter as u64;
        Some(ticks * divisor - self.residue as u64)
    }

    pub fn overflow_pending(&self) -> bool {
        self.overflow_pending
    }

    /// Latches an overflow as if the counter wrapped while a handler was running.
    pub fn latch_overflow(&mut self) {
        self.overflow_pending = true;
    }

    /// Times the counter value or clock source was written without stopping it first.
    pub fn live_writes(&self) -> u32 {
        self.live_writes
    }

    /// Clears and returns a latched overflow, if its interrupt is enabled.
    pub fn take_overflow(&mut self) -> bool {
        if !(self.overflow_pending && self.overflow_enabled) {
            return false;
        }
        self.overflow_pending = false;
        true
    }

    /// Advances the counter by `cycles` core cycles, stopping at the next wrap.
    /// Returns the cycles consumed. A wrap latches an overflow.
    pub fn advance(&mut self, cycles: u64) -> u64 {
        let (Some(prescale), Some(to_overflow)) = (self.prescale, self.cycles_to_overflow())
        else {
            return cycles;
        };

        if cycles < to_overflow {
            let divisor = prescale.divisor() as u64;
            let total = self.residue as u64 + cycles;
            self.counter = self.counter.wrapping_add((total / divisor) as u8);
            self.residue = (total % divisor) as u32;
            return cycles;
        }

        self.counter = 0;
        self.residue = 0;
        self.overflow_pending = true;
        to_overflow
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for SimBoard {
    fn counter_stop(&mut self) {
        self.prescale = None;
        self.overflow_pending = false;
    }

    fn counter_load(&mut self, value: u8) {
        if self.prescale.is_some() {
            self.live_writes += 1;
        }
        self.set_counter(value);
    }

    fn counter_value(&self) -> u8 {
        self.counter
    }

    fn counter_start(&mut self, prescale: Prescale) {
        if self.prescale.is_some() {
            self.live_writes += 1;
        }
        self.prescale = Some(prescale);
    }

    fn overflow_interrupt(&mut self, enabled: bool) {
        self.overflow_enabled = enabled;
    }

    fn show(&mut self, pattern: LedPattern) {
        self.pattern = pattern;
        self.show_count += 1;
    }

    fn button_pressed(&mut self) -> bool {
        self.button
    }

    fn select_sleep(&mut self, depth: SleepDepth) {
        self.sleep_depth = depth;
    }
}

/// Drives a [`Die`] on a [`SimBoard`] in core clock cycles.
pub struct Simulator {
    die: Die<SimBoard>,
    cycles: u64,
    overflows: u64,
}

impl Simulator {
    pub fn new() -> Self {
        Self::with_calibration(Calibration::REFERENCE)
    }

    pub fn with_calibration(calibration: Calibration) -> Self {
        Simulator {
            die: Die::with_calibration(SimBoard::new(), calibration),
            cycles: 0,
            overflows: 0,
        }
    }

    pub fn die(&self) -> &Die<SimBoard> {
        &self.die
    }

    pub fn die_mut(&mut self) -> &mut Die<SimBoard> {
        &mut self.die
    }

    pub fn board(&self) -> &SimBoard {
        self.die.hw()
    }

    pub fn phase(&self) -> Phase {
        self.die.phase()
    }

    /// Total simulated core cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Overflow interrupts delivered so far.
    pub fn overflows(&self) -> u64 {
        self.overflows
    }

    pub fn press(&mut self) {
        self.die.hw_mut().set_button(true);
        self.die.on_pin_change();
        self.deliver_overflow();
    }

    pub fn release(&mut self) {
        self.die.hw_mut().set_button(false);
        self.die.on_pin_change();
        self.deliver_overflow();
    }

    /// Runs the overflow handler if an overflow is latched and enabled.
    pub fn deliver_overflow(&mut self) -> bool {
        if !self.die.hw_mut().take_overflow() {
            return false;
        }
        self.overflows += 1;
        self.die.on_overflow();
        true
    }

    pub fn run_cycles(&mut self, mut cycles: u64) {
        while cycles > 0 {
            let used = self.die.hw_mut().advance(cycles);
            cycles -= used;
            self.cycles += used;
            self.deliver_overflow();
        }
    }

    pub fn run_ms(&mut self, ms: u64) {
        self.run_cycles(ms * (REFERENCE_CLOCK_HZ as u64 / 1000));
    }

    /// Runs overflow by overflow until the die powers down or `max_cycles`
    /// pass. Returns whether it powered down.
    pub fn run_until_sleep(&mut self, max_cycles: u64) -> bool {
        let deadline = self.cycles + max_cycles;
        while self.phase() != Phase::DeepSleep {
            let Some(step) = self.board().cycles_to_overflow() else {
                // counter stopped outside deep sleep, nothing will wake us
                return false;
            };
            if self.cycles + step > deadline {
                self.run_cycles(deadline - self.cycles);
                return self.phase() == Phase::DeepSleep;
            }
            self.run_cycles(step);
        }
        true
    }

    /// One full press: hold for `hold_cycles`, release, return the face shown.
    pub fn roll(&mut self, hold_cycles: u64) -> u8 {
        self.press();
        self.run_cycles(hold_cycles);
        self.release();
        self.die.last_result()
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
