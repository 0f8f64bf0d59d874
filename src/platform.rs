use crate::config::Prescale;
use crate::display::LedPattern;

/// How much of the chip stays powered while the core idles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ufmt::derive::uDebug)]
pub enum SleepDepth {
    /// Clocks keep running so the counter can count.
    Light,
    /// Everything stops; only a pin change wakes the core.
    Deep,
}

/// Hardware the die controller drives from its interrupt handlers.
///
/// Implementations are only called from interrupt context (or with
/// interrupts disabled), so none of these need their own locking.
pub trait Platform {
    /// Halts the counter clock.
    fn counter_stop(&mut self);
    fn counter_load(&mut self, value: u8);
    fn counter_value(&self) -> u8;
    /// Starts counting with the given clock source.
    fn counter_start(&mut self, prescale: Prescale);
    fn overflow_interrupt(&mut self, enabled: bool);

    fn show(&mut self, pattern: LedPattern);

    /// Level of the control input, high while pressed.
    fn button_pressed(&mut self) -> bool;

    /// Sleep mode the next idle entry will use.
    fn select_sleep(&mut self, depth: SleepDepth);
}
