//! The die lives in a static so both interrupt vectors can reach it; every
//! access goes through a critical section.
use crate::die::{Die, Phase};
use crate::platform::Platform;
use core::cell::RefCell;
use critical_section::Mutex;

pub struct SharedDie<P: Platform> {
    inner: Mutex<RefCell<Option<Die<P>>>>,
}

impl<P: Platform> SharedDie<P> {
    pub const fn new() -> Self {
        SharedDie {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Hands the die over to interrupt context. Returns the previous one, if any.
    pub fn install(&self, die: Die<P>) -> Option<Die<P>> {
        critical_section::with(|cs| self.inner.borrow(cs).replace(Some(die)))
    }

    /// Runs `f` on the installed die with interrupts held off. `None` if
    /// nothing is installed yet.
    pub fn with<R>(&self, f: impl FnOnce(&mut Die<P>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().as_mut().map(f))
    }

    /// Pin-change vector body. A no-op until a die is installed.
    #[inline(always)]
    pub fn on_pin_change(&self) {
        self.with(Die::on_pin_change);
    }

    /// Counter overflow vector body. A no-op until a die is installed.
    #[inline(always)]
    pub fn on_overflow(&self) {
        self.with(Die::on_overflow);
    }

    pub fn phase(&self) -> Option<Phase> {
        self.with(|die| die.phase())
    }
}

impl<P: Platform> Default for SharedDie<P> {
    fn default() -> Self {
        Self::new()
    }
}
