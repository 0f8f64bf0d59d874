// Single active-high control input. Debouncing is done by the RC filter on the
// board, so the level read inside the pin-change interrupt is trusted as-is.
use core::convert::Infallible;
use embedded_hal::digital::InputPin;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ufmt::derive::uDebug)]
pub enum Level {
    Released,
    Pressed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ufmt::derive::uDebug)]
pub enum Edge {
    /// Released -> Pressed
    Rising,
    /// Pressed -> Released
    Falling,
}

impl Level {
    #[inline(always)]
    pub fn from_high(high: bool) -> Self {
        if high {
            Level::Pressed
        } else {
            Level::Released
        }
    }

    /// The edge that led to this level.
    #[inline(always)]
    pub fn edge(self) -> Edge {
        match self {
            Level::Pressed => Edge::Rising,
            Level::Released => Edge::Falling,
        }
    }
}

pub struct Button<P>
where
    P: InputPin<Error = Infallible>,
{
    pin: P,
}

impl<P> Button<P>
where
    P: InputPin<Error = Infallible>,
{
    pub fn new(pin: P) -> Self {
        Button { pin }
    }

    pub fn level(&mut self) -> Level {
        let Ok(high) = self.pin.is_high();
        Level::from_high(high)
    }

    pub fn is_pressed(&mut self) -> bool {
        self.level() == Level::Pressed
    }
}
