//! Die face to LED pattern mapping.
//!
//! The seven pips are wired as four groups, each driven by one output line:
//!
//! ```text
//! ┌───┐   ┌───┐
//! │ 3 │   │ 1 │
//! ├───┼───┼───┤
//! │ 2 │ 4 │ 2 │
//! ├───┼───┼───┤
//! │ 1 │   │ 3 │
//! └───┘   └───┘
//! ```
use core::convert::Infallible;
use embedded_hal::digital::OutputPin;

/// Output lines owned by the display, as bits of a [`LedPattern`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Line {
    /// Center pip.
    Led4 = 0,
    /// Diagonal pair, top right / bottom left.
    Led1 = 1,
    /// Middle row pair.
    Led2 = 2,
    /// Diagonal pair, top left / bottom right.
    Led3 = 3,
}

impl Line {
    pub const ALL: [Line; 4] = [Line::Led4, Line::Led1, Line::Led2, Line::Led3];

    #[inline(always)]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of lit output lines. Only the low four bits are ever set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ufmt::derive::uDebug)]
pub struct LedPattern(u8);

impl LedPattern {
    pub const BLANK: LedPattern = LedPattern(0);
    pub const MASK: u8 = 0b1111;

    const FACES: [u8; 7] = [
        0,
        Line::Led4.bit(),
        Line::Led1.bit(),
        Line::Led1.bit() | Line::Led4.bit(),
        Line::Led1.bit() | Line::Led3.bit(),
        Line::Led1.bit() | Line::Led3.bit() | Line::Led4.bit(),
        Line::Led1.bit() | Line::Led2.bit() | Line::Led3.bit(),
    ];

    /// Pattern for a face value, 0 being blank. Values past 6 blank the display.
    pub const fn for_face(face: u8) -> LedPattern {
        if face as usize >= Self::FACES.len() {
            return Self::BLANK;
        }
        LedPattern(Self::FACES[face as usize])
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn is_lit(self, line: Line) -> bool {
        self.0 & line.bit() != 0
    }
}

/// Maps a face value (0 = blank, 1-6) to the lines to light.
#[inline(always)]
pub const fn encode(face: u8) -> LedPattern {
    LedPattern::for_face(face)
}

/// Four independently driven LED group outputs.
pub struct LedBank<L4, L1, L2, L3>
where
    L4: OutputPin<Error = Infallible>,
    L1: OutputPin<Error = Infallible>,
    L2: OutputPin<Error = Infallible>,
    L3: OutputPin<Error = Infallible>,
{
    led4: L4,
    led1: L1,
    led2: L2,
    led3: L3,
}

impl<L4, L1, L2, L3> LedBank<L4, L1, L2, L3>
where
    L4: OutputPin<Error = Infallible>,
    L1: OutputPin<Error = Infallible>,
    L2: OutputPin<Error = Infallible>,
    L3: OutputPin<Error = Infallible>,
{
    pub fn new(led4: L4, led1: L1, led2: L2, led3: L3) -> Self {
        let mut bank = LedBank {
            led4,
            led1,
            led2,
            led3,
        };
        bank.show(LedPattern::BLANK);
        bank
    }

    pub fn show(&mut self, pattern: LedPattern) {
        // all off first, then light the face
        let Ok(()) = self.led4.set_low();
        let Ok(()) = self.led1.set_low();
        let Ok(()) = self.led2.set_low();
        let Ok(()) = self.led3.set_low();

        for line in Line::ALL {
            if !pattern.is_lit(line) {
                continue;
            }
            let Ok(()) = match line {
                Line::Led4 => self.led4.set_high(),
                Line::Led1 => self.led1.set_high(),
                Line::Led2 => self.led2.set_high(),
                Line::Led3 => self.led3.set_high(),
            };
        }
    }
}
