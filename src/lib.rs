//! Electronic die core: sleeps until the button is pressed, samples a
//! free-running counter while it is held, shows a face on release and powers
//! back down after the display hold.
#![cfg_attr(not(test), no_std)]

pub mod button;
pub mod config;
pub mod die;
pub mod display;
pub mod platform;
pub mod shared;
pub mod sim;
pub mod timer;
pub mod trace;

pub use button::{Button, Edge, Level};
pub use config::{Calibration, Prescale};
pub use die::{face_of, Die, Phase};
pub use display::{encode, LedBank, LedPattern, Line};
pub use platform::{Platform, SleepDepth};
pub use shared::SharedDie;
pub use timer::{EntropyTimer, TimerMode, UnknownTimerMode};
pub use trace::{TraceEvent, TraceLog};
