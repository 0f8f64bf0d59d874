#[cfg(feature = "attiny85")]
pub mod attiny85;

#[cfg(feature = "attiny85")]
pub use attiny85::*;
