#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

#[cfg(target_arch = "avr")]
mod mcu;
#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
use digital_dice::{Die, SharedDie};

#[cfg(target_arch = "avr")]
static DIE: SharedDie<mcu::Board> = SharedDie::new();

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    // SAFETY: the peripherals are taken exactly once, here
    let dp = unsafe { attiny_hal::Peripherals::steal() };
    let pins = attiny_hal::pins!(dp);

    let board = mcu::Board::new(dp.TC0, dp.CPU, dp.EXINT, pins);
    DIE.install(Die::new(board));

    // SAFETY: not called from within a critical section
    unsafe { avr_device::interrupt::enable() };

    // handlers pick the sleep mode, the loop only ever goes back to sleep
    loop {
        DIE.with(|die| die.hw_mut().sleep_enable(true));
        avr_device::asm::sleep();
        DIE.with(|die| die.hw_mut().sleep_enable(false));
    }
}

#[cfg(target_arch = "avr")]
#[avr_device::interrupt(attiny85)]
fn PCINT0() {
    DIE.on_pin_change();
}

#[cfg(target_arch = "avr")]
#[avr_device::interrupt(attiny85)]
fn TIMER0_OVF() {
    DIE.on_overflow();
}

// Off-target the binary runs a few rolls on the simulated board. The controller
// trace is only printed when built with `--features trace`.
#[cfg(not(target_arch = "avr"))]
fn main() -> std::io::Result<()> {
    use digital_dice::config::REFERENCE_CLOCK_HZ;
    use digital_dice::sim::Simulator;
    use std::io::Write;

    struct Stdout(std::io::Stdout);

    impl ufmt::uWrite for Stdout {
        type Error = std::io::Error;

        fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
            self.0.write_all(s.as_bytes())
        }
    }

    // display hold at the reference clock is ~7 s
    const HOLD_LIMIT_MS: u64 = 10_000;

    const CYCLES_PER_MS: u64 = REFERENCE_CLOCK_HZ as u64 / 1000;

    let mut out = Stdout(std::io::stdout());
    let mut sim = Simulator::new();

    for hold_ms in [180u64, 420, 95, 1300] {
        let face = sim.roll(hold_ms * CYCLES_PER_MS);
        ufmt::uwriteln!(&mut out, "held {}ms -> {}", hold_ms, face)?;

        let slept = sim.run_until_sleep(HOLD_LIMIT_MS * CYCLES_PER_MS);
        sim.die().trace().dump(&mut out)?;
        ufmt::uwriteln!(&mut out, "powered down: {:?}\n", slept)?;
        sim.die_mut().clear_trace();
    }

    Ok(())
}
