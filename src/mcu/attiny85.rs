// ATtiny85 wiring:
//   PB0 LED4 (center), PB1 LED1, PB2 LED2, PB3 LED3
//   PB4 button, pull-down + RC low-pass, high while pressed (PCINT4)
use attiny_hal::pac::{CPU, EXINT, TC0};
use attiny_hal::port::{
    mode::{Floating, Input, Output},
    Pin, PB0, PB1, PB2, PB3, PB4,
};
use digital_dice::{Button, LedBank, LedPattern, Platform, Prescale, SleepDepth};

type Leds = LedBank<Pin<Output, PB0>, Pin<Output, PB1>, Pin<Output, PB2>, Pin<Output, PB3>>;
type ButtonPin = Pin<Input<Floating>, PB4>;

const BUTTON_PCINT: u8 = 4;

pub struct Board {
    tc0: TC0,
    cpu: CPU,
    leds: Leds,
    button: Button<ButtonPin>,
}

impl Board {
    pub fn new(tc0: TC0, cpu: CPU, exint: EXINT, pins: attiny_hal::Pins) -> Self {
        let leds = LedBank::new(
            pins.pb0.into_output(),
            pins.pb1.into_output(),
            pins.pb2.into_output(),
            pins.pb3.into_output(),
        );
        let button = Button::new(pins.pb4.into_floating_input());

        // normal mode, counter stopped until the first press
        tc0.tccr0a().reset();
        tc0.tccr0b().write(|w| w.cs0().no_clock());

        // wake on any edge of the button line
        exint.pcmsk().write(|w| unsafe { w.bits(1 << BUTTON_PCINT) });
        exint.gimsk().modify(|_, w| w.pcie().set_bit());

        // ADC is never used
        cpu.prr().write(|w| w.pradc().set_bit());

        let mut board = Board {
            tc0,
            cpu,
            leds,
            button,
        };
        board.select_sleep(SleepDepth::Deep);
        board
    }

    /// Sets or clears SE around the `sleep` instruction.
    pub fn sleep_enable(&mut self, enabled: bool) {
        self.cpu.mcucr().modify(|_, w| w.se().bit(enabled));
    }
}

impl Platform for Board {
    #[inline(always)]
    fn counter_stop(&mut self) {
        self.tc0.tccr0b().write(|w| w.cs0().no_clock());
        // drop an overflow that raced the stop so it can't fire under the next mode
        self.tc0.tifr().write(|w| w.tov0().set_bit());
    }

    #[inline(always)]
    fn counter_load(&mut self, value: u8) {
        self.tc0.tcnt0().write(|w| w.set(value));
    }

    #[inline(always)]
    fn counter_value(&self) -> u8 {
        self.tc0.tcnt0().read().bits()
    }

    fn counter_start(&mut self, prescale: Prescale) {
        self.tc0.tccr0b().write(|w| match prescale {
            Prescale::Div1 => w.cs0().direct(),
            Prescale::Div1024 => w.cs0().prescale_1024(),
        });
    }

    fn overflow_interrupt(&mut self, enabled: bool) {
        self.tc0.timsk().write(|w| w.toie0().bit(enabled));
    }

    fn show(&mut self, pattern: LedPattern) {
        self.leds.show(pattern);
    }

    fn button_pressed(&mut self) -> bool {
        self.button.is_pressed()
    }

    fn select_sleep(&mut self, depth: SleepDepth) {
        self.cpu.mcucr().modify(|_, w| match depth {
            SleepDepth::Light => w.sm().idle(),
            SleepDepth::Deep => w.sm().pdown(),
        });
    }
}
