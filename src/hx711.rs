//! Bit-banged hx711 reader over embedded-hal pins.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::trace;

use crate::adc::{AdcReader, Channel, TimeoutError};

pub const HX711_MINIMUM: i32 = -(2i32.pow(24 - 1));
pub const HX711_MAXIMUM: i32 = 2i32.pow(24 - 1) - 1;
const HX711_DELAY_TIME_US: u32 = 1;
const READY_POLL_INTERVAL_MS: u32 = 1;
/// Powered down after SCK has been held high this long.
const POWER_DOWN_TIME_US: u32 = 60;

pub const DEFAULT_MAX_WAIT_MS: u32 = 1000;

/// Channel and gain of the next conversion, selected by the number of extra
/// clock pulses after the 24 data bits.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GainMode {
    A128 = 1, // extra pulses
    B32 = 2,
    A64 = 3,
}

impl GainMode {
    fn pulses(self) -> u8 {
        self as u8
    }

    pub fn channel(self) -> Channel {
        match self {
            GainMode::A128 | GainMode::A64 => Channel::A,
            GainMode::B32 => Channel::B,
        }
    }
}

/// Reads the chip on already-configured pins. Pin setup is the caller's job.
pub struct Hx711<SckPin, DtPin, Delay> {
    sck_pin: SckPin,
    dt_pin: DtPin,
    delay: Delay,
    gain_mode: GainMode,
    /// A64 is the channel A gain used the next time channel A is selected.
    gain_a: GainMode,
    max_wait_ms: u32,
}

impl<SckPin, DtPin, Delay> Hx711<SckPin, DtPin, Delay>
where
    SckPin: OutputPin<Error = Infallible>,
    DtPin: InputPin<Error = Infallible>,
    Delay: DelayNs,
{
    /// The chip powers up in channel A, gain 128.
    pub fn new(mut sck_pin: SckPin, dt_pin: DtPin, delay: Delay) -> Self {
        infallible(sck_pin.set_low());
        Self {
            sck_pin,
            dt_pin,
            delay,
            gain_mode: GainMode::A128,
            gain_a: GainMode::A128,
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
        }
    }

    /// How long [`get_value`](AdcReader::get_value) waits for a conversion.
    pub fn set_max_wait_ms(&mut self, max_wait_ms: u32) {
        self.max_wait_ms = max_wait_ms;
    }

    pub fn get_max_wait_ms(&self) -> u32 {
        self.max_wait_ms
    }

    pub fn get_gain_mode(&self) -> GainMode {
        self.gain_mode
    }

    /// Pick the gain for channel A conversions. Takes effect on the next
    /// channel A read.
    pub fn set_channel_a_gain(&mut self, gain: GainMode) {
        if gain.channel() == Channel::A {
            self.gain_a = gain;
        }
    }

    pub fn is_ready(&mut self) -> bool {
        // if the dt pin is low, device is ready for read
        infallible(self.dt_pin.is_low())
    }

    pub fn power_down(&mut self) {
        infallible(self.sck_pin.set_low());
        infallible(self.sck_pin.set_high());
        self.delay.delay_us(POWER_DOWN_TIME_US);
    }

    /// Wake the chip. It resets to channel A, gain 128.
    pub fn power_up(&mut self) {
        infallible(self.sck_pin.set_low());
        self.gain_mode = GainMode::A128;
    }

    pub fn release(self) -> (SckPin, DtPin, Delay) {
        (self.sck_pin, self.dt_pin, self.delay)
    }

    fn wait_ready(&mut self) -> Result<(), TimeoutError> {
        let mut waited_ms = 0;
        while !self.is_ready() {
            if waited_ms >= self.max_wait_ms {
                return Err(TimeoutError);
            }
            self.delay.delay_ms(READY_POLL_INTERVAL_MS);
            waited_ms += READY_POLL_INTERVAL_MS;
        }
        Ok(())
    }

    /// Clock out one conversion and select `next` for the one after it.
    fn read_raw(&mut self, next: GainMode) -> Result<i32, TimeoutError> {
        self.wait_ready()?;

        let mut value: u32 = 0;
        // bits arrive MSB first
        for _ in 0..24 {
            value = (value << 1) | u32::from(self.read_bit());
        }
        for _ in 0..next.pulses() {
            self.toggle_sck_bit();
        }
        self.gain_mode = next;

        // 24 bit two's complement, fill the top byte with the sign
        if value & 0x80_0000 != 0 {
            value |= 0xFF00_0000;
        }
        Ok(value as i32)
    }

    fn read_bit(&mut self) -> bool {
        infallible(self.sck_pin.set_high());
        self.delay.delay_us(HX711_DELAY_TIME_US);
        let pin_state = infallible(self.dt_pin.is_high());
        infallible(self.sck_pin.set_low());
        self.delay.delay_us(HX711_DELAY_TIME_US);
        pin_state
    }

    fn toggle_sck_bit(&mut self) {
        infallible(self.sck_pin.set_high());
        self.delay.delay_us(HX711_DELAY_TIME_US);
        infallible(self.sck_pin.set_low());
        self.delay.delay_us(HX711_DELAY_TIME_US);
    }
}

impl<SckPin, DtPin, Delay> AdcReader for Hx711<SckPin, DtPin, Delay>
where
    SckPin: OutputPin<Error = Infallible>,
    DtPin: InputPin<Error = Infallible>,
    Delay: DelayNs,
{
    fn get_value(&mut self, channel: Channel) -> Result<i32, TimeoutError> {
        let wanted = match channel {
            Channel::A => self.gain_a,
            Channel::B => GainMode::B32,
        };
        if wanted != self.gain_mode {
            // the pending conversion was taken with the old gain
            trace!("switching hx711 gain {:?} -> {:?}", self.gain_mode, wanted);
            self.read_raw(wanted)?;
        }
        self.read_raw(wanted)
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Models the chip: shifts queued conversions out on SCK and records the
    /// gain pulses that follow each one. SCK going high while no conversion
    /// was announced puts it to sleep; SCK low wakes it.
    #[derive(Default)]
    struct Chip {
        pending: VecDeque<i32>,
        shifting: Option<u32>,
        announced: bool,
        pulses: u32,
        dout: bool,
        gains: Vec<u32>,
        sleeping: bool,
    }

    impl Chip {
        fn ready(&mut self) -> bool {
            if self.shifting.take().is_some() {
                self.gains.push(self.pulses - 24);
                self.pulses = 0;
            }
            self.announced = !self.sleeping && !self.pending.is_empty();
            self.announced
        }

        fn clock_high(&mut self) {
            if self.sleeping {
                return;
            }
            if self.shifting.is_none() {
                if !self.announced {
                    self.sleeping = true;
                    return;
                }
                self.announced = false;
                self.shifting = self.pending.pop_front().map(|v| v as u32 & 0xFF_FFFF);
            }
            self.pulses += 1;
            if let Some(bits) = self.shifting {
                self.dout = self.pulses <= 24 && (bits >> (24 - self.pulses)) & 1 == 1;
            }
        }
    }

    struct Sck(Rc<RefCell<Chip>>);
    struct Dt(Rc<RefCell<Chip>>);
    struct NoDelay(Rc<RefCell<u64>>);

    impl embedded_hal::digital::ErrorType for Sck {
        type Error = Infallible;
    }

    impl OutputPin for Sck {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().sleeping = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().clock_high();
            Ok(())
        }
    }

    impl embedded_hal::digital::ErrorType for Dt {
        type Error = Infallible;
    }

    impl InputPin for Dt {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.borrow().dout)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.borrow_mut().ready())
        }
    }

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, ns: u32) {
            *self.0.borrow_mut() += u64::from(ns);
        }
    }

    fn hx711(samples: &[i32]) -> (Hx711<Sck, Dt, NoDelay>, Rc<RefCell<Chip>>, Rc<RefCell<u64>>) {
        let chip = Rc::new(RefCell::new(Chip {
            pending: samples.iter().copied().collect(),
            ..Chip::default()
        }));
        let waited = Rc::new(RefCell::new(0));
        let hx = Hx711::new(Sck(chip.clone()), Dt(chip.clone()), NoDelay(waited.clone()));
        (hx, chip, waited)
    }

    #[test]
    fn reads_signed_24_bit_values() {
        let (mut hx, _, _) = hx711(&[1, -1, HX711_MAXIMUM, HX711_MINIMUM, 0x12_3456]);
        assert_eq!(hx.get_value(Channel::A), Ok(1));
        assert_eq!(hx.get_value(Channel::A), Ok(-1));
        assert_eq!(hx.get_value(Channel::A), Ok(HX711_MAXIMUM));
        assert_eq!(hx.get_value(Channel::A), Ok(HX711_MINIMUM));
        assert_eq!(hx.get_value(Channel::A), Ok(0x12_3456));
    }

    #[test]
    fn sends_gain_pulses() {
        let (mut hx, chip, _) = hx711(&[5, 6]);
        hx.get_value(Channel::A).unwrap();
        hx.get_value(Channel::A).unwrap();
        hx.is_ready();
        assert_eq!(chip.borrow().gains, vec![1, 1]);
    }

    #[test]
    fn switching_channel_discards_one_conversion() {
        let (mut hx, chip, _) = hx711(&[111, 222, 333]);
        assert_eq!(hx.get_value(Channel::B), Ok(222));
        assert_eq!(hx.get_gain_mode(), GainMode::B32);
        assert_eq!(hx.get_value(Channel::B), Ok(333));
        hx.is_ready();
        assert_eq!(chip.borrow().gains, vec![2, 2, 2]);
    }

    #[test]
    fn channel_a_gain_64() {
        let (mut hx, chip, _) = hx711(&[7, 8]);
        hx.set_channel_a_gain(GainMode::A64);
        hx.set_channel_a_gain(GainMode::B32);
        assert_eq!(hx.get_value(Channel::A), Ok(8));
        assert_eq!(hx.get_gain_mode(), GainMode::A64);
        hx.is_ready();
        assert_eq!(chip.borrow().gains, vec![3, 3]);
    }

    #[test]
    fn times_out_when_never_ready() {
        let (mut hx, _, waited) = hx711(&[]);
        hx.set_max_wait_ms(20);
        assert_eq!(hx.get_value(Channel::A), Err(TimeoutError));
        assert_eq!(*waited.borrow(), 20 * 1_000_000);
    }

    #[test]
    fn sleeping_chip_times_out() {
        let (mut hx, chip, _) = hx711(&[1]);
        hx.power_down();
        assert!(chip.borrow().sleeping);
        hx.set_max_wait_ms(5);
        assert_eq!(hx.get_value(Channel::A), Err(TimeoutError));
        hx.power_up();
        assert!(!chip.borrow().sleeping);
        assert_eq!(hx.get_value(Channel::A), Ok(1));
    }

    #[test]
    fn drives_a_scale() {
        use crate::{LoadCell, ReadType, SimpleHx711, Unit};

        let (hx, _, _) = hx711(&[-500, -500, -500, 1500, 1490, 1510]);
        let mut scale = SimpleHx711::new(hx, 20);
        scale.tare(ReadType::Median, 3).unwrap();
        assert_eq!(scale.get_offset(), -500);

        scale.set_unit(Unit::G);
        let weight = scale.weight(ReadType::Median, 3).unwrap();
        assert_eq!(weight.get_value(Unit::G), 100.0);
    }
}
