//! Calibrated measurements on top of an [`AdcReader`].

use log::{debug, trace};

use crate::adc::{read_values, AdcReader, Channel};
use crate::error::{Error, Result};
use crate::mass::{Mass, Unit};
use crate::reducer::{self, ReadType};
use crate::LoadCell;

/// Samples per read when the caller has no better number.
pub const DEFAULT_TIMES: usize = 3;

/// Starting calibration for a [`SimpleHx711`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleConfig {
    /// Raw counts per display unit
    pub reference_unit: i32,
    /// Channel to sample
    pub channel: Channel,
    /// Unit weights are reported in
    pub unit: Unit,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            reference_unit: 1,
            channel: Channel::A,
            unit: Unit::G,
        }
    }
}

impl ScaleConfig {
    pub const fn with_reference_unit(mut self, reference_unit: i32) -> Self {
        self.reference_unit = reference_unit;
        self
    }

    pub const fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }
}

/// A load cell scale: reads batches from `R`, reduces them and applies
/// `(reduced - offset) / reference_unit`.
///
/// The offset starts at 0 and can only be changed by [`LoadCell::tare`].
/// There is no internal locking; share one scale between threads only
/// behind a mutex.
pub struct SimpleHx711<R> {
    reader: R,
    unit: Unit,
    channel: Channel,
    reference_unit: i32,
    offset: i32,
}

impl<R: AdcReader> SimpleHx711<R> {
    pub fn new(reader: R, reference_unit: i32) -> Self {
        Self::with_config(
            reader,
            ScaleConfig::default().with_reference_unit(reference_unit),
        )
    }

    pub fn with_config(reader: R, config: ScaleConfig) -> Self {
        Self {
            reader,
            unit: config.unit,
            channel: config.channel,
            reference_unit: config.reference_unit,
            offset: 0,
        }
    }

    /// Give the reader back.
    pub fn release(self) -> R {
        self.reader
    }

    pub fn get_unit(&self) -> Unit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn get_channel(&self) -> Channel {
        self.channel
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    /// Standard deviation of a fresh batch, in calibrated units.
    ///
    /// Diagnostic only: nothing filters readings with it.
    pub fn noise(&mut self, times: usize) -> Result<f64> {
        if self.reference_unit == 0 {
            return Err(Error::DivisionByZero);
        }
        let values = read_values(&mut self.reader, self.channel, times)?;
        let spread = reducer::std_dev(&values)?;
        Ok(spread / f64::from(self.reference_unit).abs())
    }

    fn read_scaled(
        &mut self,
        read_type: ReadType,
        times: usize,
        offset: i32,
        reference_unit: i32,
    ) -> Result<f64> {
        if reference_unit == 0 {
            return Err(Error::DivisionByZero);
        }

        let mut values = read_values(&mut self.reader, self.channel, times)?;
        let reduced = read_type.reduce(&mut values)?;
        let scaled = (reduced - f64::from(offset)) / f64::from(reference_unit);
        trace!("reduced = {reduced} scaled = {scaled}");

        Ok(scaled)
    }
}

impl<R: AdcReader> LoadCell for SimpleHx711<R> {
    type Error = Error;

    fn read(&mut self, read_type: ReadType, times: usize) -> Result<f64> {
        self.read_scaled(read_type, times, self.offset, self.reference_unit)
    }

    fn weight(&mut self, read_type: ReadType, times: usize) -> Result<Mass> {
        let amount = self.read(read_type, times)?;
        Ok(Mass::new(amount, self.unit))
    }

    /// Measures unscaled and without the previous offset, so the stored
    /// offset is in raw counts. The calibrated reference unit is left
    /// untouched, even when the measurement fails.
    fn tare(&mut self, read_type: ReadType, times: usize) -> Result<()> {
        let raw = self.read_scaled(read_type, times, 0, 1)?;
        self.offset = raw.round() as i32;
        debug!("tare offset = {}", self.offset);
        Ok(())
    }

    fn get_offset(&self) -> i32 {
        self.offset
    }

    fn set_reference_unit(&mut self, reference_unit: i32) {
        self.reference_unit = reference_unit;
    }

    fn get_reference_unit(&self) -> i32 {
        self.reference_unit
    }
}
