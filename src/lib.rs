//! Turn raw hx711 load cell conversions into calibrated [`Mass`] readings.
//!
//! A [`SimpleHx711`] pulls a batch of raw samples from an [`AdcReader`],
//! reduces it with a median or an average, and applies
//! `(reduced - offset) / reference_unit`. The offset comes from
//! [`LoadCell::tare`]; the reference unit is the caller's calibration.
//!
//! ```
//! use hx711_scale::{AdcReader, Channel, LoadCell, ReadType, SimpleHx711, TimeoutError, Unit};
//!
//! struct Constant(i32);
//!
//! impl AdcReader for Constant {
//!     fn get_value(&mut self, _channel: Channel) -> Result<i32, TimeoutError> {
//!         Ok(self.0)
//!     }
//! }
//!
//! let mut scale = SimpleHx711::new(Constant(5_000), 10);
//! scale.set_unit(Unit::Kg);
//! assert_eq!(scale.weight(ReadType::Median, 3)?.to_string(), "500 kg");
//! # Ok::<(), hx711_scale::Error>(())
//! ```

pub mod adc;
pub mod error;
pub mod hx711;
pub mod mass;
pub mod reducer;
pub mod scale;

pub use adc::{AdcReader, Channel, TimeoutError};
pub use error::{Error, Result};
pub use mass::{Mass, Unit};
pub use reducer::ReadType;
pub use scale::{ScaleConfig, SimpleHx711, DEFAULT_TIMES};

pub trait LoadCell {
    type Error;

    /// Sample `times` values, reduce them with `read_type` and return the
    /// value after applying the offset and reference unit.
    fn read(
        &mut self,
        read_type: ReadType,
        times: usize,
    ) -> core::result::Result<f64, Self::Error>;

    /// Like [`read`](LoadCell::read), as a mass in the scale's unit.
    fn weight(
        &mut self,
        read_type: ReadType,
        times: usize,
    ) -> core::result::Result<Mass, Self::Error>;

    /// Zero the scale at the current load by storing a new offset.
    fn tare(
        &mut self,
        read_type: ReadType,
        times: usize,
    ) -> core::result::Result<(), Self::Error>;

    /// Get the load cell offset, in raw counts.
    fn get_offset(&self) -> i32;

    /// Set the reference unit (AKA calibrate the scale).
    /// Use this to ensure that 1kg ~ 1kg
    fn set_reference_unit(&mut self, reference_unit: i32);

    /// Get the reference unit.
    fn get_reference_unit(&self) -> i32;
}
