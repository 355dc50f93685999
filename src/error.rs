//! Errors surfaced by the scale, the reducers and mass arithmetic.

use thiserror::Error;

use crate::adc::TimeoutError;

/// Everything that can go wrong while measuring or doing mass arithmetic.
///
/// Errors are always returned to the caller; the crate never retries,
/// logs or swallows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Empty sample batch, unknown read type code and similar caller mistakes.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Division by a zero scalar, a zero mass or a zero reference unit.
    #[error("cannot divide by 0")]
    DivisionByZero,
    /// The ADC did not produce a sample in time.
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
}

pub type Result<T> = core::result::Result<T, Error>;
