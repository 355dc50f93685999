//! The boundary to the ADC: whatever clocks samples out of the amplifier
//! implements [`AdcReader`], and the scale collects its batches through
//! [`read_values`].

use thiserror::Error;

/// Input channel of the amplifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Channel {
    #[default]
    A,
    B,
}

/// The chip did not signal a ready conversion within the reader's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out waiting for the ADC to become ready")]
pub struct TimeoutError;

/// Source of raw samples.
///
/// `get_value` may block until the chip has a conversion ready, and fails
/// with [`TimeoutError`] when that takes longer than the reader allows.
pub trait AdcReader {
    /// One raw, signed conversion from `channel`.
    fn get_value(&mut self, channel: Channel) -> Result<i32, TimeoutError>;
}

impl<T: AdcReader + ?Sized> AdcReader for &mut T {
    fn get_value(&mut self, channel: Channel) -> Result<i32, TimeoutError> {
        (**self).get_value(channel)
    }
}

/// Request `times` samples from `channel`, in order. Stops at the first
/// timeout.
pub fn read_values<R>(
    reader: &mut R,
    channel: Channel,
    times: usize,
) -> Result<Vec<i32>, TimeoutError>
where
    R: AdcReader + ?Sized,
{
    let mut values = Vec::with_capacity(times);
    for _ in 0..times {
        values.push(reader.get_value(channel)?);
    }
    Ok(values)
}
