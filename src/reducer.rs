//! Reduce a batch of raw samples to a single value.

use crate::error::{Error, Result};

/// Which reducer a read, weight or tare call uses.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadType {
    #[default]
    Median = 0,
    Average = 1,
}

impl ReadType {
    /// Apply this reducer to `samples`, which may be reordered.
    pub fn reduce(self, samples: &mut [i32]) -> Result<f64> {
        match self {
            ReadType::Median => median(samples),
            ReadType::Average => average(samples),
        }
    }
}

impl TryFrom<u8> for ReadType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(ReadType::Median),
            1 => Ok(ReadType::Average),
            _ => Err(Error::InvalidInput("unknown read type")),
        }
    }
}

/// Middle value of `samples`, or the mean of the two middle values for an
/// even count. Uses selection rather than a full sort, so `samples` is left
/// partially reordered.
pub fn median(samples: &mut [i32]) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::InvalidInput("no samples to reduce"));
    }

    let len = samples.len();
    let (lower, upper, _) = samples.select_nth_unstable(len / 2);
    let upper = f64::from(*upper);

    if len % 2 == 1 {
        return Ok(upper);
    }

    // everything left of `mid` is <= upper, so its max is the lower middle
    match lower.iter().max() {
        Some(&lower) => Ok((f64::from(lower) + upper) / 2.0),
        None => Ok(upper),
    }
}

/// Arithmetic mean of `samples`, summed in 64 bits.
pub fn average(samples: &[i32]) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::InvalidInput("no samples to reduce"));
    }

    let sum: i64 = samples.iter().map(|&v| i64::from(v)).sum();
    Ok(sum as f64 / samples.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// Not used by any read path; it is the building block for noise checks and
/// future outlier rejection.
pub fn std_dev(samples: &[i32]) -> Result<f64> {
    if samples.len() < 2 {
        return Err(Error::InvalidInput("standard deviation needs two samples"));
    }

    let mean = average(samples)?;
    let squares: f64 = samples
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum();

    Ok((squares / (samples.len() - 1) as f64).sqrt())
}
