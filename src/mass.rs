//! Unit-aware mass quantity.
//!
//! A [`Mass`] always stores its amount in grams. The display unit only
//! decides how the value is read back and printed, and which unit the result
//! of an arithmetic operation is tagged with (the left operand's).

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub, SubAssign};

use crate::error::{Error, Result};

/// Grams per unit, indexed by `Unit as usize`.
const GRAMS_PER_UNIT: [f64; 10] = [
    1e-6,     // ug
    0.001,    // mg
    1.0,      // g
    1000.0,   // kg
    1e6,      // ton
    1.016e6,  // ton (imp)
    907185.0, // ton (US)
    6350.29,  // st
    535.592,  // lb
    28.3495,  // oz
];

const SYMBOLS: [&str; 10] = [
    "μg",
    "mg",
    "g",
    "kg",
    "ton",
    "ton (imp)",
    "ton (US)",
    "st",
    "lb",
    "oz",
];

/// The fixed set of mass units.
///
/// The discriminants and their gram ratios are part of the public contract;
/// anything displayed or stored relies on them not drifting.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Microgram
    Ug = 0,
    /// Milligram
    Mg,
    /// Gram
    #[default]
    G,
    /// Kilogram
    Kg,
    /// Metric ton
    Ton,
    /// Imperial (long) ton
    ImpTon,
    /// US (short) ton
    UsTon,
    /// Stone
    St,
    /// Pound
    Lb,
    /// Ounce
    Oz,
}

impl Unit {
    pub const ALL: [Unit; 10] = [
        Unit::Ug,
        Unit::Mg,
        Unit::G,
        Unit::Kg,
        Unit::Ton,
        Unit::ImpTon,
        Unit::UsTon,
        Unit::St,
        Unit::Lb,
        Unit::Oz,
    ];

    /// How many grams one of this unit is.
    pub const fn grams_per_unit(self) -> f64 {
        GRAMS_PER_UNIT[self as usize]
    }

    pub const fn symbol(self) -> &'static str {
        SYMBOLS[self as usize]
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A mass, stored in grams, displayed in `unit`.
///
/// Equality and ordering compare the gram amounts only and ignore the
/// display unit. Equality is exact floating point equality with no epsilon,
/// so two masses reached through different conversions may compare unequal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mass {
    grams: f64,
    unit: Unit,
}

impl Mass {
    /// `amount` expressed in `unit`.
    pub fn new(amount: f64, unit: Unit) -> Self {
        Self {
            grams: Self::convert(amount, unit, Unit::G),
            unit,
        }
    }

    const fn from_grams(grams: f64, unit: Unit) -> Self {
        Self { grams, unit }
    }

    /// Convert `amount` between units, pivoting through grams.
    pub fn convert(amount: f64, from: Unit, to: Unit) -> f64 {
        if amount == 0.0 {
            return 0.0;
        }

        if to == Unit::G {
            amount * from.grams_per_unit()
        } else if from == Unit::G {
            amount / to.grams_per_unit()
        } else {
            Self::convert(Self::convert(amount, from, Unit::G), Unit::G, to)
        }
    }

    /// The amount expressed in `unit`, converted from grams on every call.
    pub fn get_value(&self, unit: Unit) -> f64 {
        Self::convert(self.grams, Unit::G, unit)
    }

    pub const fn grams(&self) -> f64 {
        self.grams
    }

    pub const fn get_unit(&self) -> Unit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    /// Same quantity, displayed in `unit`.
    pub const fn convert_to(&self, unit: Unit) -> Mass {
        Self::from_grams(self.grams, unit)
    }

    pub fn is_zero(&self) -> bool {
        self.grams == 0.0
    }

    /// Format in `unit` rather than the display unit.
    pub fn to_string_in(&self, unit: Unit) -> String {
        let amount = self.get_value(unit);
        format!("{:.*} {}", decimals(amount), amount, unit)
    }

    /// Scalar read in this mass's display unit, in grams.
    fn scalar_grams(&self, amount: f64) -> f64 {
        Self::convert(amount, self.unit, Unit::G)
    }

    /// Checked in-place division by another mass.
    pub fn try_div_assign(&mut self, rhs: Mass) -> Result<()> {
        *self = (*self / rhs)?;
        Ok(())
    }

    /// Checked in-place division by a dimensionless factor.
    pub fn try_div_assign_scalar(&mut self, rhs: f64) -> Result<()> {
        *self = (*self / rhs)?;
        Ok(())
    }
}

/// Decimal places needed to show the first significant digit of the
/// fractional part, or none for whole numbers.
fn decimals(amount: f64) -> usize {
    let fraction = amount.fract();
    if fraction == 0.0 {
        return 0;
    }
    let places = 1.0 - fraction.abs().log10().floor();
    if places.is_finite() && places > 0.0 {
        places as usize
    } else {
        0
    }
}

impl fmt::Display for Mass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.get_value(self.unit);
        write!(f, "{:.*} {}", decimals(amount), amount, self.unit)
    }
}

impl PartialEq for Mass {
    fn eq(&self, other: &Self) -> bool {
        self.grams == other.grams
    }
}

impl PartialOrd for Mass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.grams.partial_cmp(&other.grams)
    }
}

impl PartialEq<f64> for Mass {
    fn eq(&self, other: &f64) -> bool {
        self.grams == self.scalar_grams(*other)
    }
}

impl PartialEq<Mass> for f64 {
    fn eq(&self, other: &Mass) -> bool {
        other == self
    }
}

impl PartialOrd<f64> for Mass {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.grams.partial_cmp(&self.scalar_grams(*other))
    }
}

impl PartialOrd<Mass> for f64 {
    fn partial_cmp(&self, other: &Mass) -> Option<Ordering> {
        other.scalar_grams(*self).partial_cmp(&other.grams)
    }
}

impl Add for Mass {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass::from_grams(self.grams + rhs.grams, self.unit)
    }
}

/// The scalar is an amount in the mass's display unit.
impl Add<f64> for Mass {
    type Output = Mass;

    fn add(self, rhs: f64) -> Mass {
        Mass::from_grams(self.grams + self.scalar_grams(rhs), self.unit)
    }
}

impl Add<Mass> for f64 {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass::from_grams(rhs.scalar_grams(self) + rhs.grams, rhs.unit)
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass::from_grams(self.grams - rhs.grams, self.unit)
    }
}

impl Sub<f64> for Mass {
    type Output = Mass;

    fn sub(self, rhs: f64) -> Mass {
        Mass::from_grams(self.grams - self.scalar_grams(rhs), self.unit)
    }
}

impl Sub<Mass> for f64 {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass::from_grams(rhs.scalar_grams(self) - rhs.grams, rhs.unit)
    }
}

impl Mul for Mass {
    type Output = Mass;

    fn mul(self, rhs: Mass) -> Mass {
        Mass::from_grams(self.grams * rhs.grams, self.unit)
    }
}

/// The scalar is a dimensionless factor.
impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, rhs: f64) -> Mass {
        Mass::from_grams(self.grams * rhs, self.unit)
    }
}

impl Mul<Mass> for f64 {
    type Output = Mass;

    fn mul(self, rhs: Mass) -> Mass {
        Mass::from_grams(self * rhs.grams, rhs.unit)
    }
}

impl Div for Mass {
    type Output = Result<Mass>;

    fn div(self, rhs: Mass) -> Result<Mass> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Mass::from_grams(self.grams / rhs.grams, self.unit))
    }
}

/// The scalar is a dimensionless factor.
impl Div<f64> for Mass {
    type Output = Result<Mass>;

    fn div(self, rhs: f64) -> Result<Mass> {
        if rhs == 0.0 {
            return Err(Error::DivisionByZero);
        }
        Ok(Mass::from_grams(self.grams / rhs, self.unit))
    }
}

/// The scalar is an amount in the divisor's display unit.
impl Div<Mass> for f64 {
    type Output = Result<Mass>;

    fn div(self, rhs: Mass) -> Result<Mass> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Mass::from_grams(rhs.scalar_grams(self) / rhs.grams, rhs.unit))
    }
}

impl AddAssign for Mass {
    fn add_assign(&mut self, rhs: Mass) {
        self.grams += rhs.grams;
    }
}

impl AddAssign<f64> for Mass {
    fn add_assign(&mut self, rhs: f64) {
        self.grams += self.scalar_grams(rhs);
    }
}

impl SubAssign for Mass {
    fn sub_assign(&mut self, rhs: Mass) {
        self.grams -= rhs.grams;
    }
}

impl SubAssign<f64> for Mass {
    fn sub_assign(&mut self, rhs: f64) {
        self.grams -= self.scalar_grams(rhs);
    }
}

impl MulAssign for Mass {
    fn mul_assign(&mut self, rhs: Mass) {
        self.grams *= rhs.grams;
    }
}

impl MulAssign<f64> for Mass {
    fn mul_assign(&mut self, rhs: f64) {
        self.grams *= rhs;
    }
}
