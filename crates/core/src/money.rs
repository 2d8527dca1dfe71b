//! Decimal value objects: monetary amounts and stock quantities.
//!
//! Both wrap `rust_decimal::Decimal` so repeated arithmetic never drifts the way
//! binary floating point does. Neither can hold a negative value.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of decimal places kept for monetary results.
pub const MONEY_SCALE: u32 = 2;

/// Non-negative monetary amount.
///
/// Stored values keep the precision they were given; results of aggregate
/// computations go through [`Money::rounded`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

/// Non-negative stock quantity (count, weight, or volume).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl ValueObject for Money {}
impl ValueObject for Quantity {}

fn non_negative(value: Decimal, what: &str) -> DomainResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::validation(format!(
            "{what} cannot be negative (got {value})"
        )));
    }
    // Normalise -0 to 0.
    Ok(value.abs())
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> DomainResult<Self> {
        non_negative(amount, "amount").map(Self)
    }

    /// Build from an integer amount of the smallest currency unit (paise, cents).
    pub fn from_minor(minor: u32) -> Self {
        Self(Decimal::new(i64::from(minor), MONEY_SCALE))
    }

    /// Whole currency units, usable in constants.
    pub const fn from_units(units: u32) -> Self {
        Self(Decimal::from_parts(units, 0, 0, false, 0))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Round to [`MONEY_SCALE`] places, midpoint away from zero.
    pub fn rounded(self) -> Self {
        let mut value = self
            .0
            .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(MONEY_SCALE);
        Self(value)
    }

    /// Exact product of a unit price and a quantity (not rounded).
    ///
    /// Panics on `Decimal` overflow; callers keep both operands within the
    /// item field bounds. Use [`Money::checked_times`] for unbounded input.
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0 * quantity.0)
    }

    pub fn checked_times(self, quantity: Quantity) -> Option<Self> {
        self.0.checked_mul(quantity.0).map(Self)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    pub fn new(value: Decimal) -> DomainResult<Self> {
        non_negative(value, "quantity").map(Self)
    }

    pub const fn from_units(units: u32) -> Self {
        Self(Decimal::from_parts(units, 0, 0, false, 0))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Quantity) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl From<Quantity> for Decimal {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

fn parse_decimal(s: &str, what: &str) -> DomainResult<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(trimmed)
        .map_err(|e| DomainError::validation(format!("{what} '{trimmed}' is not a number: {e}")))
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::new(parse_decimal(s, "amount")?)
    }
}

impl FromStr for Quantity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::new(parse_decimal(s, "quantity")?)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rounded().0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(Money::new(dec!(-0.01)).unwrap_err().is_validation());
        assert!(Quantity::new(dec!(-1)).unwrap_err().is_validation());
        assert!("-3".parse::<Quantity>().is_err());
    }

    #[test]
    fn negative_zero_is_normalised() {
        let q = Quantity::new(-Decimal::ZERO).unwrap();
        assert!(!q.value().is_sign_negative());
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(Money::new(dec!(2.345)).unwrap().rounded().amount(), dec!(2.35));
        assert_eq!(Money::new(dec!(2.344)).unwrap().rounded().amount(), dec!(2.34));
        assert_eq!(Money::ZERO.rounded().to_string(), "0.00");
    }

    #[test]
    fn display_keeps_two_places() {
        assert_eq!(Money::new(dec!(9025)).unwrap().to_string(), "9025.00");
        assert_eq!(Money::from_minor(18050).to_string(), "180.50");
        assert_eq!(Quantity::new(dec!(60.000)).unwrap().to_string(), "60");
    }

    #[test]
    fn empty_input_parses_as_zero() {
        assert_eq!("".parse::<Money>().unwrap(), Money::ZERO);
        assert_eq!("  ".parse::<Quantity>().unwrap(), Quantity::ZERO);
    }

    #[test]
    fn serde_rejects_negative_values() {
        let err = serde_json::from_str::<Quantity>("\"-5\"");
        assert!(err.is_err());
        let ok: Money = serde_json::from_str("\"180.50\"").unwrap();
        assert_eq!(ok.amount(), dec!(180.50));
    }

    #[test]
    fn const_units_match_parsed_units() {
        assert_eq!(Quantity::from_units(50), "50".parse().unwrap());
        assert_eq!(Money::from_units(50), "50".parse().unwrap());
    }

    #[test]
    fn largest_minor_amount_keeps_its_value() {
        assert_eq!(Money::from_minor(u32::MAX).to_string(), "42949672.95");
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let huge = Money::new(Decimal::MAX).unwrap();
        let many = Quantity::new(Decimal::MAX).unwrap();
        assert_eq!(huge.checked_times(Quantity::from_units(2)), None);
        assert_eq!(huge.checked_add(Money::from_minor(100)), None);
        assert_eq!(many.checked_add(Quantity::from_units(50)), None);

        let price = Money::from_minor(18050);
        assert_eq!(
            price.checked_times(Quantity::from_units(50)).map(Money::rounded),
            Some(Money::new(dec!(9025.00)).unwrap())
        );
        assert_eq!(
            Quantity::from_units(10).checked_add(Quantity::from_units(50)),
            Some(Quantity::from_units(60))
        );
    }

    proptest! {
        /// Property: summing tenths never drifts (0.1 added n times is exactly n/10).
        #[test]
        fn repeated_addition_is_exact(n in 1usize..2_000) {
            let tenth = Money::new(dec!(0.1)).unwrap();
            let total: Money = std::iter::repeat_n(tenth, n).sum();
            prop_assert_eq!(total.amount(), Decimal::new(n as i64, 1));
        }
    }
}
