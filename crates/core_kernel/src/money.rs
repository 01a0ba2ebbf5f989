//! Money with precise decimal arithmetic
//!
//! Pharmacy claim amounts are US-dollar values priced to the cent. This module
//! wraps rust_decimal so cost-share math never touches floating point, and
//! provides the half-up cent rounding that NCPDP patient-pay calculations use.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use thiserror::Error;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// A US-dollar amount
///
/// Amounts are stored with 4 decimal places internally so intermediate
/// rate calculations keep sub-cent precision; [`Money::round_to_cents`]
/// produces the externally visible cent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(4))
    }

    /// Creates Money from an integer number of cents
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// A zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to whole cents, half-up
    ///
    /// Patient-pay amounts round half away from zero, not banker's style:
    /// a $0.125 midpoint becomes $0.13.
    pub fn round_to_cents(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiplies by a scalar factor
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::new(self.0 * factor)
    }

    /// Divides by a scalar
    pub fn divide(&self, divisor: Decimal) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(Self::new(self.0 / divisor))
    }

    /// Returns the smaller of two amounts
    pub fn min(self, other: Money) -> Money {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

/// A cost-share percentage rate (e.g., a coinsurance rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate(Decimal);

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.30 for 30%)
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Creates a rate from a percentage (e.g., 30.0 for 30%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self(percentage / dec!(100))
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Applies this rate to an amount, rounding the result to cents half-up
    pub fn apply(&self, money: Money) -> Money {
        money.multiply(self.0).round_to_cents()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.0 * dec!(100)).round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50));
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_money_from_cents() {
        let m = Money::from_cents(10050);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(2.50));

        assert_eq!((a + b).amount(), dec!(102.50));
        assert_eq!((a - b).amount(), dec!(97.50));
    }

    #[test]
    fn test_round_to_cents_half_up() {
        assert_eq!(Money::new(dec!(30.745)).round_to_cents().amount(), dec!(30.75));
        assert_eq!(Money::new(dec!(30.744)).round_to_cents().amount(), dec!(30.74));
        // Banker's rounding would give 0.12 here; half-up must give 0.13.
        assert_eq!(Money::new(dec!(0.125)).round_to_cents().amount(), dec!(0.13));
    }

    #[test]
    fn test_money_min() {
        let a = Money::new(dec!(10.00));
        let b = Money::new(dec!(7.50));
        assert_eq!(a.min(b), b);
        assert_eq!(b.min(a), b);
    }

    #[test]
    fn test_divide_by_zero() {
        let m = Money::new(dec!(10.00));
        assert_eq!(m.divide(dec!(0)), Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_rate_application() {
        let coinsurance = Rate::new(dec!(0.30));
        let total = Money::new(dec!(102.50));

        assert_eq!(coinsurance.apply(total).amount(), dec!(30.75));
    }

    #[test]
    fn test_rate_from_percentage() {
        let rate = Rate::from_percentage(dec!(30));
        assert_eq!(rate.as_decimal(), dec!(0.30));
    }
}
