use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// decimal places kept for currency amounts (centavos)
pub const CURRENCY_SCALE: u32 = 2;

/// fixed-point currency amount, always rounded to two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, CURRENCY_SCALE));

    /// create from decimal, rounding half away from zero to cents
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money::from_decimal(Decimal::from_str(s.trim())?))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from cents
    pub fn from_minor(cents: i64) -> Self {
        Money(Decimal::new(cents, CURRENCY_SCALE))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// amount in cents, `None` if it does not fit an i64
    pub fn to_minor(&self) -> Option<i64> {
        (self.0 * Decimal::from(100)).trunc().to_i64()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// multiply by a whole count (installments, units)
    pub fn times(&self, count: u32) -> Self {
        Money(self.0 * Decimal::from(count))
    }

    /// split into `parts` equal shares rounded down to the cent
    pub fn split_floor(&self, parts: u32) -> Self {
        if parts == 0 {
            return Money::ZERO;
        }
        let share = self.0 / Decimal::from(parts);
        Money(share.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::ToZero))
    }

    /// ratio of self to `whole`, `None` when `whole` is zero
    pub fn ratio_of(&self, whole: Money) -> Option<Rate> {
        if whole.is_zero() {
            return None;
        }
        Some(Rate::from_decimal(self.0 / whole.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// rate type for ratios and percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// create from decimal (e.g., 0.8 for 80%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 80 for 80%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    /// percentage rounded half away from zero to two places, like `Money`
    pub fn as_rounded_percentage(&self) -> Decimal {
        self.as_percentage()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_rounded_percentage().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_to_cents() {
        let m = Money::from_str_exact("100.125").unwrap();
        assert_eq!(m.to_string(), "100.13");

        let m = Money::from_str_exact("100.124").unwrap();
        assert_eq!(m.to_string(), "100.12");
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Money::from_minor(12_345), Money::from_str_exact("123.45").unwrap());
        assert_eq!(Money::from_minor(1), Money::CENT);
        assert_eq!(Money::from_str_exact("123.45").unwrap().to_minor(), Some(12_345));
        assert_eq!(Money::from_major(-3).to_minor(), Some(-300));
    }

    #[test]
    fn test_split_floor_never_overshoots() {
        let total = Money::from_major(100);
        let share = total.split_floor(3);
        assert_eq!(share, Money::from_str_exact("33.33").unwrap());
        assert!(share.times(3) <= total);
        assert_eq!(total - share.times(3), Money::CENT);

        assert_eq!(total.split_floor(0), Money::ZERO);
    }

    #[test]
    fn test_ratio_guards_zero() {
        let used = Money::from_major(250);
        assert_eq!(used.ratio_of(Money::from_major(1_000)), Some(Rate::from_decimal(dec!(0.25))));
        assert_eq!(used.ratio_of(Money::ZERO), None);
    }

    #[test]
    fn test_sum_and_display() {
        let values = [Money::from_minor(1_050), Money::from_minor(250), Money::from_major(2)];
        let total: Money = values.iter().sum();
        assert_eq!(total.to_string(), "15.00");
    }

    #[test]
    fn test_deserialize_rounds_to_cents() {
        let m: Money = serde_json::from_str("\"19.999\"").unwrap();
        assert_eq!(m, Money::from_major(20));
        assert_eq!(serde_json::to_string(&Money::from_minor(1_999)).unwrap(), "\"19.99\"");
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_percentage(80).to_string(), "80%");
        assert_eq!(Rate::from_decimal(dec!(0.955)).to_string(), "95.5%");
        assert_eq!(Rate::from_decimal(dec!(0.00125)).to_string(), "0.13%");
    }
}
