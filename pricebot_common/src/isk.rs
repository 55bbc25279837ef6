use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

pub const ISK_CURRENCY_CODE: &str = "ISK";

//--------------------------------------        Isk          ---------------------------------------------------------
/// An amount of in-game currency. Market prices carry more precision than the two decimals that are displayed, so the
/// full decimal value is kept and only rounded on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isk(Decimal);

op!(binary Isk, Add, add);
op!(binary Isk, Sub, sub);
op!(inplace Isk, AddAssign, add_assign);
op!(inplace Isk, SubAssign, sub_assign);
op!(unary Isk, Neg, neg);

impl Sum for Isk {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as an ISK amount: {0}")]
pub struct IskConversionError(String);

impl From<Decimal> for Isk {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Isk {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Isk {
    type Err = IskConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim().trim_end_matches(ISK_CURRENCY_CODE).trim().replace(',', "");
        Decimal::from_str(&cleaned).map(Self).map_err(|e| IskConversionError(format!("{s}: {e}")))
    }
}

impl Isk {
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The absolute difference between two amounts.
    pub fn abs_diff(&self, other: Isk) -> Isk {
        Self((self.0 - other.0).abs())
    }

    /// Round to `dp` decimal places, with midpoints rounded away from zero (so 0.005 becomes 0.01).
    pub fn round_half_up(&self, dp: u32) -> Isk {
        Self(self.0.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl Display for Isk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = self.round_half_up(2).0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        let digits = format!("{:.2}", rounded.abs());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "{sign}{grouped}.{fraction} {ISK_CURRENCY_CODE}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Isk::from_cents(123_456_789).to_string(), "1,234,567.89 ISK");
        assert_eq!(Isk::from(5).to_string(), "5.00 ISK");
        assert_eq!(Isk::from_cents(-150_000).to_string(), "-1,500.00 ISK");
        assert_eq!(Isk::from_str("999.995").unwrap().to_string(), "1,000.00 ISK");
        assert_eq!(Isk::from_str("0.001").unwrap().to_string(), "0.00 ISK");
    }

    #[test]
    fn parsing() {
        assert_eq!(Isk::from_str("1,250.50 ISK").unwrap(), Isk::from_cents(125_050));
        assert_eq!(Isk::from_str(" 42 ").unwrap(), Isk::from(42));
        assert!(Isk::from_str("forty-two").is_err());
    }

    #[test]
    fn rounding_and_differences() {
        let baseline = Isk::from_str("100.00").unwrap();
        let nudged = Isk::from_str("100.004").unwrap();
        assert_eq!(nudged.abs_diff(baseline).round_half_up(2), Isk::default());
        let moved = Isk::from_str("100.01").unwrap();
        assert_eq!(baseline.abs_diff(moved).round_half_up(2), Isk::from_cents(1));
        assert_eq!(Isk::from_str("0.005").unwrap().round_half_up(2), Isk::from_cents(1));
        assert_eq!(Isk::from_str("0.0049").unwrap().round_half_up(2), Isk::default());
    }

    #[test]
    fn arithmetic() {
        let mut total: Isk = [Isk::from(1), Isk::from_cents(50), Isk::from(2)].into_iter().sum();
        assert_eq!(total, Isk::from_cents(350));
        total -= Isk::from(1);
        assert_eq!(total, Isk::from_cents(250));
        assert_eq!(-total, Isk::from_cents(-250));
    }

    #[test]
    fn serde_is_transparent() {
        let isk: Isk = serde_json::from_str("\"12.345\"").unwrap();
        assert_eq!(isk, Isk::from_str("12.345").unwrap());
    }
}
