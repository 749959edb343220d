//! Money type for registry amounts
//!
//! Internally stores amounts in bani (hundredths of a leu) as i64 to avoid
//! floating-point drift. Spreadsheet cells arrive either as text or as
//! floating-point numbers; both are converted here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A monetary amount stored as bani
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from bani
    ///
    /// # Examples
    /// ```
    /// use finreg::models::Money;
    /// let amount = Money::from_bani(125015); // 1250.15 lei
    /// assert_eq!(amount.lei(), 1250);
    /// ```
    pub const fn from_bani(bani: i64) -> Self {
        Self(bani)
    }

    pub const fn from_lei_bani(lei: i64, bani: i64) -> Self {
        Self(lei * 100 + bani)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn bani(&self) -> i64 {
        self.0
    }

    /// Whole lei (truncated toward zero)
    pub const fn lei(&self) -> i64 {
        self.0 / 100
    }

    /// The bani portion (0-99)
    pub const fn bani_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Convert a numeric spreadsheet cell, rounding to the nearest ban
    pub fn from_f64(value: f64) -> Result<Self, MoneyParseError> {
        if !value.is_finite() {
            return Err(MoneyParseError::InvalidFormat(value.to_string()));
        }
        let bani = (value * 100.0).round();
        if bani.abs() > i64::MAX as f64 {
            return Err(MoneyParseError::OutOfRange(value.to_string()));
        }
        Ok(Self(bani as i64))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "1250.15", "1250,15", "-10.5", "1 250.15 lei", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let cleaned: String = s
            .trim()
            .trim_end_matches("lei")
            .trim_end_matches("RON")
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        let (negative, s) = if let Some(stripped) = cleaned.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, cleaned.as_str())
        };

        if s.is_empty() || s.starts_with(['-', '+']) {
            return Err(MoneyParseError::InvalidFormat(cleaned.clone()));
        }

        let bani = if s.contains('.') {
            let parts: Vec<&str> = s.split('.').collect();
            if parts.len() != 2 {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            let lei: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
            };

            let fraction = parts[1];
            if !fraction.chars().all(|c| c.is_ascii_digit()) {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }
            let bani: i64 = match fraction.len() {
                0 => 0,
                1 => {
                    fraction
                        .parse::<i64>()
                        .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                        * 10
                }
                _ => fraction[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?,
            };

            lei.checked_mul(100)
                .and_then(|v| v.checked_add(bani))
                .ok_or_else(|| MoneyParseError::OutOfRange(s.to_string()))?
        } else {
            s.parse::<i64>()
                .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                .checked_mul(100)
                .ok_or_else(|| MoneyParseError::OutOfRange(s.to_string()))?
        };

        Ok(Self(if negative { -bani } else { bani }))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02} lei", self.lei().abs(), self.bani_part())
        } else {
            write!(f, "{}.{:02} lei", self.lei(), self.bani_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "invalid amount '{}'", s),
            MoneyParseError::OutOfRange(s) => write!(f, "amount out of range '{}'", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bani() {
        let m = Money::from_bani(1050);
        assert_eq!(m.bani(), 1050);
        assert_eq!(m.lei(), 10);
        assert_eq!(m.bani_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_bani(125015).to_string(), "1250.15 lei");
        assert_eq!(Money::from_bani(0).to_string(), "0.00 lei");
        assert_eq!(Money::from_bani(-1050).to_string(), "-10.50 lei");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().bani(), 1050);
        assert_eq!(Money::parse("10,5").unwrap().bani(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().bani(), -1050);
        assert_eq!(Money::parse("1 250.15 lei").unwrap().bani(), 125015);
        assert_eq!(Money::parse("10").unwrap().bani(), 1000);
        assert!(Money::parse("zece").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse("1.2.3").is_err());
    }

    #[test]
    fn test_parse_rejects_repeated_sign() {
        assert!(matches!(
            Money::parse("--5"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
        assert!(Money::parse("--3.5").is_err());
        assert!(Money::parse("-+5").is_err());
        assert!(Money::parse("+-2,50").is_err());
        assert_eq!(Money::parse("-5").unwrap().bani(), -500);
    }

    #[test]
    fn test_from_f64_rounds() {
        assert_eq!(Money::from_f64(1250.15).unwrap().bani(), 125015);
        assert_eq!(Money::from_f64(0.1 + 0.2).unwrap().bani(), 30);
        assert!(Money::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_bani(1000);
        let b = Money::from_bani(500);
        assert_eq!((a + b).bani(), 1500);
        assert_eq!((a - b).bani(), 500);
        assert_eq!((-a).bani(), -1000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.bani(), 2000);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_bani(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
