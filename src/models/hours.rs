//! Exact decimal hours.
//!
//! Hours are kept as `rust_decimal::Decimal` so that summing a group in any
//! order always yields the same total. In SQLite they are stored as TEXT.

use crate::errors::{AppError, AppResult};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Upper bound for a single (user, sub-project, day) cell.
const MAX_PER_DAY: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Hours(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Hours {
    pub const ZERO: Hours = Hours(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parse a value typed into a timesheet cell (`"7.5"`, `"8"`, `"7,5"`).
    /// An empty string means zero.
    pub fn parse_entry(input: &str) -> AppResult<Self> {
        let raw = input.trim().replace(',', ".");
        if raw.is_empty() {
            return Ok(Self::ZERO);
        }

        let value =
            Decimal::from_str(&raw).map_err(|_| AppError::InvalidHours(input.to_string()))?;

        if value < Decimal::ZERO || value > MAX_PER_DAY {
            return Err(AppError::InvalidHours(input.to_string()));
        }

        Ok(Self(value.normalize()))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `-` for empty cells, the normalized number otherwise.
    pub fn or_dash(&self) -> String {
        if self.is_zero() {
            "-".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<Decimal> for Hours {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Hours {
    type Output = Hours;

    fn add(self, rhs: Hours) -> Hours {
        Hours(self.0 + rhs.0)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Hours) {
        self.0 += rhs.0;
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Hours>>(iter: I) -> Hours {
        iter.fold(Hours::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Hours> for Hours {
    fn sum<I: Iterator<Item = &'a Hours>>(iter: I) -> Hours {
        iter.copied().sum()
    }
}

impl ToSql for Hours {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.normalize().to_string()))
    }
}

impl FromSql for Hours {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(bytes) => {
                let s = std::str::from_utf8(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                Decimal::from_str(s.trim())
                    .map(Hours)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            ValueRef::Integer(i) => Ok(Hours(Decimal::from(i))),
            ValueRef::Real(f) => Decimal::try_from(f)
                .map(Hours)
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Null => Ok(Hours::ZERO),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_entry_accepts_bounds_and_comma() {
        assert_eq!(Hours::parse_entry("0").unwrap(), Hours::ZERO);
        assert_eq!(Hours::parse_entry("").unwrap(), Hours::ZERO);
        assert_eq!(Hours::parse_entry("24").unwrap().to_string(), "24");
        assert_eq!(Hours::parse_entry("7,5").unwrap().to_string(), "7.5");
        assert_eq!(Hours::parse_entry(" 8.00 ").unwrap().to_string(), "8");
    }

    #[test]
    fn parse_entry_rejects_out_of_range() {
        assert!(matches!(
            Hours::parse_entry("-1"),
            Err(AppError::InvalidHours(_))
        ));
        assert!(matches!(
            Hours::parse_entry("24.5"),
            Err(AppError::InvalidHours(_))
        ));
        assert!(matches!(
            Hours::parse_entry("abc"),
            Err(AppError::InvalidHours(_))
        ));
    }

    #[test]
    fn decimal_sum_is_exact() {
        let parts = ["0.1", "0.2", "0.3"]
            .iter()
            .map(|s| Hours::parse_entry(s).unwrap())
            .collect::<Vec<_>>();
        let total: Hours = parts.iter().sum();
        assert_eq!(total.to_string(), "0.6");
    }
}
