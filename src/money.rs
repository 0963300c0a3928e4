use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError, RoundingMode, Signed, Zero};
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;

/// Number of fractional digits carried by every monetary value.
pub const SCALE: i64 = 2;

/// A monetary amount with exactly two fractional digits.
///
/// Construction rounds half-up to the cent, so repeated ledger arithmetic
/// cannot accumulate sub-cent drift. SQLite has no decimal column type;
/// values round-trip through the store as canonical decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub struct Money(BigDecimal);

impl Money {
	pub fn new(amount: BigDecimal) -> Money {
		Money(amount.with_scale_round(SCALE, RoundingMode::HalfUp))
	}

	pub fn zero() -> Money {
		Money(BigDecimal::zero().with_scale(SCALE))
	}

	pub fn as_decimal(&self) -> &BigDecimal {
		&self.0
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	pub fn is_positive(&self) -> bool {
		self.0.is_positive()
	}

	pub fn is_negative(&self) -> bool {
		self.0.is_negative()
	}
}

impl Add<&Money> for &Money {
	type Output = Money;

	fn add(self, rhs: &Money) -> Money {
		Money((&self.0) + (&rhs.0))
	}
}

impl Sub<&Money> for &Money {
	type Output = Money;

	fn sub(self, rhs: &Money) -> Money {
		Money((&self.0) - (&rhs.0))
	}
}

impl From<i64> for Money {
	fn from(v: i64) -> Money {
		Money::new(BigDecimal::from(v))
	}
}

impl FromStr for Money {
	type Err = ParseBigDecimalError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Money::new(BigDecimal::from_str(s)?))
	}
}

impl fmt::Display for Money {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl ToSql<Text, Sqlite> for Money {
	fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
		out.set_value(self.0.to_string());
		Ok(IsNull::No)
	}
}

impl FromSql<Text, Sqlite> for Money {
	fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
		let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
		let amount = BigDecimal::from_str(&s)?;
		Ok(Money(amount.with_scale(SCALE)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn money(s: &str) -> Money {
		s.parse().unwrap()
	}

	#[test]
	fn construction_rounds_half_up() {
		assert_eq!(money("2.005").to_string(), "2.01");
		assert_eq!(money("2.004").to_string(), "2.00");
		assert_eq!(money("2.015").to_string(), "2.02");
		// half-up rounds away from zero on the negative side too
		assert_eq!(money("-2.005").to_string(), "-2.01");
	}

	#[test]
	fn display_always_carries_two_digits() {
		assert_eq!(money("1000").to_string(), "1000.00");
		assert_eq!(money("0.5").to_string(), "0.50");
		assert_eq!(Money::zero().to_string(), "0.00");
	}

	#[test]
	fn arithmetic_preserves_scale() {
		let sum = &money("0.10") + &money("0.20");
		assert_eq!(sum, money("0.30"));

		let diff = &money("1200.00") - &money("300");
		assert_eq!(diff, money("900"));
	}

	#[test]
	fn repeated_additions_do_not_drift() {
		let mut total = Money::zero();
		for _ in 0..1_000 {
			total = &total + &money("0.10");
		}
		assert_eq!(total, money("100.00"));
	}

	#[test]
	fn sign_checks() {
		assert!(money("1").is_positive());
		assert!(!money("0").is_positive());
		assert!(money("-0.01").is_negative());
		assert!(Money::zero().is_zero());
	}

	#[test]
	fn comparison_is_numeric() {
		assert!(money("99.99").lt(&money("100")));
		assert_eq!(money("100"), money("100.00"));
	}
}
