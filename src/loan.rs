use std::str::FromStr;

use bigdecimal::BigDecimal;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteConnection};
use strum_macros::{Display, EnumString};

use crate::account::Account;
use crate::db;
use crate::money::Money;
use crate::schema::loans;
use crate::types::{Id, Time};

#[derive(Queryable, Identifiable, Associations, PartialEq, Debug)]
#[diesel(belongs_to(Account))]
#[diesel(table_name = loans)]
pub struct Loan {
	pub id: Id,
	pub account_id: Id,
	pub amount: Money,
	pub interest_rate_bps: i16,
	pub tenure_months: i32,
	pub state: LoanState,
	pub created_at: Time,
}

impl Loan {
	// Converts interest rate (in basis points) to a fraction
	pub fn interest_rate(&self) -> BigDecimal {
		BigDecimal::from(self.interest_rate_bps) / BigDecimal::from(10_000)
	}

	pub fn approved(&self) -> bool {
		self.state == LoanState::Approved
	}
}

/// Lifecycle of a loan: applications start pending and are approved at
/// most once. Approval is terminal; there is no decline transition.
#[derive(AsExpression, FromSqlRow, Eq, PartialEq, Clone, Copy, EnumString, Display, Debug)]
#[diesel(sql_type = Text)]
#[strum(serialize_all = "snake_case")]
pub enum LoanState {
	Pending,
	Approved,
}

impl Default for LoanState {
	fn default() -> Self {
		LoanState::Pending
	}
}

impl ToSql<Text, Sqlite> for LoanState {
	fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
		out.set_value(self.to_string());
		Ok(IsNull::No)
	}
}

impl FromSql<Text, Sqlite> for LoanState {
	fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
		let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
		Ok(LoanState::from_str(&s)?)
	}
}

#[derive(Insertable)]
#[diesel(table_name = loans)]
pub struct NewLoan<'a> {
	pub account_id: Id,
	pub amount: &'a Money,
	pub interest_rate_bps: i16,
	pub tenure_months: i32,
	pub state: LoanState,
	pub created_at: Time,
}

/// Data store implementation for operating on loans in the database
pub struct Repo;

impl Repo {
	pub fn new() -> Self {
		Repo
	}

	pub fn create(&self, conn: &mut SqliteConnection, new_loan: NewLoan) -> db::Result<Loan> {
		diesel::insert_into(loans::table)
			.values(&new_loan)
			.get_result(conn)
			.map_err(Into::into)
	}

	pub fn find_by_id(&self, conn: &mut SqliteConnection, id: Id) -> db::Result<Loan> {
		loans::table
			.find(id)
			.first(conn)
			.map_err(Into::into)
	}

	pub fn set_state(&self, conn: &mut SqliteConnection, id: Id, state: LoanState) -> db::Result<Loan> {
		diesel::update(loans::table.find(id))
			.set(loans::state.eq(state))
			.get_result(conn)
			.map_err(Into::into)
	}

	pub fn list_all(&self, conn: &mut SqliteConnection) -> db::Result<Vec<Loan>> {
		loans::table
			.order((loans::created_at.desc(), loans::id.desc()))
			.load(conn)
			.map_err(Into::into)
	}

	pub fn for_account(&self, conn: &mut SqliteConnection, account_id: Id) -> db::Result<Vec<Loan>> {
		loans::table
			.filter(loans::account_id.eq(account_id))
			.order((loans::created_at.desc(), loans::id.desc()))
			.load(conn)
			.map_err(Into::into)
	}

	pub fn count_approved(&self, conn: &mut SqliteConnection) -> db::Result<i64> {
		loans::table
			.filter(loans::state.eq(LoanState::Approved))
			.count()
			.get_result(conn)
			.map_err(Into::into)
	}
}

#[cfg(test)]
mod tests {
	use crate::testutil::*;

	use super::*;

	#[test]
	fn applications_start_pending() {
		let f = Fixture::new();
		let account = f.account_with_balance("Bob Roberts", "0".parse().unwrap());
		let repo = Repo::new();

		let amount: Money = "5000".parse().unwrap();
		let loan = repo
			.create(&mut f.conn(), NewLoan {
				account_id: account.id,
				amount: &amount,
				interest_rate_bps: 1_000,
				tenure_months: 6,
				state: LoanState::default(),
				created_at: crate::types::now(),
			})
			.unwrap();

		assert_eq!(loan.state, LoanState::Pending);
		assert!(!loan.approved());
		assert_eq!(loan.interest_rate(), "0.1".parse::<BigDecimal>().unwrap());
	}
}
