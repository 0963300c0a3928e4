use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::account::Account;
use crate::db;
use crate::money::Money;
use crate::schema::fixed_deposits;
use crate::types::{Id, Time};

/// A term deposit carved out of an account's balance.
///
/// Immutable once written; the maturity amount is fixed at creation.
#[derive(Queryable, Identifiable, Associations, PartialEq, Debug)]
#[diesel(belongs_to(Account))]
#[diesel(table_name = fixed_deposits)]
pub struct FixedDeposit {
	pub id: Id,
	pub account_id: Id,
	pub amount: Money,
	pub interest_rate_bps: i16,
	pub tenure_months: i32,
	pub maturity_amount: Money,
	pub created_at: Time,
}

impl FixedDeposit {
	// Converts interest rate (in basis points) to a fraction
	pub fn interest_rate(&self) -> BigDecimal {
		BigDecimal::from(self.interest_rate_bps) / BigDecimal::from(10_000)
	}
}

/// Principal plus simple interest accrued over the deposit's tenure,
/// rounded half-up to the cent.
pub fn maturity_amount(principal: &Money, interest_rate_bps: i16, tenure_months: i32) -> Money {
	let principal = principal.as_decimal();
	let rate = BigDecimal::from(interest_rate_bps) / BigDecimal::from(10_000);
	let interest = principal * rate * BigDecimal::from(tenure_months) / BigDecimal::from(12);

	Money::new(principal + interest)
}

#[derive(Insertable)]
#[diesel(table_name = fixed_deposits)]
pub struct NewFixedDeposit<'a> {
	pub account_id: Id,
	pub amount: &'a Money,
	pub interest_rate_bps: i16,
	pub tenure_months: i32,
	pub maturity_amount: &'a Money,
	pub created_at: Time,
}

/// Data store implementation for operating on fixed deposits in the database
pub struct Repo;

impl Repo {
	pub fn new() -> Self {
		Repo
	}

	pub fn create(&self, conn: &mut SqliteConnection, new_fd: NewFixedDeposit) -> db::Result<FixedDeposit> {
		diesel::insert_into(fixed_deposits::table)
			.values(&new_fd)
			.get_result(conn)
			.map_err(Into::into)
	}

	pub fn find_by_id(&self, conn: &mut SqliteConnection, id: Id) -> db::Result<FixedDeposit> {
		fixed_deposits::table
			.find(id)
			.first(conn)
			.map_err(Into::into)
	}

	pub fn for_account(&self, conn: &mut SqliteConnection, account_id: Id) -> db::Result<Vec<FixedDeposit>> {
		fixed_deposits::table
			.filter(fixed_deposits::account_id.eq(account_id))
			.order((fixed_deposits::created_at.desc(), fixed_deposits::id.desc()))
			.load(conn)
			.map_err(Into::into)
	}

	pub fn count(&self, conn: &mut SqliteConnection) -> db::Result<i64> {
		fixed_deposits::table
			.count()
			.get_result(conn)
			.map_err(Into::into)
	}
}
