use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::db;
use crate::money::Money;
use crate::schema::accounts;
use crate::types::{Id, Time};

/// A customer account and its current balance.
///
/// The balance is only ever touched through the repo's increment and
/// decrement primitives, inside a write transaction owned by the service;
/// accounts are never deleted.
#[derive(Queryable, Identifiable, PartialEq, Debug)]
#[diesel(table_name = accounts)]
pub struct Account {
	pub id: Id,
	pub name: String,
	pub age: i32,
	pub mobile: String,
	pub pin: String,
	pub balance: Money,
	pub created_at: Time,
}

#[derive(Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccount<'a> {
	pub name: &'a str,
	pub age: i32,
	pub mobile: &'a str,
	pub pin: &'a str,
	pub balance: &'a Money,
	pub created_at: Time,
}

/// Data store implementation for operating on accounts in the database
pub struct Repo;

impl Repo {
	pub fn new() -> Self {
		Repo
	}

	pub fn create(&self, conn: &mut SqliteConnection, new_account: NewAccount) -> db::Result<Account> {
		diesel::insert_into(accounts::table)
			.values(&new_account)
			.get_result(conn)
			.map_err(Into::into)
	}

	pub fn find_by_id(&self, conn: &mut SqliteConnection, id: Id) -> db::Result<Account> {
		accounts::table
			.find(id)
			.first(conn)
			.map_err(Into::into)
	}

	pub fn increment(&self, conn: &mut SqliteConnection, id: Id, amount: &Money) -> db::Result<Account> {
		let account = self.find_by_id(conn, id)?;
		let balance = &account.balance + amount;
		self.set_balance(conn, id, &balance)
	}

	pub fn decrement(&self, conn: &mut SqliteConnection, id: Id, amount: &Money) -> db::Result<Account> {
		let account = self.find_by_id(conn, id)?;
		let balance = &account.balance - amount;
		self.set_balance(conn, id, &balance)
	}

	pub fn count(&self, conn: &mut SqliteConnection) -> db::Result<i64> {
		accounts::table
			.count()
			.get_result(conn)
			.map_err(Into::into)
	}

	/// Sum of all account balances. Balances are stored as decimal text,
	/// so the fold happens here rather than in SQL.
	pub fn total_balance(&self, conn: &mut SqliteConnection) -> db::Result<Money> {
		let balances: Vec<Money> = accounts::table.select(accounts::balance).load(conn)?;
		Ok(balances.iter().fold(Money::zero(), |total, b| &total + b))
	}

	fn set_balance(&self, conn: &mut SqliteConnection, id: Id, balance: &Money) -> db::Result<Account> {
		diesel::update(accounts::table.find(id))
			.set(accounts::balance.eq(balance))
			.get_result(conn)
			.map_err(Into::into)
	}
}
