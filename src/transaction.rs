use std::str::FromStr;

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
use crate::schema::transactions;
use crate::types::{Id, Time};

/// A balance-affecting event recorded against an account.
///
/// Entries are append-only and written in the same database transaction as
/// the balance mutation they record.
#[derive(Queryable, Identifiable, Associations, PartialEq, Debug)]
#[diesel(belongs_to(Account))]
#[diesel(table_name = transactions)]
pub struct Transaction {
	pub id: Id,
	/// The owning account's id
	pub account_id: Id,
	pub kind: Kind,
	pub amount: Money,
	pub created_at: Time,
	pub note: String,
}

#[derive(AsExpression, FromSqlRow, Eq, PartialEq, Clone, Copy, EnumString, Display, Debug)]
#[diesel(sql_type = Text)]
#[strum(serialize_all = "snake_case")]
pub enum Kind {
	/// Funds put into an account, including the opening deposit
	Deposit,
	/// Funds removed from an account
	Withdraw,
	/// Principal moved out of an account into a fixed deposit
	FdCreate,
	/// Loan principal credited to an account on approval
	LoanCredit,
}

impl ToSql<Text, Sqlite> for Kind {
	fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
		out.set_value(self.to_string());
		Ok(IsNull::No)
	}
}

impl FromSql<Text, Sqlite> for Kind {
	fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
		let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
		Ok(Kind::from_str(&s)?)
	}
}

#[derive(Insertable)]
#[diesel(table_name = transactions)]
pub struct NewTransaction<'a> {
	pub account_id: Id,
	pub kind: Kind,
	pub amount: &'a Money,
	pub created_at: Time,
	pub note: &'a str,
}

/// Data store implementation for operating on transactions in the database
pub struct Repo;

impl Repo {
	pub fn new() -> Self {
		Repo
	}

	pub fn create(&self, conn: &mut SqliteConnection, new_transaction: NewTransaction) -> db::Result<Transaction> {
		diesel::insert_into(transactions::table)
			.values(&new_transaction)
			.get_result(conn)
			.map_err(Into::into)
	}

	/// Latest transactions across all accounts, newest first. Timestamp
	/// ties fall back to insertion order.
	pub fn recent(&self, conn: &mut SqliteConnection, limit: i64) -> db::Result<Vec<Transaction>> {
		transactions::table
			.order((transactions::created_at.desc(), transactions::id.desc()))
			.limit(limit)
			.load(conn)
			.map_err(Into::into)
	}

	pub fn for_account(&self, conn: &mut SqliteConnection, account_id: Id) -> db::Result<Vec<Transaction>> {
		transactions::table
			.filter(transactions::account_id.eq(account_id))
			.order((transactions::created_at.desc(), transactions::id.desc()))
			.load(conn)
			.map_err(Into::into)
	}
}

#[cfg(test)]
mod tests {
	use crate::testutil::*;

	use super::*;

	#[test]
	fn create_transaction() {
		let f = Fixture::new();
		let account = f.account_with_balance("Bob Roberts", "250".parse().unwrap());
		let repo = Repo::new();

		let amount: Money = "250".parse().unwrap();
		let got = repo
			.create(&mut f.conn(), NewTransaction {
				account_id: account.id,
				kind: Kind::Deposit,
				amount: &amount,
				created_at: crate::types::now(),
				note: "Initial deposit",
			})
			.unwrap();

		let want = Transaction {
			id: got.id,
			account_id: account.id,
			kind: Kind::Deposit,
			amount,
			created_at: got.created_at,
			note: "Initial deposit".to_string(),
		};

		assert_eq!(got, want);
	}
}
