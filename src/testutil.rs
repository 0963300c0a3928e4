use diesel::r2d2::ConnectionManager;
use diesel::sqlite::SqliteConnection;
use r2d2::PooledConnection;
use tempfile::TempDir;

use crate::account::{self, Account, NewAccount};
use crate::db;
use crate::money::Money;
use crate::types::now;

/// Test fixture owning a throwaway on-disk database.
pub struct Fixture {
	_dir: TempDir,
	pub pool: db::SqlitePool,
}

impl Fixture {
	pub fn new() -> Self {
		let dir = tempfile::tempdir().expect("creating temp dir");
		let path = dir.path().join("bank.db");
		let pool = db::connect(path.to_str().unwrap()).expect("opening test database");

		Fixture { _dir: dir, pool }
	}

	pub fn conn(&self) -> PooledConnection<ConnectionManager<SqliteConnection>> {
		self.pool.get().unwrap()
	}

	pub fn account_with_balance(&self, name: &str, balance: Money) -> Account {
		account::Repo::new()
			.create(&mut self.conn(), NewAccount {
				name,
				age: 30,
				mobile: "5550100",
				pin: "4321",
				balance: &balance,
				created_at: now(),
			})
			.unwrap()
	}
}
