#![allow(dead_code)]

use diesel::r2d2::ConnectionManager;
use diesel::sqlite::SqliteConnection;
use r2d2::PooledConnection;
use tempfile::TempDir;

use bank_core::account::Account;
use bank_core::{account, db, fixed_deposit, loan, transaction};
use bank_core::{Config, Money, NewService, OpenAccount, Service};

/// Test fixture owning a throwaway on-disk database.
pub struct Fixture {
	_dir: TempDir,
	pub pool: db::SqlitePool,
	pub config: Config,
}

impl Fixture {
	pub fn new() -> Self {
		let dir = tempfile::tempdir().expect("creating temp dir");
		let path = dir.path().join("bank.db");
		let pool = db::connect(path.to_str().unwrap()).expect("opening test database");

		Fixture {
			_dir: dir,
			pool,
			config: Config::default(),
		}
	}

	pub fn conn(&self) -> PooledConnection<ConnectionManager<SqliteConnection>> {
		self.pool.get().unwrap()
	}
}

pub struct Suite {
	pub account_repo: account::Repo,
	pub transaction_repo: transaction::Repo,
	pub fixed_deposit_repo: fixed_deposit::Repo,
	pub loan_repo: loan::Repo,
}

impl Suite {
	pub fn setup() -> Self {
		Suite {
			account_repo: account::Repo::new(),
			transaction_repo: transaction::Repo::new(),
			fixed_deposit_repo: fixed_deposit::Repo::new(),
			loan_repo: loan::Repo::new(),
		}
	}

	pub fn service<'a>(&'a self, f: &'a Fixture) -> Service<'a> {
		Service::new(NewService {
			db: f.pool.clone(),
			account_repo: &self.account_repo,
			transaction_repo: &self.transaction_repo,
			fixed_deposit_repo: &self.fixed_deposit_repo,
			loan_repo: &self.loan_repo,
			config: &f.config,
		})
	}

	pub fn open_account(&self, service: &Service, initial: &str) -> Account {
		service
			.open_account(OpenAccount {
				name: "Bob Roberts",
				age: 34,
				mobile: "9817100001",
				pin: "4321",
				initial_deposit: money(initial),
			})
			.unwrap()
	}
}

pub fn money(s: &str) -> Money {
	s.parse().unwrap()
}
