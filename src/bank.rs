use diesel::sqlite::SqliteConnection;
use log::{debug, info};

use crate::account::{self, Account, NewAccount};
use crate::config::Config;
use crate::db;
use crate::error::{Entity, Error, ErrorKind, Result};
use crate::fixed_deposit::{self, FixedDeposit, NewFixedDeposit};
use crate::loan::{self, Loan, LoanState, NewLoan};
use crate::money::Money;
use crate::transaction::{self, Kind, NewTransaction, Transaction};
use crate::types::{now, Id};

/// Service for performing ledger operations
///
/// Every balance mutation runs inside an immediate SQLite transaction: the
/// write lock is taken before the balance is read, so concurrent writers on
/// the same account serialize, and the balance update commits or rolls back
/// together with its transaction-log entry.
pub struct Service<'a> {
	db: db::SqlitePool,
	accounts: &'a account::Repo,
	transactions: &'a transaction::Repo,
	fixed_deposits: &'a fixed_deposit::Repo,
	loans: &'a loan::Repo,
	config: &'a Config,
}

/// Parameter object for creating a new Service
pub struct NewService<'a> {
	pub db: db::SqlitePool,
	pub account_repo: &'a account::Repo,
	pub transaction_repo: &'a transaction::Repo,
	pub fixed_deposit_repo: &'a fixed_deposit::Repo,
	pub loan_repo: &'a loan::Repo,
	pub config: &'a Config,
}

/// Parameter object for opening a customer account
pub struct OpenAccount<'a> {
	pub name: &'a str,
	pub age: i32,
	pub mobile: &'a str,
	pub pin: &'a str,
	pub initial_deposit: Money,
}

/// Ledger-wide aggregates for the dashboard header
#[derive(Debug, PartialEq)]
pub struct Stats {
	pub customers: i64,
	pub total_balance: Money,
	pub fixed_deposits: i64,
	pub approved_loans: i64,
}

impl<'a> Service<'a> {
	pub fn new(v: NewService<'a>) -> Self {
		Service {
			db: v.db,
			accounts: v.account_repo,
			transactions: v.transaction_repo,
			fixed_deposits: v.fixed_deposit_repo,
			loans: v.loan_repo,
			config: v.config,
		}
	}

	/// Open a customer account, recording any opening balance in the
	/// transaction log.
	pub fn open_account(&self, req: OpenAccount) -> Result<Account> {
		if req.name.trim().is_empty() {
			return Err(Error::validation("name must not be empty"));
		}
		if req.mobile.trim().is_empty() {
			return Err(Error::validation("mobile must not be empty"));
		}
		if req.pin.trim().is_empty() {
			return Err(Error::validation("pin must not be empty"));
		}
		if req.age <= 0 {
			return Err(Error::validation("age must be a positive integer"));
		}
		if req.initial_deposit.is_negative() {
			return Err(Error::validation("initial deposit must not be negative"));
		}

		let mut conn = self.db.get()?;
		let account = conn.immediate_transaction::<Account, Error, _>(|conn| {
			let account = self.accounts.create(conn, NewAccount {
				name: req.name,
				age: req.age,
				mobile: req.mobile,
				pin: req.pin,
				balance: &req.initial_deposit,
				created_at: now(),
			})?;

			if req.initial_deposit.is_positive() {
				self.transactions.create(conn, NewTransaction {
					account_id: account.id,
					kind: Kind::Deposit,
					amount: &req.initial_deposit,
					created_at: now(),
					note: "Initial deposit",
				})?;
			}

			Ok(account)
		})?;

		info!("opened account {} for {}", account.id, account.name);
		Ok(account)
	}

	/// Deposit funds into a customer's account
	///
	/// # Arguments
	/// * `account_id` - account the funds belong to
	/// * `amount` - amount deposited
	pub fn deposit(&self, account_id: Id, amount: &Money) -> Result<Money> {
		if !amount.is_positive() {
			return Err(Error::validation("deposit amount must be positive"));
		}

		let mut conn = self.db.get()?;
		let balance = conn.immediate_transaction::<Money, Error, _>(|conn| {
			let account = find_account(self.accounts, conn, account_id)?;
			let account = self.accounts.increment(conn, account.id, amount)?;

			self.transactions.create(conn, NewTransaction {
				account_id,
				kind: Kind::Deposit,
				amount,
				created_at: now(),
				note: "",
			})?;

			Ok(account.balance)
		})?;

		debug!("deposit of {} to account {}", amount, account_id);
		Ok(balance)
	}

	/// Withdraw funds from a customer's account
	///
	/// # Arguments
	/// * `account_id` - account the funds belong to
	/// * `amount` - amount withdrawn
	pub fn withdraw(&self, account_id: Id, amount: &Money) -> Result<Money> {
		if !amount.is_positive() {
			return Err(Error::validation("withdrawal amount must be positive"));
		}

		let mut conn = self.db.get()?;
		let balance = conn.immediate_transaction::<Money, Error, _>(|conn| {
			let account = find_account(self.accounts, conn, account_id)?;
			if account.balance.lt(amount) {
				return Err(Error::new(ErrorKind::InsufficientFunds));
			}

			let account = self.accounts.decrement(conn, account.id, amount)?;
			assert!(!account.balance.is_negative(), "invalid state: account balance should never be negative");

			self.transactions.create(conn, NewTransaction {
				account_id,
				kind: Kind::Withdraw,
				amount,
				created_at: now(),
				note: "",
			})?;

			Ok(account.balance)
		})?;

		debug!("withdrawal of {} from account {}", amount, account_id);
		Ok(balance)
	}

	pub fn get_balance(&self, account_id: Id) -> Result<Money> {
		Ok(self.get_account(account_id)?.balance)
	}

	pub fn get_account(&self, account_id: Id) -> Result<Account> {
		let mut conn = self.db.get()?;
		find_account(self.accounts, &mut conn, account_id)
	}

	/// Move part of an account's balance into a fixed deposit.
	///
	/// The debit goes through the account repo's decrement primitive
	/// rather than `withdraw` - the checks `withdraw` would make have
	/// already happened here - and commits together with the deposit
	/// record and the log entry.
	pub fn create_fd(&self, account_id: Id, amount: &Money, tenure_months: i32) -> Result<FixedDeposit> {
		if !amount.is_positive() {
			return Err(Error::validation("deposit amount must be positive"));
		}
		if tenure_months <= 0 {
			return Err(Error::validation("tenure must be a positive number of months"));
		}

		let mut conn = self.db.get()?;
		let fd = conn.immediate_transaction::<FixedDeposit, Error, _>(|conn| {
			let account = find_account(self.accounts, conn, account_id)?;
			if account.balance.lt(amount) {
				return Err(Error::new(ErrorKind::InsufficientFunds));
			}

			let account = self.accounts.decrement(conn, account.id, amount)?;
			assert!(!account.balance.is_negative(), "invalid state: account balance should never be negative");

			let maturity = fixed_deposit::maturity_amount(amount, self.config.fd_rate_bps, tenure_months);
			let fd = self.fixed_deposits.create(conn, NewFixedDeposit {
				account_id,
				amount,
				interest_rate_bps: self.config.fd_rate_bps,
				tenure_months,
				maturity_amount: &maturity,
				created_at: now(),
			})?;

			let note = format!("FD {} mo", tenure_months);
			self.transactions.create(conn, NewTransaction {
				account_id,
				kind: Kind::FdCreate,
				amount,
				created_at: now(),
				note: &note,
			})?;

			Ok(fd)
		})?;

		info!(
			"fixed deposit {} of {} on account {}, matures at {}",
			fd.id, fd.amount, account_id, fd.maturity_amount
		);
		Ok(fd)
	}

	/// Record a loan application. The balance stays untouched until the
	/// loan is approved.
	pub fn apply_loan(&self, account_id: Id, amount: &Money, tenure_months: i32) -> Result<Loan> {
		if !amount.is_positive() {
			return Err(Error::validation("loan amount must be positive"));
		}
		if tenure_months <= 0 {
			return Err(Error::validation("tenure must be a positive number of months"));
		}

		let mut conn = self.db.get()?;
		find_account(self.accounts, &mut conn, account_id)?;

		let loan = self.loans.create(&mut conn, NewLoan {
			account_id,
			amount,
			interest_rate_bps: self.config.loan_rate_bps,
			tenure_months,
			state: LoanState::default(),
			created_at: now(),
		})?;

		info!("loan application {} of {} on account {}", loan.id, loan.amount, account_id);
		Ok(loan)
	}

	/// Approve a pending loan and credit the principal to the owning
	/// account. A loan is credited at most once; approving it again fails
	/// with `AlreadyApproved` and leaves the balance alone.
	pub fn approve_loan(&self, loan_id: Id) -> Result<Loan> {
		let mut conn = self.db.get()?;
		let loan = conn.immediate_transaction::<Loan, Error, _>(|conn| {
			let loan = find_loan(self.loans, conn, loan_id)?;
			if loan.approved() {
				return Err(Error::new(ErrorKind::AlreadyApproved));
			}

			let loan = self.loans.set_state(conn, loan.id, LoanState::Approved)?;
			self.accounts.increment(conn, loan.account_id, &loan.amount)?;

			let note = format!("LoanID:{}", loan.id);
			self.transactions.create(conn, NewTransaction {
				account_id: loan.account_id,
				kind: Kind::LoanCredit,
				amount: &loan.amount,
				created_at: now(),
				note: &note,
			})?;

			Ok(loan)
		})?;

		info!("loan {} approved, {} credited to account {}", loan.id, loan.amount, loan.account_id);
		Ok(loan)
	}

	/// Latest transactions across all accounts, newest first.
	pub fn recent_transactions(&self, limit: i64) -> Result<Vec<Transaction>> {
		let mut conn = self.db.get()?;
		self.transactions.recent(&mut conn, limit).map_err(Into::into)
	}

	/// An account's transaction history, newest first.
	pub fn account_transactions(&self, account_id: Id) -> Result<Vec<Transaction>> {
		let mut conn = self.db.get()?;
		find_account(self.accounts, &mut conn, account_id)?;
		self.transactions.for_account(&mut conn, account_id).map_err(Into::into)
	}

	/// Every loan application, newest first.
	pub fn list_loans(&self) -> Result<Vec<Loan>> {
		let mut conn = self.db.get()?;
		self.loans.list_all(&mut conn).map_err(Into::into)
	}

	pub fn account_loans(&self, account_id: Id) -> Result<Vec<Loan>> {
		let mut conn = self.db.get()?;
		find_account(self.accounts, &mut conn, account_id)?;
		self.loans.for_account(&mut conn, account_id).map_err(Into::into)
	}

	pub fn account_fixed_deposits(&self, account_id: Id) -> Result<Vec<FixedDeposit>> {
		let mut conn = self.db.get()?;
		find_account(self.accounts, &mut conn, account_id)?;
		self.fixed_deposits.for_account(&mut conn, account_id).map_err(Into::into)
	}

	pub fn stats(&self) -> Result<Stats> {
		let mut conn = self.db.get()?;
		Ok(Stats {
			customers: self.accounts.count(&mut conn)?,
			total_balance: self.accounts.total_balance(&mut conn)?,
			fixed_deposits: self.fixed_deposits.count(&mut conn)?,
			approved_loans: self.loans.count_approved(&mut conn)?,
		})
	}
}

fn find_account(repo: &account::Repo, conn: &mut SqliteConnection, id: Id) -> Result<Account> {
	repo.find_by_id(conn, id).map_err(|e| match e {
		db::Error::RecordNotFound => Error::new(ErrorKind::NotFound(Entity::Account)),
		e => Error::from(e),
	})
}

fn find_loan(repo: &loan::Repo, conn: &mut SqliteConnection, id: Id) -> Result<Loan> {
	repo.find_by_id(conn, id).map_err(|e| match e {
		db::Error::RecordNotFound => Error::new(ErrorKind::NotFound(Entity::Loan)),
		e => Error::from(e),
	})
}
