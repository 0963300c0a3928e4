mod common;

use bank_core::account::{self, NewAccount};
use bank_core::db;
use bank_core::fixed_deposit::{self, NewFixedDeposit};
use bank_core::loan::{self, LoanState, NewLoan};
use bank_core::transaction::{self, Kind, NewTransaction};
use bank_core::types::now;

use crate::common::{money, Fixture};

fn insert_account(f: &Fixture, repo: &account::Repo, balance: &str) -> bank_core::account::Account {
	repo.create(&mut f.conn(), NewAccount {
		name: "Lucy Luke",
		age: 28,
		mobile: "9817100002",
		pin: "1111",
		balance: &money(balance),
		created_at: now(),
	})
	.unwrap()
}

#[test]
fn create_and_find_account() {
	let f = Fixture::new();
	let repo = account::Repo::new();

	let created = insert_account(&f, &repo, "250");
	let found = repo.find_by_id(&mut f.conn(), created.id).unwrap();

	assert_eq!(found, created);
	assert_eq!(found.balance, money("250.00"));
	assert!(found.id > 0);
}

#[test]
fn find_missing_account() {
	let f = Fixture::new();
	let repo = account::Repo::new();

	let err = repo.find_by_id(&mut f.conn(), 12_345).unwrap_err();
	assert_eq!(err, db::Error::RecordNotFound);
}

#[test]
fn increment_and_decrement_balance() {
	let f = Fixture::new();
	let repo = account::Repo::new();
	let account = insert_account(&f, &repo, "100");

	let account = repo.increment(&mut f.conn(), account.id, &money("25.50")).unwrap();
	assert_eq!(account.balance, money("125.50"));

	let account = repo.decrement(&mut f.conn(), account.id, &money("0.50")).unwrap();
	assert_eq!(account.balance, money("125.00"));
}

#[test]
fn account_ids_are_assigned_in_order() {
	let f = Fixture::new();
	let repo = account::Repo::new();

	let first = insert_account(&f, &repo, "0");
	let second = insert_account(&f, &repo, "0");
	assert!(second.id > first.id);

	assert_eq!(repo.count(&mut f.conn()).unwrap(), 2);
}

#[test]
fn transactions_order_newest_first_with_id_tiebreak() {
	let f = Fixture::new();
	let account = f_account(&f);
	let repo = transaction::Repo::new();

	// same timestamp on purpose; insertion order must decide
	let t = now();
	let amount = money("10");
	for _ in 0..3 {
		repo.create(&mut f.conn(), NewTransaction {
			account_id: account.id,
			kind: Kind::Deposit,
			amount: &amount,
			created_at: t,
			note: "",
		})
		.unwrap();
	}

	let transactions = repo.for_account(&mut f.conn(), account.id).unwrap();
	assert_eq!(transactions.len(), 3);
	assert!(transactions[0].id > transactions[1].id);
	assert!(transactions[1].id > transactions[2].id);

	let recent = repo.recent(&mut f.conn(), 2).unwrap();
	assert_eq!(recent.len(), 2);
	assert_eq!(recent[0].id, transactions[0].id);
}

#[test]
fn transactions_filter_by_account() {
	let f = Fixture::new();
	let repo = transaction::Repo::new();
	let account_repo = account::Repo::new();
	let first = insert_account(&f, &account_repo, "0");
	let second = insert_account(&f, &account_repo, "0");

	let amount = money("5");
	for account_id in [first.id, second.id, first.id] {
		repo.create(&mut f.conn(), NewTransaction {
			account_id,
			kind: Kind::Deposit,
			amount: &amount,
			created_at: now(),
			note: "",
		})
		.unwrap();
	}

	let transactions = repo.for_account(&mut f.conn(), first.id).unwrap();
	assert_eq!(transactions.len(), 2);
	assert!(transactions.iter().all(|tx| tx.account_id == first.id));
}

#[test]
fn loan_state_round_trips_and_updates() {
	let f = Fixture::new();
	let account = f_account(&f);
	let repo = loan::Repo::new();

	let amount = money("5000");
	let loan = repo
		.create(&mut f.conn(), NewLoan {
			account_id: account.id,
			amount: &amount,
			interest_rate_bps: 1_000,
			tenure_months: 6,
			state: LoanState::default(),
			created_at: now(),
		})
		.unwrap();
	assert_eq!(loan.state, LoanState::Pending);

	let loan = repo.set_state(&mut f.conn(), loan.id, LoanState::Approved).unwrap();
	assert_eq!(loan.state, LoanState::Approved);
	assert_eq!(repo.count_approved(&mut f.conn()).unwrap(), 1);

	let found = repo.find_by_id(&mut f.conn(), loan.id).unwrap();
	assert_eq!(found, loan);
}

#[test]
fn fixed_deposits_list_per_account() {
	let f = Fixture::new();
	let account = f_account(&f);
	let repo = fixed_deposit::Repo::new();

	let amount = money("1000");
	let maturity = fixed_deposit::maturity_amount(&amount, 550, 12);
	let fd = repo
		.create(&mut f.conn(), NewFixedDeposit {
			account_id: account.id,
			amount: &amount,
			interest_rate_bps: 550,
			tenure_months: 12,
			maturity_amount: &maturity,
			created_at: now(),
		})
		.unwrap();

	assert_eq!(fd.maturity_amount, money("1055.00"));
	assert_eq!(fd.interest_rate(), "0.055".parse::<bigdecimal::BigDecimal>().unwrap());

	let fds = repo.for_account(&mut f.conn(), account.id).unwrap();
	assert_eq!(fds, vec![fd]);
	assert_eq!(repo.count(&mut f.conn()).unwrap(), 1);
}

fn f_account(f: &Fixture) -> bank_core::account::Account {
	insert_account(f, &account::Repo::new(), "0")
}
