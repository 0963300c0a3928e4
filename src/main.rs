use std::process;

use clap::{Parser, Subcommand};
use log::error;

use bank_core::{account, db, fixed_deposit, loan, transaction};
use bank_core::{Config, Money, NewService, OpenAccount, Service};

#[derive(Parser)]
#[command(name = "bank", about = "Banking back-office ledger", version)]
struct Cli {
	/// Path to the SQLite database (overrides BANK_DATABASE_URL)
	#[arg(long)]
	database: Option<String>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Open a customer account
	OpenAccount {
		name: String,
		age: i32,
		mobile: String,
		pin: String,
		/// Opening balance
		#[arg(long, default_value = "0")]
		initial: Money,
	},
	/// Deposit funds into an account
	Deposit { account: i64, amount: Money },
	/// Withdraw funds from an account
	Withdraw { account: i64, amount: Money },
	/// Show an account's balance
	Balance { account: i64 },
	/// Move funds from an account into a fixed deposit
	CreateFd {
		account: i64,
		amount: Money,
		tenure_months: i32,
	},
	/// File a loan application
	ApplyLoan {
		account: i64,
		amount: Money,
		tenure_months: i32,
	},
	/// Approve a pending loan (admin credentials required)
	ApproveLoan {
		loan: i64,
		#[arg(long)]
		user: String,
		#[arg(long)]
		pass: String,
	},
	/// List loan applications, newest first
	Loans,
	/// Show the transaction log, newest first
	Transactions {
		/// Restrict to one account
		#[arg(long)]
		account: Option<i64>,
		#[arg(long, default_value_t = 10)]
		limit: i64,
	},
	/// Ledger-wide dashboard numbers
	Stats,
}

fn main() {
	pretty_env_logger::init();

	if let Err(e) = run(Cli::parse()) {
		error!("{}", e);
		eprintln!("error: {}", e);
		process::exit(1);
	}
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
	let mut config = Config::from_env();
	if let Some(database) = cli.database {
		config.database_url = database;
	}

	let pool = db::connect(&config.database_url)?;
	let account_repo = account::Repo::new();
	let transaction_repo = transaction::Repo::new();
	let fixed_deposit_repo = fixed_deposit::Repo::new();
	let loan_repo = loan::Repo::new();

	let service = Service::new(NewService {
		db: pool,
		account_repo: &account_repo,
		transaction_repo: &transaction_repo,
		fixed_deposit_repo: &fixed_deposit_repo,
		loan_repo: &loan_repo,
		config: &config,
	});

	match cli.command {
		Command::OpenAccount { name, age, mobile, pin, initial } => {
			let account = service.open_account(OpenAccount {
				name: &name,
				age,
				mobile: &mobile,
				pin: &pin,
				initial_deposit: initial,
			})?;
			println!("account created: {}", account.id);
		}
		Command::Deposit { account, amount } => {
			let balance = service.deposit(account, &amount)?;
			println!("deposited {}, new balance {}", amount, balance);
		}
		Command::Withdraw { account, amount } => {
			let balance = service.withdraw(account, &amount)?;
			println!("withdrawn {}, new balance {}", amount, balance);
		}
		Command::Balance { account } => {
			println!("{}", service.get_balance(account)?);
		}
		Command::CreateFd { account, amount, tenure_months } => {
			let fd = service.create_fd(account, &amount, tenure_months)?;
			println!("fd {} created, maturity {}", fd.id, fd.maturity_amount);
		}
		Command::ApplyLoan { account, amount, tenure_months } => {
			let loan = service.apply_loan(account, &amount, tenure_months)?;
			println!("loan application {} submitted, awaiting approval", loan.id);
		}
		Command::ApproveLoan { loan, user, pass } => {
			if user != config.admin_user || pass != config.admin_pass {
				return Err("invalid admin credentials".into());
			}
			let loan = service.approve_loan(loan)?;
			println!("loan {} approved, {} credited to account {}", loan.id, loan.amount, loan.account_id);
		}
		Command::Loans => {
			for loan in service.list_loans()? {
				println!(
					"loan {} | account {} | {} | {} mo | {}",
					loan.id, loan.account_id, loan.amount, loan.tenure_months, loan.state
				);
			}
		}
		Command::Transactions { account, limit } => {
			let transactions = match account {
				Some(account_id) => service.account_transactions(account_id)?,
				None => service.recent_transactions(limit)?,
			};
			for tx in transactions {
				println!(
					"{} | account {} | {} | {} | {}",
					tx.created_at, tx.account_id, tx.kind, tx.amount, tx.note
				);
			}
		}
		Command::Stats => {
			let stats = service.stats()?;
			println!("customers: {}", stats.customers);
			println!("total balance: {}", stats.total_balance);
			println!("fixed deposits: {}", stats.fixed_deposits);
			println!("approved loans: {}", stats.approved_loans);
			println!("payments: {}", config.payment_id);
		}
	}

	Ok(())
}
