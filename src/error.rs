use strum_macros::Display;
use thiserror::Error;

use crate::db;

pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur when performing a ledger operation
#[derive(Debug, PartialEq, Error)]
#[error("{kind}")]
pub struct Error {
	kind: ErrorKind,
}

impl Error {
	pub fn new(kind: ErrorKind) -> Error {
		Error { kind }
	}

	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	pub(crate) fn validation(msg: impl Into<String>) -> Error {
		Error::new(ErrorKind::Validation(msg.into()))
	}
}

/// The kind of an error that can occur.
#[derive(Debug, PartialEq, Error)]
pub enum ErrorKind {
	/// Malformed or out-of-range input. The caller's fault; never worth
	/// an automatic retry.
	#[error("invalid input: {0}")]
	Validation(String),
	/// The referenced record does not exist.
	#[error("{0} not found")]
	NotFound(Entity),
	/// Business-rule violation, not a system fault.
	#[error("not enough funds in account")]
	InsufficientFunds,
	/// A loan is credited at most once; approval never repeats.
	#[error("loan is already approved")]
	AlreadyApproved,
	#[error("db error: {0}")]
	Database(db::Error),
}

/// Record types a caller can reference by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Entity {
	#[strum(to_string = "account")]
	Account,
	#[strum(to_string = "fixed deposit")]
	FixedDeposit,
	#[strum(to_string = "loan")]
	Loan,
}

impl From<db::Error> for Error {
	fn from(e: db::Error) -> Self {
		Error::new(ErrorKind::Database(e))
	}
}

impl From<r2d2::Error> for Error {
	fn from(e: r2d2::Error) -> Self {
		Error::new(ErrorKind::Database(db::Error::from(e)))
	}
}

impl From<diesel::result::Error> for Error {
	fn from(e: diesel::result::Error) -> Self {
		Error::new(ErrorKind::Database(db::Error::from(e)))
	}
}
