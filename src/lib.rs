pub mod account;
pub mod bank;
pub mod config;
pub mod db;
pub mod error;
pub mod fixed_deposit;
pub mod loan;
pub mod money;
pub mod schema;
pub mod transaction;
pub mod types;

#[cfg(test)]
mod testutil;

pub use bank::{NewService, OpenAccount, Service, Stats};
pub use config::Config;
pub use error::{Entity, Error, ErrorKind, Result};
pub use money::Money;
pub use types::{Id, Time};
