use std::env;
use std::str::FromStr;

use dotenv::dotenv;

/// Runtime configuration for the ledger core.
///
/// Interest rates are annual, in basis points (550 = 5.5% p.a.), fixed at
/// deployment time rather than per request. The admin credentials and the
/// payment identifier are carried for presentation layers; the core itself
/// never checks them.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub fd_rate_bps: i16,
	pub loan_rate_bps: i16,
	pub admin_user: String,
	pub admin_pass: String,
	pub payment_id: String,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			database_url: "bank.db".to_string(),
			fd_rate_bps: 550,
			loan_rate_bps: 1_000,
			admin_user: "admin".to_string(),
			admin_pass: "admin123".to_string(),
			payment_id: "9817179377".to_string(),
		}
	}
}

impl Config {
	/// Load configuration from `BANK_*` environment variables, falling
	/// back to the defaults above.
	///
	/// Loads a `.env` file from the working directory when present.
	pub fn from_env() -> Config {
		dotenv().ok();
		let defaults = Config::default();

		Config {
			database_url: env::var("BANK_DATABASE_URL").unwrap_or(defaults.database_url),
			fd_rate_bps: env_or("BANK_FD_RATE_BPS", defaults.fd_rate_bps),
			loan_rate_bps: env_or("BANK_LOAN_RATE_BPS", defaults.loan_rate_bps),
			admin_user: env::var("BANK_ADMIN_USER").unwrap_or(defaults.admin_user),
			admin_pass: env::var("BANK_ADMIN_PASS").unwrap_or(defaults.admin_pass),
			payment_id: env::var("BANK_PAYMENT_ID").unwrap_or(defaults.payment_id),
		}
	}
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
	env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn documented_defaults() {
		let config = Config::default();
		assert_eq!(config.fd_rate_bps, 550);
		assert_eq!(config.loan_rate_bps, 1_000);
		assert_eq!(config.database_url, "bank.db");
		assert_eq!(config.admin_user, "admin");
	}
}
