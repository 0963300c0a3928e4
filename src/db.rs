use diesel::connection::SimpleConnection;
use diesel::r2d2::ConnectionManager;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Open a pooled connection to the SQLite database at `database_url`,
/// creating the schema if it does not exist yet.
///
/// Every pooled connection enables WAL and foreign keys and sets a busy
/// timeout so concurrent writers queue on the database lock instead of
/// failing immediately.
pub fn connect(database_url: &str) -> Result<SqlitePool> {
	let manager = ConnectionManager::<SqliteConnection>::new(database_url);
	let pool = r2d2::Pool::builder()
		.connection_customizer(Box::new(ConnectionOptions))
		.build(manager)
		.map_err(|e| Error::Connection(e.to_string()))?;

	let mut conn = pool.get()?;
	conn.run_pending_migrations(MIGRATIONS)
		.map_err(|e| Error::Migration(e.to_string()))?;

	Ok(pool)
}

#[derive(Debug)]
struct ConnectionOptions;

impl r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
	fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
		conn.batch_execute(
			"PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;",
		)
		.map_err(diesel::r2d2::Error::QueryError)
	}
}

/// Error that can occur when querying against the database
#[derive(Debug, PartialEq, Error)]
pub enum Error {
	#[error("record violates a unique constraint")]
	RecordAlreadyExists,
	#[error("record does not exist")]
	RecordNotFound,
	#[error("opening database connection: {0}")]
	Connection(String),
	#[error("running migrations: {0}")]
	Migration(String),
	/// Used as a catch-all for everything else diesel reports
	#[error("database error: {0:?}")]
	DatabaseError(diesel::result::Error),
}

impl From<diesel::result::Error> for Error {
	fn from(e: diesel::result::Error) -> Self {
		use diesel::result::DatabaseErrorKind::UniqueViolation;
		use diesel::result::Error::{DatabaseError, NotFound};

		match e {
			DatabaseError(UniqueViolation, _) => Error::RecordAlreadyExists,
			NotFound => Error::RecordNotFound,

			_ => Error::DatabaseError(e),
		}
	}
}

impl From<r2d2::Error> for Error {
	fn from(e: r2d2::Error) -> Self {
		Error::Connection(e.to_string())
	}
}
