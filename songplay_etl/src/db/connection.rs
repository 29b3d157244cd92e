//! Connection helpers.
//!
//! Provides [`connect_sqlite`] that opens a connection and applies recommended PRAGMAs
//! for a local warehouse: WAL journaling, foreign_keys=ON, and a 5000ms busy_timeout.
//! With the `postgres` feature, [`connect_postgres`] opens a plain `PgConnection`.

use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};

use crate::errors::{EtlError, EtlResult};

/// Backend selected from a database URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `postgres://` or `postgresql://` URL, passed through untouched.
    Postgres(String),
    /// SQLite database file path (or `:memory:`).
    Sqlite(String),
}

impl DatabaseUrl {
    /// Classify a URL. `sqlite://` and `sqlite:` prefixes are stripped; any other
    /// string is taken as a SQLite path.
    pub fn parse(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return Self::Postgres(url.to_string());
        }
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        Self::Sqlite(path.to_string())
    }
}

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> EtlResult<SqliteConnection> {
    let mut conn = SqliteConnection::establish(database_url)?;

    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    sql_query("PRAGMA busy_timeout=5000;").execute(&mut conn)?;
    Ok(conn)
}

/// Open a PostgreSQL connection.
#[cfg(feature = "postgres")]
pub fn connect_postgres(database_url: &str) -> EtlResult<diesel::PgConnection> {
    Ok(diesel::PgConnection::establish(database_url)?)
}

/// Error returned for a PostgreSQL URL when the `postgres` feature is off.
pub fn postgres_unavailable(database_url: &str) -> EtlError {
    EtlError::UnsupportedDatabaseUrl(format!(
        "{database_url} (rebuild with the `postgres` feature)"
    ))
}
