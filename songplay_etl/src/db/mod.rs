//! Database utilities for connections and the star-schema DDL.
//!
//! This module provides:
//! - URL dispatch: [`connection::DatabaseUrl`] tells a PostgreSQL URL from a SQLite path.
//! - SQLite connection helpers: [`connection::connect_sqlite`] applies WAL, foreign_keys=ON,
//!   and a 5000ms busy_timeout.
//! - Table bootstrap: [`tables::create_tables`] and [`tables::drop_tables`] run fixed DDL that is
//!   valid on both backends.
//!
//! Example:
//! ```no_run
//! use songplay_etl::db::{connection, tables};
//!
//! let db_path = std::env::temp_dir().join("songplay_example.db");
//! let mut conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! tables::create_tables(&mut conn).expect("create tables");
//! ```
//!
//! Note: PostgreSQL support sits behind the `postgres` feature and needs the system libpq.

pub mod connection;
pub mod tables;
