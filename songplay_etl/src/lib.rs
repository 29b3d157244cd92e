//! Batch ETL from song-metadata and activity-log JSON into a star-schema warehouse.
//!
//! The pipeline is linear: [`discover`] finds input files, [`extract`] turns each
//! one into rows, [`warehouse`] upserts them, and [`pipeline`] drives it file by
//! file with a commit after each.

#![warn(missing_docs)]

pub mod config;
pub mod db;
pub mod discover;
pub mod errors;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod warehouse;

pub use errors::{EtlError, EtlResult};
