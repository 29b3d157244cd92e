//! Per-file extractors.
//!
//! Each extractor reads one input file, turns it into rows, and writes them through a
//! [`crate::warehouse::Warehouse`]. Both share the [`Extractor`] signature so the batch
//! driver can run either one over a directory tree.

pub mod log;
pub mod song;

use std::path::Path;

use crate::errors::EtlResult;
use crate::report::FileReport;
use crate::warehouse::Warehouse;

/// Signature shared by [`song::process_song_file`] and [`log::process_log_file`].
pub type Extractor = fn(&mut dyn Warehouse, &Path) -> EtlResult<FileReport>;
