//! Batch driver.
//!
//! ## What this does
//! - Discovers every `*.json` file under a root ([`crate::discover::json_files`]).
//! - Runs an [`Extractor`] on each file, in discovery order.
//! - Wraps each file in its own unit of work and commits it before moving on.
//!
//! ## Failure
//! The first failing file is rolled back and its error returned; the batch stops
//! there. Files before it stay committed, and a rerun over the same trees is
//! idempotent because every warehouse write is an upsert.

use std::path::Path;

use crate::config::EtlConfig;
use crate::discover::json_files;
use crate::errors::EtlResult;
use crate::extract::{Extractor, log::process_log_file, song::process_song_file};
use crate::report::{BatchReport, EtlReport, FileReport};
use crate::warehouse::Warehouse;

/// Run `extract` over every JSON file under `root`, committing after each file.
pub fn process_data(
    wh: &mut dyn Warehouse,
    root: &Path,
    extract: Extractor,
) -> EtlResult<BatchReport> {
    let files = json_files(root);
    let num_files = files.len();
    tracing::info!(files = num_files, root = %root.display(), "{num_files} files found in {}", root.display());

    let mut report = BatchReport::default();
    for (i, file) in files.iter().enumerate() {
        let rows = process_one(wh, file, extract)?;
        report.files += 1;
        report.rows += rows;
        tracing::info!(file = %file.display(), "{}/{num_files} files processed.", i + 1);
    }
    Ok(report)
}

fn process_one(wh: &mut dyn Warehouse, file: &Path, extract: Extractor) -> EtlResult<FileReport> {
    wh.begin()?;
    match extract(wh, file) {
        Ok(rows) => {
            wh.commit()?;
            Ok(rows)
        }
        Err(err) => {
            if let Err(rb) = wh.rollback() {
                tracing::warn!(file = %file.display(), error = %rb, "rollback failed");
            }
            tracing::error!(file = %file.display(), error = %err, "aborting batch");
            Err(err)
        }
    }
}

/// Load the song tree, then the log tree, through one warehouse.
///
/// Songs go first so that log events can resolve their song and artist ids.
pub fn run(wh: &mut dyn Warehouse, config: &EtlConfig) -> EtlResult<EtlReport> {
    let songs = process_data(wh, &config.song_data, process_song_file)?;
    let logs = process_data(wh, &config.log_data, process_log_file)?;
    Ok(EtlReport { songs, logs })
}
