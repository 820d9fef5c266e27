//! `cad import` — ingest task records from a JSON file.

use crate::output::{OutputMode, render_confirmation};
use anyhow::{Context as _, Result};
use cadence_core::error::{CadenceError, ErrorCode};
use cadence_core::model::ImportRecord;
use cadence_core::storage::Store;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to a JSON array of task records
    /// (`policy`, `task`, `periodicity`, `due_date`, optional names).
    pub file: PathBuf,
}

pub fn run_import(
    args: &ImportArgs,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> Result<()> {
    let store = Store::open(project_root)?;

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let records: Vec<ImportRecord> = serde_json::from_str(&content).map_err(|err| {
        CadenceError::with_message(
            ErrorCode::ImportParseError,
            format!("{}: {err}", args.file.display()),
        )
    })?;

    let mut schedule = store.load();
    let added = schedule.import_records(&records);
    store.persist(&schedule);

    tracing::info!(added, total = schedule.tasks.len(), "imported tasks");
    render_confirmation(
        output,
        quiet,
        &format!("Imported {added} tasks ({} total)", schedule.tasks.len()),
    )?;
    Ok(())
}
