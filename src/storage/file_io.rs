//! File I/O utilities with atomic writes
//!
//! Budget documents are JSON files named by the user. Writes go to a
//! sibling temp file that is renamed over the target, so a crash leaves
//! either the old document or the new one.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::models::Budget;
use crate::services::stats;

/// Read JSON from a file, returning an error if file doesn't exist
pub fn read_json_required<T, P>(path: P) -> BudgetResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(BudgetError::budget_not_found(path.display().to_string()));
    }

    let file = File::open(path)
        .map_err(|e| BudgetError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| BudgetError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> BudgetResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            BudgetError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| BudgetError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| BudgetError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| BudgetError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| BudgetError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BudgetError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Load a budget document
///
/// Stored totals and statistics are not trusted: they are recomputed from
/// the items and goal, so a hand-edited file always shows consistent figures.
pub fn load_budget<P: AsRef<Path>>(path: P) -> BudgetResult<Budget> {
    let path = path.as_ref();
    let mut budget: Budget = read_json_required(path)?;

    let stored = budget.clone();
    stats::recompute(&mut budget);
    if budget != stored {
        tracing::warn!(path = %path.display(), "stored budget figures were stale, recomputed");
    }

    tracing::info!(path = %path.display(), budget = %budget.id, "loaded budget");
    Ok(budget)
}

/// Save a budget document, replacing any existing file
pub fn save_budget<P: AsRef<Path>>(path: P, budget: &Budget) -> BudgetResult<()> {
    let path = path.as_ref();
    write_json_atomic(path, budget)?;
    tracing::info!(path = %path.display(), budget = %budget.id, "saved budget");
    Ok(())
}
