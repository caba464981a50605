//! Backup export and merge-based restore.
//!
//! The interchange format is a single JSON object holding one user's data.
//! Restore merges by identifier: incoming records win on id collision,
//! non-conflicting existing records are retained; badge records are
//! replaced wholesale for the owning user.

use crate::store::Store;
use crate::types::{User, UserBadge, WorkoutLog, WorkoutRoutine};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Backup interchange format
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackupFile {
    pub user: User,
    pub routines: Vec<WorkoutRoutine>,
    pub logs: Vec<WorkoutLog>,
    pub badges: Vec<UserBadge>,
    pub exported_at: DateTime<Utc>,
}

/// Collect one user's full data set for export
pub fn export(store: &Store, user: &User, now: DateTime<Utc>) -> Result<BackupFile> {
    Ok(BackupFile {
        user: user.clone(),
        routines: store.routines_for(user.id)?,
        logs: store.workout_logs_for(user.id)?,
        badges: store.user_badges(user.id)?,
        exported_at: now,
    })
}

/// Write a backup to a JSON file
pub fn export_to_file(store: &Store, user: &User, now: DateTime<Utc>, path: &Path) -> Result<()> {
    let backup = export(store, user, now)?;
    let contents = serde_json::to_string_pretty(&backup)?;
    std::fs::write(path, contents)?;
    tracing::info!("Exported backup for {} to {:?}", user.name, path);
    Ok(())
}

/// Merge a backup into the store
pub fn restore(store: &Store, backup: &BackupFile) -> Result<()> {
    store.merge_routines(&backup.routines)?;
    store.merge_logs(&backup.logs)?;
    store.save_user_badges(backup.user.id, &backup.badges)?;
    tracing::info!(
        "Restored backup for {}: {} routines, {} logs, {} badge records",
        backup.user.name,
        backup.routines.len(),
        backup.logs.len(),
        backup.badges.len()
    );
    Ok(())
}

/// Read and merge a backup file
pub fn restore_from_file(store: &Store, path: &Path) -> Result<BackupFile> {
    let contents = std::fs::read_to_string(path)?;
    let backup: BackupFile = serde_json::from_str(&contents)
        .map_err(|e| Error::Backup(format!("Invalid backup file {:?}: {}", path, e)))?;
    restore(store, &backup)?;
    Ok(backup)
}
