//! Local JSON store for users, routines, logs and badge progress.
//!
//! A single data file holds four independent collections plus the current
//! session marker, each filterable by user. Reads take a shared file lock;
//! writes go through a locked temp file and an atomic rename. A corrupt
//! file degrades to empty collections with a warning rather than failing.

use crate::types::{SessionMarker, User, UserBadge, WorkoutLog, WorkoutRoutine};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// On-disk layout of the store file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    routines: Vec<WorkoutRoutine>,
    /// Most-recent-first; new logs are inserted at the head
    #[serde(default)]
    logs: Vec<WorkoutLog>,
    #[serde(default)]
    user_badges: Vec<UserBadge>,
    #[serde(default)]
    session: Option<SessionMarker>,
}

/// File-backed repository owning the store file's lifecycle
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Create a store handle for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional store file inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("ironlog.json"))
    }

    // ------------------------------------------------------------------
    // Users and session
    // ------------------------------------------------------------------

    pub fn users(&self) -> Result<Vec<User>> {
        Ok(self.load()?.users)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.update(|data| {
            data.users.push(user.clone());
            Ok(())
        })
    }

    pub fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(self.load()?.users.into_iter().find(|u| u.name == name))
    }

    /// Mark a user as the current session
    pub fn save_session(&self, user: &User, now: DateTime<Utc>) -> Result<()> {
        self.update(|data| {
            data.session = Some(SessionMarker {
                user: user.clone(),
                saved_at: now,
            });
            Ok(())
        })
    }

    pub fn session(&self) -> Result<Option<User>> {
        Ok(self.load()?.session.map(|s| s.user))
    }

    pub fn clear_session(&self) -> Result<()> {
        self.update(|data| {
            data.session = None;
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Routines
    // ------------------------------------------------------------------

    pub fn routines_for(&self, user_id: Uuid) -> Result<Vec<WorkoutRoutine>> {
        Ok(self
            .load()?
            .routines
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect())
    }

    pub fn routine_by_name(&self, user_id: Uuid, name: &str) -> Result<Option<WorkoutRoutine>> {
        Ok(self
            .load()?
            .routines
            .into_iter()
            .find(|r| r.user_id == user_id && r.name == name))
    }

    /// Insert or replace a routine template (edit = replace-by-id)
    pub fn save_routine(&self, routine: &WorkoutRoutine) -> Result<()> {
        self.update(|data| {
            match data.routines.iter_mut().find(|r| r.id == routine.id) {
                Some(existing) => *existing = routine.clone(),
                None => data.routines.push(routine.clone()),
            }
            Ok(())
        })
    }

    pub fn remove_routine(&self, routine_id: &str) -> Result<()> {
        self.update(|data| {
            data.routines.retain(|r| r.id != routine_id);
            Ok(())
        })
    }

    /// Merge restored routines: incoming wins on id collision,
    /// non-conflicting existing records are retained
    pub fn merge_routines(&self, incoming: &[WorkoutRoutine]) -> Result<()> {
        self.update(|data| {
            data.routines
                .retain(|r| !incoming.iter().any(|i| i.id == r.id));
            data.routines.extend(incoming.iter().cloned());
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Workout logs
    // ------------------------------------------------------------------

    /// A user's logs, most-recent-first (insertion order of the collection)
    pub fn workout_logs_for(&self, user_id: Uuid) -> Result<Vec<WorkoutLog>> {
        Ok(self
            .load()?
            .logs
            .into_iter()
            .filter(|l| l.user_id == user_id)
            .collect())
    }

    /// Persist a finished log at the head of the collection
    pub fn save_workout_log(&self, log: &WorkoutLog) -> Result<()> {
        self.update(|data| {
            data.logs.insert(0, log.clone());
            Ok(())
        })
    }

    pub fn update_workout_log(&self, log: &WorkoutLog) -> Result<()> {
        self.update(|data| {
            match data.logs.iter_mut().find(|l| l.id == log.id) {
                Some(existing) => {
                    *existing = log.clone();
                    Ok(())
                }
                None => Err(Error::Store(format!("No workout log with id {}", log.id))),
            }
        })
    }

    pub fn delete_workout_log(&self, log_id: Uuid) -> Result<()> {
        self.update(|data| {
            data.logs.retain(|l| l.id != log_id);
            Ok(())
        })
    }

    /// Merge restored logs: incoming wins on id collision and lands ahead
    /// of the retained records
    pub fn merge_logs(&self, incoming: &[WorkoutLog]) -> Result<()> {
        self.update(|data| {
            let mut merged: Vec<WorkoutLog> = incoming.to_vec();
            merged.extend(
                data.logs
                    .iter()
                    .filter(|l| !incoming.iter().any(|i| i.id == l.id))
                    .cloned(),
            );
            data.logs = merged;
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Badge progress
    // ------------------------------------------------------------------

    pub fn user_badges(&self, user_id: Uuid) -> Result<Vec<UserBadge>> {
        Ok(self
            .load()?
            .user_badges
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .collect())
    }

    /// Replace all of one user's badge records; other users' records are
    /// untouched
    pub fn save_user_badges(&self, user_id: Uuid, badges: &[UserBadge]) -> Result<()> {
        self.update(|data| {
            data.user_badges.retain(|b| b.user_id != user_id);
            data.user_badges.extend(badges.iter().cloned());
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    /// Create starter routines for a fresh user. No-op if the user already
    /// owns any routine.
    pub fn seed_initial_routines(&self, user_id: Uuid) -> Result<bool> {
        self.update(|data| {
            if data.routines.iter().any(|r| r.user_id == user_id) {
                return Ok(false);
            }
            data.routines.extend(starter_routines(user_id));
            tracing::info!("Seeded starter routines for user {}", user_id);
            Ok(true)
        })
    }

    // ------------------------------------------------------------------
    // File handling
    // ------------------------------------------------------------------

    fn load(&self) -> Result<StoreData> {
        if !self.path.exists() {
            tracing::debug!("No store file at {:?}, starting empty", self.path);
            return Ok(StoreData::default());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        match serde_json::from_str::<StoreData>(&contents) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse store file {:?}: {}. Starting empty.",
                    self.path,
                    e
                );
                Ok(StoreData::default())
            }
        }
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(data)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        tracing::debug!("Saved store to {:?}", self.path);
        Ok(())
    }

    fn update<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut StoreData) -> Result<R>,
    {
        let mut data = self.load()?;
        let result = f(&mut data)?;
        self.save(&data)?;
        Ok(result)
    }
}

fn starter_exercise(
    id: &str,
    name: &str,
    muscle: &str,
    sets: u32,
    reps: &str,
    rest: u32,
) -> crate::types::Exercise {
    crate::types::Exercise {
        id: id.into(),
        name: name.into(),
        target_muscle: muscle.into(),
        default_sets: sets,
        default_reps: reps.into(),
        default_weight: None,
        default_rest_seconds: Some(rest),
        notes: None,
    }
}

fn starter_routines(user_id: Uuid) -> Vec<WorkoutRoutine> {
    vec![
        WorkoutRoutine {
            id: format!("seed_{}_a", user_id),
            user_id,
            name: "Workout A - Chest & Triceps".into(),
            target_muscles: vec!["Chest".into(), "Triceps".into()],
            exercises: vec![
                starter_exercise("e1", "Incline Dumbbell Press", "Chest", 4, "8-10", 90),
                starter_exercise("e2", "Machine Fly", "Chest", 3, "12-15", 60),
                starter_exercise("e3", "Rope Pushdown", "Triceps", 4, "10-12", 60),
            ],
        },
        WorkoutRoutine {
            id: format!("seed_{}_b", user_id),
            user_id,
            name: "Workout B - Back & Biceps".into(),
            target_muscles: vec!["Back".into(), "Biceps".into()],
            exercises: vec![
                starter_exercise("e4", "Lat Pulldown", "Back", 4, "8-10", 90),
                starter_exercise("e5", "Bent-Over Row", "Back", 4, "8-10", 90),
                starter_exercise("e6", "Barbell Curl", "Biceps", 3, "10-12", 60),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::in_dir(dir.path());
        (dir, store)
    }

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: None,
            goal: None,
            level: None,
        }
    }

    fn log_for(user_id: Uuid, routine_name: &str) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            user_id,
            routine_id: None,
            routine_name: routine_name.into(),
            started_at: Utc::now(),
            ended_at: None,
            exercises: vec![],
            notes: None,
            total_duration_minutes: Some(45),
            total_volume_kg: Some(1000.0),
        }
    }

    #[test]
    fn test_user_roundtrip_and_session() {
        let (_dir, store) = test_store();
        let u = user("ana");

        store.save_user(&u).unwrap();
        store.save_session(&u, Utc::now()).unwrap();

        assert_eq!(store.users().unwrap().len(), 1);
        assert_eq!(store.session().unwrap().unwrap().id, u.id);

        store.clear_session().unwrap();
        assert!(store.session().unwrap().is_none());
    }

    #[test]
    fn test_logs_inserted_at_head() {
        let (_dir, store) = test_store();
        let u = user("ana");

        store.save_workout_log(&log_for(u.id, "first")).unwrap();
        store.save_workout_log(&log_for(u.id, "second")).unwrap();

        let logs = store.workout_logs_for(u.id).unwrap();
        assert_eq!(logs[0].routine_name, "second");
        assert_eq!(logs[1].routine_name, "first");
    }

    #[test]
    fn test_logs_filtered_by_user() {
        let (_dir, store) = test_store();
        let ana = user("ana");
        let bob = user("bob");

        store.save_workout_log(&log_for(ana.id, "a")).unwrap();
        store.save_workout_log(&log_for(bob.id, "b")).unwrap();

        assert_eq!(store.workout_logs_for(ana.id).unwrap().len(), 1);
        assert_eq!(store.workout_logs_for(bob.id).unwrap().len(), 1);
    }

    #[test]
    fn test_routine_edit_is_replace_by_id() {
        let (_dir, store) = test_store();
        let u = user("ana");
        store.seed_initial_routines(u.id).unwrap();

        let mut routine = store.routines_for(u.id).unwrap().remove(0);
        routine.name = "Renamed".into();
        store.save_routine(&routine).unwrap();

        let routines = store.routines_for(u.id).unwrap();
        assert_eq!(routines.len(), 2);
        assert!(routines.iter().any(|r| r.name == "Renamed"));
    }

    #[test]
    fn test_seed_is_idempotent() {
        let (_dir, store) = test_store();
        let u = user("ana");

        assert!(store.seed_initial_routines(u.id).unwrap());
        assert!(!store.seed_initial_routines(u.id).unwrap());
        assert_eq!(store.routines_for(u.id).unwrap().len(), 2);
    }

    #[test]
    fn test_badge_overwrite_keeps_other_users() {
        let (_dir, store) = test_store();
        let ana = user("ana");
        let bob = user("bob");

        let badge = |user_id, progress| UserBadge {
            user_id,
            badge_id: "v_million".into(),
            earned_at: None,
            current_progress: progress,
            is_unlocked: false,
        };

        store.save_user_badges(ana.id, &[badge(ana.id, 100.0)]).unwrap();
        store.save_user_badges(bob.id, &[badge(bob.id, 200.0)]).unwrap();
        store.save_user_badges(ana.id, &[badge(ana.id, 500.0)]).unwrap();

        assert_eq!(store.user_badges(ana.id).unwrap()[0].current_progress, 500.0);
        assert_eq!(store.user_badges(bob.id).unwrap()[0].current_progress, 200.0);
    }

    #[test]
    fn test_update_log_replaces_in_place() {
        let (_dir, store) = test_store();
        let u = user("ana");

        let mut log = log_for(u.id, "before");
        store.save_workout_log(&log).unwrap();

        log.routine_name = "after".into();
        log.total_volume_kg = Some(1500.0);
        store.update_workout_log(&log).unwrap();

        let logs = store.workout_logs_for(u.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].routine_name, "after");
        assert_eq!(logs[0].total_volume_kg, Some(1500.0));
    }

    #[test]
    fn test_update_unknown_log_is_an_error() {
        let (_dir, store) = test_store();
        let u = user("ana");

        assert!(store.update_workout_log(&log_for(u.id, "ghost")).is_err());
    }

    #[test]
    fn test_delete_log_removes_only_that_log() {
        let (_dir, store) = test_store();
        let u = user("ana");

        let doomed = log_for(u.id, "doomed");
        store.save_workout_log(&doomed).unwrap();
        store.save_workout_log(&log_for(u.id, "keeper")).unwrap();

        store.delete_workout_log(doomed.id).unwrap();

        let logs = store.workout_logs_for(u.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].routine_name, "keeper");
    }

    #[test]
    fn test_remove_routine() {
        let (_dir, store) = test_store();
        let u = user("ana");
        store.seed_initial_routines(u.id).unwrap();

        let doomed = store.routines_for(u.id).unwrap().remove(0);
        store.remove_routine(&doomed.id).unwrap();

        let routines = store.routines_for(u.id).unwrap();
        assert_eq!(routines.len(), 1);
        assert!(routines.iter().all(|r| r.id != doomed.id));
    }

    #[test]
    fn test_merge_logs_incoming_wins_on_collision() {
        let (_dir, store) = test_store();
        let u = user("ana");

        let mut existing = log_for(u.id, "old name");
        store.save_workout_log(&existing).unwrap();
        let keeper = log_for(u.id, "keeper");
        store.save_workout_log(&keeper).unwrap();

        existing.routine_name = "restored name".into();
        store.merge_logs(&[existing.clone()]).unwrap();

        let logs = store.workout_logs_for(u.id).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].routine_name, "restored name");
        assert!(logs.iter().any(|l| l.routine_name == "keeper"));
    }

    #[test]
    fn test_corrupt_store_degrades_to_empty() {
        let (_dir, store) = test_store();
        std::fs::create_dir_all(store.path.parent().unwrap()).unwrap();
        std::fs::write(&store.path, "{ not json }").unwrap();

        assert!(store.users().unwrap().is_empty());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let (dir, store) = test_store();
        store.save_user(&user("ana")).unwrap();

        let extras: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "ironlog.json")
            .collect();
        assert!(extras.is_empty(), "stray files: {:?}", extras);
    }
}
