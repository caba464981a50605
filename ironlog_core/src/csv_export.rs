//! CSV export of workout history.
//!
//! Flattens workout logs into one row per set so history can be opened in a
//! spreadsheet or fed to other tooling. Format-only consumer of the domain
//! types; never read back by this crate.

use crate::types::WorkoutLog;
use crate::Result;
use std::path::Path;

/// A row in the CSV output: one set with its log and exercise context
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    log_id: String,
    routine_name: String,
    started_at: String,
    exercise_name: String,
    target_muscle: Option<String>,
    set_number: usize,
    reps: u32,
    weight_kg: f64,
    completed: bool,
    rest_seconds: u32,
}

/// Write all supplied logs to a CSV file, newest log first
///
/// Returns the number of rows written (sets, not logs).
pub fn export_logs(logs: &[WorkoutLog], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(csv_path)?;
    let mut rows = 0usize;

    for log in logs {
        for session in &log.exercises {
            for (set_number, set) in session.sets.iter().enumerate() {
                writer.serialize(CsvRow {
                    log_id: log.id.to_string(),
                    routine_name: log.routine_name.clone(),
                    started_at: log.started_at.to_rfc3339(),
                    exercise_name: session.exercise_name.clone(),
                    target_muscle: session.target_muscle.clone(),
                    set_number: set_number + 1,
                    reps: set.reps,
                    weight_kg: set.weight,
                    completed: set.completed,
                    rest_seconds: set.rest_seconds,
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    tracing::info!("Exported {} set rows to {:?}", rows, csv_path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExerciseSession, SetLog};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_log() -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            routine_id: None,
            routine_name: "Workout A".into(),
            started_at: Utc::now(),
            ended_at: None,
            exercises: vec![ExerciseSession {
                exercise_id: "e1".into(),
                exercise_name: "Bench Press".into(),
                target_muscle: Some("Chest".into()),
                sets: vec![
                    SetLog {
                        id: Uuid::new_v4(),
                        reps: 10,
                        weight: 50.0,
                        completed: true,
                        rest_seconds: 90,
                    },
                    SetLog {
                        id: Uuid::new_v4(),
                        reps: 8,
                        weight: 50.0,
                        completed: false,
                        rest_seconds: 90,
                    },
                ],
                notes: None,
            }],
            notes: None,
            total_duration_minutes: Some(45),
            total_volume_kg: Some(500.0),
        }
    }

    #[test]
    fn test_export_writes_one_row_per_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");

        let rows = export_logs(&[sample_log()], &path).unwrap();
        assert_eq!(rows, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("log_id,routine_name,started_at,exercise_name"));
        assert!(contents.contains("Bench Press"));
        // Incomplete sets are exported too; analytics filtering is not the
        // exporter's concern
        assert!(contents.contains("false"));
    }

    #[test]
    fn test_export_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");

        let rows = export_logs(&[], &path).unwrap();
        assert_eq!(rows, 0);
        assert!(path.exists());
    }
}
