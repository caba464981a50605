//! Core domain types for the Ironlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Users and their training profile
//! - Routine templates and their exercises
//! - Workout logs (sessions, sets)
//! - Badges and per-user badge progress
//! - Analytics output types (recommendations, reports, stats)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// User Types
// ============================================================================

/// Training goal the user is working toward
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
    Hypertrophy,
    Strength,
    Definition,
    Rehab,
}

/// Self-reported experience level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// A registered user (display-name capture, no credential verification)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub goal: Option<TrainingGoal>,
    pub level: Option<ExperienceLevel>,
}

/// Marker for the currently signed-in user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionMarker {
    pub user: User,
    pub saved_at: DateTime<Utc>,
}

// ============================================================================
// Routine Template Types
// ============================================================================

/// One exercise prescription inside a routine template.
///
/// Immutable once embedded in a saved routine except via routine edit
/// (edit = full-template replacement by id).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub target_muscle: String,
    pub default_sets: u32,
    /// Free-form rep range, e.g. "8-12"
    pub default_reps: String,
    pub default_weight: Option<f64>,
    pub default_rest_seconds: Option<u32>,
    pub notes: Option<String>,
}

/// A reusable workout template owned by one user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutRoutine {
    pub id: String,
    pub user_id: Uuid,
    pub name: String,
    pub target_muscles: Vec<String>,
    pub exercises: Vec<Exercise>,
}

// ============================================================================
// Workout Log Types
// ============================================================================

/// One performed set of an exercise
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetLog {
    pub id: Uuid,
    pub reps: u32,
    pub weight: f64,
    pub completed: bool,
    /// Time rested *after* this set
    pub rest_seconds: u32,
}

/// One exercise's performance within a workout log.
///
/// `exercise_name` (not `exercise_id`) is the cross-session join key used by
/// all historical lookups: template ids change across routine edits, names
/// are the stable identity for analytics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub exercise_id: String,
    pub exercise_name: String,
    pub target_muscle: Option<String>,
    pub sets: Vec<SetLog>,
    pub notes: Option<String>,
}

impl ExerciseSession {
    /// Sets that count toward volume, records and recommendation input.
    ///
    /// Incomplete sets are ignored by all aggregations, not treated as zero.
    pub fn completed_sets(&self) -> impl Iterator<Item = &SetLog> {
        self.sets.iter().filter(|s| s.completed)
    }

    /// Max weight among completed sets, or 0 if none qualify
    pub fn max_completed_weight(&self) -> f64 {
        self.completed_sets()
            .map(|s| s.weight)
            .fold(0.0, f64::max)
    }
}

/// One completed (or in-progress) workout session.
///
/// Created in memory at workout start, mutated per set completion, persisted
/// exactly once at finish. Stored most-recent-first in the log collection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub routine_id: Option<String>,
    /// Snapshotted at start; survives routine deletion/rename
    pub routine_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub exercises: Vec<ExerciseSession>,
    pub notes: Option<String>,
    /// Minutes, computed once at finish time
    pub total_duration_minutes: Option<i64>,
    /// Kilograms, computed once at finish time
    pub total_volume_kg: Option<f64>,
}

impl WorkoutLog {
    /// Persisted total volume, or 0 if the log was never finished
    pub fn volume(&self) -> f64 {
        self.total_volume_kg.unwrap_or(0.0)
    }

    /// Sum of weight x reps over completed sets
    pub fn computed_volume(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|ex| ex.completed_sets())
            .map(|s| s.weight * s.reps as f64)
            .sum()
    }

    /// Stamp the end time and the persisted totals
    pub fn finish(&mut self, now: DateTime<Utc>) {
        self.ended_at = Some(now);
        self.total_duration_minutes = Some(((now - self.started_at).num_seconds() as f64 / 60.0).round() as i64);
        self.total_volume_kg = Some(self.computed_volume());
    }
}

// ============================================================================
// Badge Types
// ============================================================================

/// Badge tier, lowest to highest
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

/// What kind of behavior the badge rewards
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Consistency,
    Strength,
    Volume,
    Dedication,
}

/// A static badge definition from the fixed catalog. Never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: BadgeCategory,
    pub tier: BadgeTier,
    /// Numeric threshold (kg, workouts, ...) that unlocks the badge
    pub requirement: f64,
}

/// Per-user badge progress record.
///
/// Created lazily the first time progress is evaluated; once `is_unlocked`
/// is true the record is frozen and never re-evaluated or regressed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserBadge {
    pub user_id: Uuid,
    pub badge_id: String,
    pub earned_at: Option<DateTime<Utc>>,
    pub current_progress: f64,
    pub is_unlocked: bool,
}

// ============================================================================
// Recommendation Types
// ============================================================================

/// Suggested adjustment for an exercise's working weight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendAction {
    Increase,
    Maintain,
    Decrease,
    New,
}

/// Per-exercise load/rest suggestion produced by the recommendation engine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recommendation {
    pub exercise_id: String,
    pub suggested_weight: f64,
    pub action: RecommendAction,
    pub reasoning: String,
    pub stagnation_warning: bool,
    /// Set only when stagnation is detected (default rest + 30s)
    pub suggested_rest_seconds: Option<u32>,
}

// ============================================================================
// Report and Stats Types
// ============================================================================

/// Tone of a performance report message
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Positive,
    Neutral,
    Negative,
}

/// Single-workout vs. historical-baseline delta report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Percentage change of total volume vs. baseline
    pub volume_delta_percent: i64,
    /// Percentage change of mean completed-set weight vs. baseline
    pub load_delta_percent: i64,
    pub duration_delta_percent: i64,
    /// Absolute kg difference (current - baseline)
    pub volume_diff_kg: f64,
    pub message: String,
    pub highlight: Highlight,
}

/// Bucketing period for volume history
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
}

/// One volume-history bucket, in rounded tonnes for chart scaling
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VolumePoint {
    pub label: String,
    pub tonnes: i64,
}

/// Completed-set count for one target-muscle label
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MuscleBalanceEntry {
    pub muscle: String,
    pub sets: u32,
}

/// Heaviest completed set ever recorded for one exercise name
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise_name: String,
    pub weight: f64,
    pub achieved_at: DateTime<Utc>,
}

/// Aggregate stats for one calendar month
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub month_name: String,
    pub total_volume_kg: f64,
    pub total_workouts: u32,
    pub avg_volume_per_workout: f64,
}

/// Heaviest lift of the current month for one exercise
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BestExercise {
    pub name: String,
    pub weight: f64,
    pub muscle: String,
}

/// Current vs. previous calendar month comparison
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonthlyComparison {
    pub current: MonthlyStats,
    pub previous: MonthlyStats,
    pub volume_delta_percent: i64,
    pub frequency_delta_percent: i64,
    pub best_exercises: Vec<BestExercise>,
}

/// Quick dashboard summary over a set of logs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub total_volume_kg: f64,
    pub workouts: usize,
    pub distinct_muscles: usize,
}
