//! Rule-based achievement tracking.
//!
//! Evaluates a user's workout history against the static badge catalog and
//! updates their per-badge progress records. The evaluator is pure: it takes
//! the current records and a clock value and returns the new record set plus
//! the badges that crossed their threshold this run. Persisting the result
//! (overwrite semantics, per user) is the caller's job via the store.

use crate::badges::badge_catalog;
use crate::types::{Badge, UserBadge, WorkoutLog};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use uuid::Uuid;

/// Result of one achievement evaluation pass
#[derive(Clone, Debug, Default)]
pub struct AchievementUpdate {
    /// Badges that unlocked during this run, for one-time celebratory
    /// display. A badge appears here only on the run it crosses the
    /// threshold.
    pub unlocked: Vec<Badge>,
    /// The full refreshed record set for this user (replaces prior records)
    pub user_badges: Vec<UserBadge>,
}

/// Evaluate all tracked metrics for a user.
///
/// `existing` holds the user's current progress records (possibly empty);
/// records missing for a catalog badge are created lazily at progress 0.
/// Unlocked records are frozen: their progress is never updated or
/// regressed. A user with no logs yields an empty update.
pub fn evaluate(
    user_id: Uuid,
    logs: &[WorkoutLog],
    existing: &[UserBadge],
    now: DateTime<Utc>,
) -> AchievementUpdate {
    if logs.is_empty() {
        return AchievementUpdate::default();
    }

    let mut records: Vec<UserBadge> = existing.to_vec();
    for badge in badge_catalog() {
        if !records.iter().any(|r| r.badge_id == badge.id) {
            records.push(UserBadge {
                user_id,
                badge_id: badge.id.clone(),
                earned_at: None,
                current_progress: 0.0,
                is_unlocked: false,
            });
        }
    }

    let mut unlocked = Vec::new();

    // Consistency: workouts since the start of this week (Sunday)
    let start_of_week = now - Duration::days(now.weekday().num_days_from_sunday() as i64);
    let workouts_this_week = logs.iter().filter(|l| l.started_at >= start_of_week).count();
    update_badge(&mut records, "c_rocket", workouts_this_week as f64, now, &mut unlocked);

    // Consistency: workouts since the 1st of this month
    let start_of_month = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .expect("first of month is always a valid date");
    let workouts_this_month = logs
        .iter()
        .filter(|l| l.started_at >= start_of_month)
        .count();
    update_badge(&mut records, "c_monster", workouts_this_month as f64, now, &mut unlocked);

    // Volume: heaviest single session ever
    let max_session_volume = logs.iter().map(|l| l.volume()).fold(0.0, f64::max);
    update_badge(&mut records, "v_million", max_session_volume, now, &mut unlocked);

    // Volume: lifetime total
    let lifetime_volume: f64 = logs.iter().map(|l| l.volume()).sum();
    update_badge(&mut records, "v_giant", lifetime_volume, now, &mut unlocked);

    // Volume: this calendar month
    let month_volume: f64 = logs
        .iter()
        .filter(|l| l.started_at >= start_of_month)
        .map(|l| l.volume())
        .sum();
    update_badge(&mut records, "v_sacred", month_volume, now, &mut unlocked);

    if !unlocked.is_empty() {
        tracing::info!(
            "User {} unlocked {} badge(s): {:?}",
            user_id,
            unlocked.len(),
            unlocked.iter().map(|b| b.id.as_str()).collect::<Vec<_>>()
        );
    }

    AchievementUpdate {
        unlocked,
        user_badges: records,
    }
}

/// Refresh one badge's progress and unlock it when the threshold is met.
///
/// Frozen post-unlock: already-unlocked records are left untouched, so a
/// badge can appear in the unlocked list at most once across runs.
fn update_badge(
    records: &mut [UserBadge],
    badge_id: &str,
    value: f64,
    now: DateTime<Utc>,
    unlocked: &mut Vec<Badge>,
) {
    let Some(record) = records.iter_mut().find(|r| r.badge_id == badge_id) else {
        return;
    };
    let Some(definition) = crate::badges::badge_by_id(badge_id) else {
        return;
    };

    if record.is_unlocked {
        return;
    }

    record.current_progress = value;
    if value >= definition.requirement {
        record.is_unlocked = true;
        record.earned_at = Some(now);
        unlocked.push(definition.clone());
    }
}
