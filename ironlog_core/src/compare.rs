//! Post-workout performance comparison.
//!
//! Compares a just-finished workout log against a historical baseline: the
//! most recent log of the same routine, or failing that the most recent log
//! touching at least one of the same muscles. Produces the volume/load/
//! duration deltas and the summary message shown after a workout.

use crate::types::{Highlight, PerformanceReport, WorkoutLog};
use std::collections::HashSet;

/// Compare a finished log against history and build the summary report.
///
/// `history` may still contain `current` itself; it is excluded by id.
/// Pure function, no failure modes: a missing baseline yields the
/// first-time report.
pub fn compare(current: &WorkoutLog, history: &[WorkoutLog]) -> PerformanceReport {
    let mut past: Vec<&WorkoutLog> = history.iter().filter(|l| l.id != current.id).collect();
    past.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    let Some(baseline) = find_baseline(current, &past) else {
        return PerformanceReport {
            volume_delta_percent: 100,
            load_delta_percent: 0,
            duration_delta_percent: 0,
            volume_diff_kg: current.volume(),
            message: "First time doing this workout! You set the baseline for the future."
                .into(),
            highlight: Highlight::Positive,
        };
    };

    let curr_vol = current.volume();
    let prev_vol = baseline.volume();
    let volume_delta = percent_delta(curr_vol, prev_vol);
    let volume_diff = curr_vol - prev_vol;

    let curr_load = avg_completed_weight(current);
    let prev_load = avg_completed_weight(baseline);
    let load_delta = if prev_load == 0.0 {
        0
    } else {
        round_half_up(((curr_load - prev_load) / prev_load) * 100.0)
    };

    // Duration 1 as a divisor floor avoids division by zero on unfinished
    // or sub-minute logs
    let curr_dur = duration_or_one(current);
    let prev_dur = duration_or_one(baseline);
    let duration_delta = round_half_up((curr_dur - prev_dur) as f64 / prev_dur as f64 * 100.0);

    let (message, highlight) = if volume_delta > 5 {
        (
            format!(
                "You performed {}% better than your last similar workout! You lifted {}kg more.",
                volume_delta, volume_diff
            ),
            Highlight::Positive,
        )
    } else if volume_delta < -10 {
        (
            format!(
                "Your total volume dropped {}% compared to last time. Focus on recovery for the next one.",
                volume_delta.abs()
            ),
            Highlight::Negative,
        )
    } else if load_delta > 2 {
        (
            format!(
                "Your average intensity rose {}%. You are getting stronger!",
                load_delta
            ),
            Highlight::Positive,
        )
    } else {
        (
            "Consistent performance. Volume and intensity held steady.".to_string(),
            Highlight::Neutral,
        )
    };

    PerformanceReport {
        volume_delta_percent: volume_delta,
        load_delta_percent: load_delta,
        duration_delta_percent: duration_delta,
        volume_diff_kg: volume_diff,
        message,
        highlight,
    }
}

/// Baseline selection: identical routine name first, muscle overlap second
fn find_baseline<'a>(current: &WorkoutLog, past: &[&'a WorkoutLog]) -> Option<&'a WorkoutLog> {
    if let Some(log) = past.iter().find(|l| l.routine_name == current.routine_name) {
        return Some(log);
    }

    if current.exercises.is_empty() {
        return None;
    }

    let target_muscles: HashSet<&str> = current
        .exercises
        .iter()
        .filter_map(|e| e.target_muscle.as_deref())
        .collect();

    past.iter()
        .find(|l| {
            l.exercises
                .iter()
                .filter_map(|e| e.target_muscle.as_deref())
                .any(|m| target_muscles.contains(m))
        })
        .copied()
}

fn percent_delta(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        if current > 0.0 {
            100
        } else {
            0
        }
    } else {
        round_half_up(((current - previous) / previous) * 100.0)
    }
}

/// Round half up: -0.5 rounds to 0, not -1
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Mean weight across all completed sets with weight > 0, or 0 if none
fn avg_completed_weight(log: &WorkoutLog) -> f64 {
    let mut total = 0.0;
    let mut count = 0u32;
    for session in &log.exercises {
        for set in session.completed_sets() {
            if set.weight > 0.0 {
                total += set.weight;
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn duration_or_one(log: &WorkoutLog) -> i64 {
    match log.total_duration_minutes {
        Some(d) if d > 0 => d,
        _ => 1,
    }
}
