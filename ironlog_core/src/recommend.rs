//! Load/rest recommendation engine.
//!
//! Turns a routine template plus workout history into per-exercise weight
//! suggestions:
//! - First-time exercises get a NEW suggestion at the template default
//! - Completed-rep performance against the rep-range upper bound decides
//!   INCREASE / MAINTAIN / DECREASE
//! - A non-increasing max weight across recent sessions raises a stagnation
//!   warning with extra suggested rest
//!
//! Pure function of its inputs: absence of data degrades to NEW or to no
//! entry, never to an error.

use crate::config::RecommendationConfig;
use crate::types::{
    Exercise, ExerciseSession, RecommendAction, Recommendation, WorkoutLog, WorkoutRoutine,
};
use std::collections::HashMap;

/// Rest suggested when an exercise template carries no default
const FALLBACK_REST_SECONDS: u32 = 60;

/// Generate per-exercise recommendations for a routine.
///
/// `history` is the user's full log collection in any order; it is sorted
/// most-recent-first internally. Exercises are matched across sessions by
/// exact name, not template id (ids change across routine edits).
pub fn recommend(
    routine: &WorkoutRoutine,
    history: &[WorkoutLog],
    config: &RecommendationConfig,
) -> HashMap<String, Recommendation> {
    let mut sorted: Vec<&WorkoutLog> = history.iter().collect();
    sorted.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    let mut recommendations = HashMap::new();

    for exercise in &routine.exercises {
        if let Some(rec) = recommend_exercise(exercise, &sorted, config) {
            recommendations.insert(exercise.id.clone(), rec);
        }
    }

    recommendations
}

fn recommend_exercise(
    exercise: &Exercise,
    sorted_history: &[&WorkoutLog],
    config: &RecommendationConfig,
) -> Option<Recommendation> {
    let last_session = last_session_for(&exercise.name, sorted_history);

    let Some(last_session) = last_session else {
        return Some(Recommendation {
            exercise_id: exercise.id.clone(),
            suggested_weight: exercise.default_weight.unwrap_or(0.0),
            action: RecommendAction::New,
            reasoning: "First time performing this exercise. Set a baseline load.".into(),
            stagnation_warning: false,
            suggested_rest_seconds: None,
        });
    };

    let completed: Vec<_> = last_session.completed_sets().collect();
    if completed.is_empty() {
        // Nothing usable to reason from; emit no entry for this exercise
        return None;
    }

    let last_weight = completed.iter().map(|s| s.weight).fold(0.0, f64::max);
    let total_reps: u32 = completed.iter().map(|s| s.reps).sum();
    let avg_reps = total_reps as f64 / completed.len() as f64;

    let (action, suggested_weight, mut reasoning) =
        match parse_target_reps(&exercise.default_reps) {
            Some(target_high) if avg_reps >= target_high => {
                let mut suggested = (last_weight * config.increase_factor).ceil();
                if suggested == last_weight {
                    // Percentage rounding must never produce a no-op increase
                    suggested += config.min_increase_kg;
                }
                (
                    RecommendAction::Increase,
                    suggested,
                    format!(
                        "All sets completed comfortably last session ({}kg). Raise the load.",
                        last_weight
                    ),
                )
            }
            Some(target_high) if avg_reps < target_high - 4.0 => (
                RecommendAction::Decrease,
                (last_weight * config.decrease_factor).floor(),
                "Too many failed reps last session. Reduce the load to recover technique."
                    .to_string(),
            ),
            // Within range, or the rep range was unparseable: hold steady
            _ => (
                RecommendAction::Maintain,
                last_weight,
                format!(
                    "Hold {}kg to consolidate execution at the target reps.",
                    last_weight
                ),
            ),
        };

    // Stagnation check runs independently of the action decision: it may
    // override the reasoning and add rest, never the numeric suggestion.
    let stagnating = detect_stagnation(&exercise.name, sorted_history, config.stagnation_window);
    let suggested_rest_seconds = if stagnating {
        reasoning =
            "Stagnation detected. Increase rest time or vary the rep scheme.".to_string();
        Some(
            exercise.default_rest_seconds.unwrap_or(FALLBACK_REST_SECONDS)
                + config.stagnation_rest_bonus_seconds,
        )
    } else {
        None
    };

    Some(Recommendation {
        exercise_id: exercise.id.clone(),
        suggested_weight,
        action,
        reasoning,
        stagnation_warning: stagnating,
        suggested_rest_seconds,
    })
}

/// Most recent session for an exercise name (exact, case-sensitive match).
///
/// The single place the name-based historical join lives; a normalized key
/// can be swapped in here without touching the callers.
fn last_session_for<'a>(
    exercise_name: &str,
    sorted_history: &[&'a WorkoutLog],
) -> Option<&'a ExerciseSession> {
    sorted_history
        .iter()
        .find_map(|log| log.exercises.iter().find(|e| e.exercise_name == exercise_name))
}

/// Upper bound of a free-form rep range.
///
/// "8-12" parses to 12; a plain "10" parses to 10. Returns None when no
/// numeric upper bound can be extracted.
fn parse_target_reps(rep_range: &str) -> Option<f64> {
    let upper = match rep_range.split_once('-') {
        Some((_, high)) => high,
        None => rep_range,
    };
    upper.trim().parse::<u32>().ok().map(f64::from)
}

/// True when the most recent qualifying max weights are non-increasing.
///
/// Scans up to `window` recent sessions of this exercise; sessions without a
/// completed weighted set contribute no data point. Requires at least three
/// points, and the three newest (read newest-to-oldest) must satisfy
/// latest <= previous <= one before that.
fn detect_stagnation(exercise_name: &str, sorted_history: &[&WorkoutLog], window: usize) -> bool {
    let mut weights = Vec::new();

    for log in sorted_history.iter().take(window) {
        if let Some(session) = log.exercises.iter().find(|e| e.exercise_name == exercise_name) {
            let max_weight = session.max_completed_weight();
            if max_weight > 0.0 {
                weights.push(max_weight);
            }
        }
    }

    weights.len() >= 3 && weights[0] <= weights[1] && weights[1] <= weights[2]
}
