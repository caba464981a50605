//! Coaching-text boundary.
//!
//! The text-generation service is an external collaborator: this module
//! owns the trait seam, the prompt builders and the static fallback. A
//! generation attempt is made exactly once, with no retry; any failure
//! collapses to the fallback string at the call site.

use crate::types::{ExperienceLevel, MonthlyComparison, TrainingGoal, WorkoutLog};
use crate::Result;

/// Shown when generation fails or no generator is connected
pub const FALLBACK_ANALYSIS: &str =
    "Coaching analysis is unavailable right now. Keep logging your workouts and try again later.";

/// Pluggable text-generation backend
pub trait TextGenerator {
    /// Turn a prompt into coaching text. Treated as potentially failing;
    /// callers must not assume success.
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Offline generator: deterministic canned coaching text.
///
/// Stands in wherever no real generation backend is wired up, so the
/// coaching surface keeps working without a network.
pub struct StaticCoach;

impl TextGenerator for StaticCoach {
    fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(concat!(
            "1. Strength: you are showing up and logging consistently - that is the ",
            "foundation everything else builds on.\n",
            "2. Opportunity: watch for lifts whose working weight has not moved in ",
            "three sessions; add rest or vary the rep scheme.\n",
            "3. No pain, no gain: the next session starts the moment you decide it does."
        )
        .to_string())
    }
}

/// Build the progress-analysis prompt from recent history.
///
/// Only the last 5 logs are summarized to keep the prompt compact.
pub fn progress_prompt(logs: &[WorkoutLog]) -> String {
    let recent: Vec<String> = logs
        .iter()
        .take(5)
        .map(|log| {
            let exercises: Vec<String> = log
                .exercises
                .iter()
                .map(|ex| {
                    let weights: Vec<String> =
                        ex.sets.iter().map(|s| format!("{}kg", s.weight)).collect();
                    format!(
                        "- {}: {} completed sets (loads: {})",
                        ex.exercise_name,
                        ex.completed_sets().count(),
                        weights.join(", ")
                    )
                })
                .collect();
            format!(
                "Date: {}\nWorkout: {}\n{}",
                log.started_at.format("%Y-%m-%d"),
                log.routine_name,
                exercises.join("\n")
            )
        })
        .collect();

    format!(
        "You are an elite strength coach focused on hypertrophy and high intensity.\n\
         Analyze the following recent training logs:\n\n{}\n\n\
         Provide a short, direct analysis (max 300 words) as bullet points:\n\
         1. Identify one strength or consistency.\n\
         2. Identify one improvement opportunity (e.g. stalled load progression, low volume).\n\
         3. Give an aggressive motivational tip in \"No Pain No Gain\" style.\n\n\
         Use Markdown formatting.",
        recent.join("\n---\n")
    )
}

/// Build the monthly-report prompt from a computed comparison
pub fn monthly_report_prompt(stats: &MonthlyComparison) -> String {
    let bests: Vec<String> = stats
        .best_exercises
        .iter()
        .map(|e| format!("{}: {}kg", e.name, e.weight))
        .collect();

    format!(
        "Act as a demanding strength coach. Write a monthly report comparing {} with {}.\n\n\
         DATA:\n\
         - Total volume: {}kg ({:+}%)\n\
         - Frequency: {} workouts ({:+}%)\n\
         - Best lifts of the month: {}\n\n\
         INSTRUCTIONS:\n\
         1. Be brief (max 150 words).\n\
         2. Say whether the athlete progressed or regressed.\n\
         3. If volume or frequency dropped, push back hard.\n\
         4. If they rose, congratulate but demand more.\n\
         5. Call out the best lifts as highlights.",
        stats.current.month_name,
        stats.previous.month_name,
        stats.current.total_volume_kg,
        stats.volume_delta_percent,
        stats.current.total_workouts,
        stats.frequency_delta_percent,
        bests.join(", ")
    )
}

/// Build the weekly-routine-plan prompt from the user's training profile.
///
/// The last 10 logs calibrate the load suggestions; goal and level steer
/// the split and rep schemes.
pub fn weekly_plan_prompt(
    goal: TrainingGoal,
    level: ExperienceLevel,
    days_per_week: u32,
    logs: &[WorkoutLog],
) -> String {
    let recent_loads: Vec<String> = logs
        .iter()
        .take(10)
        .map(|log| {
            log.exercises
                .iter()
                .map(|ex| {
                    let max = ex.sets.iter().map(|s| s.weight).fold(0.0, f64::max);
                    format!("{} (max: {}kg)", ex.exercise_name, max)
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect();

    format!(
        "Act as an elite strength coach. Build a complete weekly training routine.\n\n\
         ATHLETE PROFILE:\n\
         - Goal: {}\n\
         - Level: {}\n\
         - Frequency: {} days per week\n\
         - Recent loads: {}\n\n\
         REQUIREMENTS:\n\
         1. Create {} routines with a logical split (ABC, ABCD, full body).\n\
         2. Suggest 5 to 8 exercises per routine.\n\
         3. Set series, reps (e.g. \"8-12\", \"6-8\", \"15+\") and rest seconds \
         appropriate to the goal.\n\
         4. Respond with pure JSON only: an array of routine objects with name, \
         target_muscles and exercises. No Markdown, no prose.",
        goal_label(goal),
        level_label(level),
        days_per_week,
        recent_loads.join("; "),
        days_per_week
    )
}

fn goal_label(goal: TrainingGoal) -> &'static str {
    match goal {
        TrainingGoal::Hypertrophy => "hypertrophy",
        TrainingGoal::Strength => "strength",
        TrainingGoal::Definition => "definition (cutting)",
        TrainingGoal::Rehab => "rehabilitation",
    }
}

fn level_label(level: ExperienceLevel) -> &'static str {
    match level {
        ExperienceLevel::Beginner => "beginner",
        ExperienceLevel::Intermediate => "intermediate",
        ExperienceLevel::Advanced => "advanced",
    }
}

/// Run one plan-generation attempt, collapsing failure to the fallback
pub fn suggest_weekly_plan<G: TextGenerator>(
    generator: &G,
    goal: TrainingGoal,
    level: ExperienceLevel,
    days_per_week: u32,
    logs: &[WorkoutLog],
) -> String {
    let prompt = weekly_plan_prompt(goal, level, days_per_week, logs);
    match generator.generate(&prompt) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Plan generation failed: {}. Using fallback.", e);
            FALLBACK_ANALYSIS.to_string()
        }
    }
}

/// Run one generation attempt, collapsing failure to the static fallback
pub fn analyze_progress<G: TextGenerator>(generator: &G, logs: &[WorkoutLog]) -> String {
    let prompt = progress_prompt(logs);
    match generator.generate(&prompt) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Text generation failed: {}. Using fallback.", e);
            FALLBACK_ANALYSIS.to_string()
        }
    }
}
