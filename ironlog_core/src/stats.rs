//! Aggregated statistics over workout history.
//!
//! Four independent pure functions feed the analytics views: volume history
//! (week/month buckets), muscle balance (completed sets per muscle),
//! personal records (heaviest completed lift per exercise) and the
//! current-vs-previous calendar month comparison. Results are recomputed on
//! demand, never cached.

use crate::types::{
    BestExercise, MonthlyComparison, MonthlyStats, MuscleBalanceEntry, Period, PersonalRecord,
    VolumePoint, WeeklyReport, WorkoutLog,
};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Label used when an exercise session carries no target-muscle tag
const UNTAGGED_MUSCLE: &str = "Other";

/// Group log volumes into week or month buckets, chronologically.
///
/// Values are expressed in rounded tonnes for chart scaling. Buckets appear
/// in first-encounter order after sorting logs oldest-first, so the series
/// reads left-to-right in time.
pub fn volume_history(logs: &[WorkoutLog], period: Period) -> Vec<VolumePoint> {
    let mut sorted: Vec<&WorkoutLog> = logs.iter().collect();
    sorted.sort_by(|a, b| a.started_at.cmp(&b.started_at));

    let mut buckets: Vec<(String, f64)> = Vec::new();

    for log in sorted {
        let label = match period {
            Period::Week => format!("W{}", week_number(log.started_at)),
            Period::Month => log.started_at.format("%b %y").to_string(),
        };

        match buckets.iter_mut().find(|(l, _)| *l == label) {
            Some((_, total)) => *total += log.volume(),
            None => buckets.push((label, log.volume())),
        }
    }

    buckets
        .into_iter()
        .map(|(label, kg)| VolumePoint {
            label,
            tonnes: (kg / 1000.0).round() as i64,
        })
        .collect()
}

/// Week-of-year: days elapsed since Jan 1, shifted by Jan 1's weekday
/// (Sunday-based), divided by 7, ceiling
fn week_number(date: DateTime<Utc>) -> u32 {
    let jan_first = Utc
        .with_ymd_and_hms(date.year(), 1, 1, 0, 0, 0)
        .single()
        .expect("Jan 1 is always a valid date");
    let past_days = (date - jan_first).num_seconds() as f64 / 86_400.0;
    let offset = jan_first.weekday().num_days_from_sunday() as f64;
    ((past_days + offset + 1.0) / 7.0).ceil() as u32
}

/// Completed-set counts per target-muscle label, top 6 by count.
///
/// Ties keep first-encounter order (stable sort); untagged sessions fall
/// into a shared "Other" bucket.
pub fn muscle_balance(logs: &[WorkoutLog]) -> Vec<MuscleBalanceEntry> {
    let mut counts: Vec<(String, u32)> = Vec::new();

    for log in logs {
        for session in &log.exercises {
            let muscle = session
                .target_muscle
                .as_deref()
                .unwrap_or(UNTAGGED_MUSCLE);
            let sets = session.completed_sets().count() as u32;

            match counts.iter_mut().find(|(m, _)| m == muscle) {
                Some((_, total)) => *total += sets,
                None => counts.push((muscle.to_string(), sets)),
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(6);

    counts
        .into_iter()
        .map(|(muscle, sets)| MuscleBalanceEntry { muscle, sets })
        .collect()
}

/// Per exercise name, the heaviest completed set ever and when it happened.
///
/// Top 4 by weight descending. Replacement is strictly-greater, so on equal
/// weights the first-seen log (newest, given store ordering) keeps the
/// record.
pub fn personal_records(logs: &[WorkoutLog]) -> Vec<PersonalRecord> {
    let mut records: Vec<PersonalRecord> = Vec::new();

    for log in logs {
        for session in &log.exercises {
            let max_weight = session.max_completed_weight();
            if max_weight <= 0.0 {
                continue;
            }

            match records
                .iter_mut()
                .find(|r| r.exercise_name == session.exercise_name)
            {
                Some(record) if max_weight > record.weight => {
                    record.weight = max_weight;
                    record.achieved_at = log.started_at;
                }
                Some(_) => {}
                None => records.push(PersonalRecord {
                    exercise_name: session.exercise_name.clone(),
                    weight: max_weight,
                    achieved_at: log.started_at,
                }),
            }
        }
    }

    records.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    records.truncate(4);
    records
}

/// Current calendar month vs. previous calendar month.
///
/// Calendar partitions, not rolling 30-day windows. Delta guard: a zero
/// previous value yields 100 when the current value is positive, else 0.
pub fn monthly_comparison(logs: &[WorkoutLog], now: DateTime<Utc>) -> MonthlyComparison {
    let (curr_month, curr_year) = (now.month(), now.year());
    let (prev_month, prev_year) = if curr_month == 1 {
        (12, curr_year - 1)
    } else {
        (curr_month - 1, curr_year)
    };

    let in_month = |log: &&WorkoutLog, month: u32, year: i32| {
        log.started_at.month() == month && log.started_at.year() == year
    };

    let current_logs: Vec<&WorkoutLog> = logs
        .iter()
        .filter(|l| in_month(l, curr_month, curr_year))
        .collect();
    let previous_logs: Vec<&WorkoutLog> = logs
        .iter()
        .filter(|l| in_month(l, prev_month, prev_year))
        .collect();

    let current = month_stats(&current_logs, month_name(curr_month));
    let previous = month_stats(&previous_logs, month_name(prev_month));

    // Best exercises of the current month, by heaviest completed lift
    let mut bests: Vec<BestExercise> = Vec::new();
    for log in &current_logs {
        for session in &log.exercises {
            let max_weight = session.max_completed_weight();
            let muscle = session.target_muscle.clone().unwrap_or_default();

            match bests.iter_mut().find(|b| b.name == session.exercise_name) {
                Some(best) if max_weight > best.weight => {
                    best.weight = max_weight;
                    best.muscle = muscle;
                }
                Some(_) => {}
                None => bests.push(BestExercise {
                    name: session.exercise_name.clone(),
                    weight: max_weight,
                    muscle,
                }),
            }
        }
    }
    bests.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    bests.truncate(3);

    MonthlyComparison {
        volume_delta_percent: zero_guarded_delta(
            current.total_volume_kg,
            previous.total_volume_kg,
        ),
        frequency_delta_percent: zero_guarded_delta(
            current.total_workouts as f64,
            previous.total_workouts as f64,
        ),
        current,
        previous,
        best_exercises: bests,
    }
}

fn month_stats(logs: &[&WorkoutLog], month_name: String) -> MonthlyStats {
    let total_volume: f64 = logs.iter().map(|l| l.volume()).sum();
    let count = logs.len() as u32;
    MonthlyStats {
        month_name,
        total_volume_kg: total_volume,
        total_workouts: count,
        avg_volume_per_workout: if count > 0 {
            (total_volume / count as f64).round()
        } else {
            0.0
        },
    }
}

fn month_name(month: u32) -> String {
    // chrono has no standalone month-name formatter, so borrow a fixed date
    Utc.with_ymd_and_hms(2000, month, 1, 0, 0, 0)
        .single()
        .map(|d| d.format("%B").to_string())
        .unwrap_or_default()
}

fn zero_guarded_delta(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        if current > 0.0 {
            100
        } else {
            0
        }
    } else {
        // Half rounds up, so a -0.5% delta reports as 0 rather than -1
        (((current - previous) / previous) * 100.0 + 0.5).floor() as i64
    }
}

/// Dashboard summary over whatever slice of logs the caller supplies
pub fn weekly_report(logs: &[WorkoutLog]) -> WeeklyReport {
    let mut muscles = HashSet::new();
    for log in logs {
        for session in &log.exercises {
            if let Some(muscle) = &session.target_muscle {
                muscles.insert(muscle.clone());
            }
        }
    }

    WeeklyReport {
        total_volume_kg: logs.iter().map(|l| l.volume()).sum(),
        workouts: logs.len(),
        distinct_muscles: muscles.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExerciseSession, SetLog};
    use uuid::Uuid;

    fn log_at(year: i32, month: u32, day: u32, volume: f64) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            routine_id: None,
            routine_name: "Treino A".into(),
            started_at: Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap(),
            ended_at: None,
            exercises: vec![],
            notes: None,
            total_duration_minutes: Some(60),
            total_volume_kg: Some(volume),
        }
    }

    fn with_exercise(
        mut log: WorkoutLog,
        name: &str,
        muscle: &str,
        sets: &[(u32, f64, bool)],
    ) -> WorkoutLog {
        log.exercises.push(ExerciseSession {
            exercise_id: "x".into(),
            exercise_name: name.into(),
            target_muscle: Some(muscle.into()),
            sets: sets
                .iter()
                .map(|&(reps, weight, completed)| SetLog {
                    id: Uuid::new_v4(),
                    reps,
                    weight,
                    completed,
                    rest_seconds: 60,
                })
                .collect(),
            notes: None,
        });
        log
    }

    #[test]
    fn test_volume_history_week_buckets() {
        // Jan 1 2024 is a Monday: Jan 3 lands in W1, Jan 10 in W2
        let logs = vec![
            log_at(2024, 1, 3, 1000.0),
            log_at(2024, 1, 3, 500.0),
            log_at(2024, 1, 10, 2000.0),
        ];

        let history = volume_history(&logs, Period::Week);
        assert_eq!(
            history,
            vec![
                VolumePoint { label: "W1".into(), tonnes: 2 }, // 1500kg rounds up
                VolumePoint { label: "W2".into(), tonnes: 2 },
            ]
        );
    }

    #[test]
    fn test_volume_history_month_buckets_chronological() {
        // Given newest-first, buckets still come out oldest-first
        let logs = vec![
            log_at(2024, 2, 5, 3000.0),
            log_at(2024, 1, 20, 1000.0),
            log_at(2024, 1, 5, 1000.0),
        ];

        let history = volume_history(&logs, Period::Month);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].label, "Jan 24");
        assert_eq!(history[0].tonnes, 2);
        assert_eq!(history[1].label, "Feb 24");
        assert_eq!(history[1].tonnes, 3);
    }

    #[test]
    fn test_week_number_offsets_by_jan_first_weekday() {
        // Jan 1 2023 is a Sunday (offset 0): Jan 1 is W1, Jan 8 starts W2
        assert_eq!(week_number(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()), 1);
        assert_eq!(week_number(Utc.with_ymd_and_hms(2023, 1, 8, 12, 0, 0).unwrap()), 2);
    }

    #[test]
    fn test_muscle_balance_counts_completed_sets_only() {
        let log = with_exercise(
            with_exercise(log_at(2024, 1, 5, 0.0), "Bench", "Chest", &[(10, 50.0, true), (10, 50.0, true)]),
            "Row",
            "Back",
            &[(10, 50.0, true), (10, 50.0, false)],
        );

        let balance = muscle_balance(&[log]);
        assert_eq!(balance[0], MuscleBalanceEntry { muscle: "Chest".into(), sets: 2 });
        assert_eq!(balance[1], MuscleBalanceEntry { muscle: "Back".into(), sets: 1 });
    }

    #[test]
    fn test_muscle_balance_caps_at_six_with_stable_ties() {
        let mut log = log_at(2024, 1, 5, 0.0);
        for muscle in ["A", "B", "C", "D", "E", "F", "G"] {
            log = with_exercise(log, muscle, muscle, &[(10, 20.0, true)]);
        }

        let balance = muscle_balance(&[log]);
        assert_eq!(balance.len(), 6);
        // All tied at 1 set: first-encountered order survives, "G" is cut
        assert_eq!(balance[0].muscle, "A");
        assert!(balance.iter().all(|e| e.muscle != "G"));
    }

    #[test]
    fn test_personal_records_top_four_by_weight() {
        let logs = vec![
            with_exercise(log_at(2024, 2, 1, 0.0), "Squat", "Legs", &[(5, 120.0, true)]),
            with_exercise(log_at(2024, 1, 20, 0.0), "Deadlift", "Back", &[(5, 140.0, true)]),
            with_exercise(log_at(2024, 1, 15, 0.0), "Bench", "Chest", &[(5, 90.0, true)]),
            with_exercise(log_at(2024, 1, 10, 0.0), "Press", "Shoulders", &[(5, 60.0, true)]),
            with_exercise(log_at(2024, 1, 5, 0.0), "Curl", "Arms", &[(10, 25.0, true)]),
        ];

        let records = personal_records(&logs);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].exercise_name, "Deadlift");
        assert_eq!(records[1].exercise_name, "Squat");
        assert!(records.iter().all(|r| r.exercise_name != "Curl"));
    }

    #[test]
    fn test_personal_record_keeps_first_seen_on_tie() {
        let newest = with_exercise(log_at(2024, 2, 1, 0.0), "Squat", "Legs", &[(5, 100.0, true)]);
        let newest_date = newest.started_at;
        let older = with_exercise(log_at(2024, 1, 1, 0.0), "Squat", "Legs", &[(5, 100.0, true)]);

        // Stored order is newest-first
        let records = personal_records(&[newest, older]);
        assert_eq!(records[0].achieved_at, newest_date);
    }

    #[test]
    fn test_personal_records_ignore_incomplete_sets() {
        let log = with_exercise(log_at(2024, 1, 5, 0.0), "Squat", "Legs", &[(5, 200.0, false)]);
        assert!(personal_records(&[log]).is_empty());
    }

    #[test]
    fn test_monthly_comparison_partitions_and_deltas() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let logs = vec![
            log_at(2024, 3, 12, 1200.0),
            log_at(2024, 3, 5, 1000.0),
            log_at(2024, 2, 20, 1000.0),
            log_at(2024, 2, 10, 1000.0),
            // Outside both months
            log_at(2024, 1, 10, 5000.0),
        ];

        let cmp = monthly_comparison(&logs, now);
        assert_eq!(cmp.current.month_name, "March");
        assert_eq!(cmp.current.total_workouts, 2);
        assert_eq!(cmp.current.total_volume_kg, 2200.0);
        assert_eq!(cmp.current.avg_volume_per_workout, 1100.0);
        assert_eq!(cmp.previous.month_name, "February");
        assert_eq!(cmp.previous.total_volume_kg, 2000.0);
        assert_eq!(cmp.volume_delta_percent, 10);
        assert_eq!(cmp.frequency_delta_percent, 0);
    }

    #[test]
    fn test_monthly_delta_negative_half_rounds_toward_zero() {
        // 1000kg -> 995kg across months is -0.5%: reports as 0, not -1
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let logs = vec![log_at(2024, 3, 5, 995.0), log_at(2024, 2, 5, 1000.0)];

        let cmp = monthly_comparison(&logs, now);
        assert_eq!(cmp.volume_delta_percent, 0);
    }

    #[test]
    fn test_monthly_comparison_january_wraps_to_december() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let logs = vec![log_at(2024, 1, 5, 1000.0), log_at(2023, 12, 20, 500.0)];

        let cmp = monthly_comparison(&logs, now);
        assert_eq!(cmp.previous.month_name, "December");
        assert_eq!(cmp.previous.total_volume_kg, 500.0);
        assert_eq!(cmp.volume_delta_percent, 100);
    }

    #[test]
    fn test_monthly_comparison_zero_previous_guard() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        let with_current = vec![log_at(2024, 3, 5, 1000.0)];
        let cmp = monthly_comparison(&with_current, now);
        assert_eq!(cmp.volume_delta_percent, 100);
        assert_eq!(cmp.frequency_delta_percent, 100);

        let empty = monthly_comparison(&[], now);
        assert_eq!(empty.volume_delta_percent, 0);
        assert_eq!(empty.frequency_delta_percent, 0);
    }

    #[test]
    fn test_monthly_best_exercises_top_three() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let log = with_exercise(
            with_exercise(
                with_exercise(
                    with_exercise(log_at(2024, 3, 5, 0.0), "Squat", "Legs", &[(5, 120.0, true)]),
                    "Bench",
                    "Chest",
                    &[(5, 90.0, true)],
                ),
                "Deadlift",
                "Back",
                &[(5, 140.0, true)],
            ),
            "Curl",
            "Arms",
            &[(10, 25.0, true)],
        );

        let cmp = monthly_comparison(&[log], now);
        assert_eq!(cmp.best_exercises.len(), 3);
        assert_eq!(cmp.best_exercises[0].name, "Deadlift");
        assert_eq!(cmp.best_exercises[0].muscle, "Back");
    }

    #[test]
    fn test_aggregators_are_idempotent() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let logs = vec![
            with_exercise(log_at(2024, 3, 5, 1000.0), "Squat", "Legs", &[(5, 120.0, true)]),
            with_exercise(log_at(2024, 2, 5, 900.0), "Bench", "Chest", &[(8, 80.0, true)]),
        ];

        assert_eq!(volume_history(&logs, Period::Week), volume_history(&logs, Period::Week));
        assert_eq!(muscle_balance(&logs), muscle_balance(&logs));
        assert_eq!(
            personal_records(&logs)
                .iter()
                .map(|r| r.weight)
                .collect::<Vec<_>>(),
            personal_records(&logs)
                .iter()
                .map(|r| r.weight)
                .collect::<Vec<_>>()
        );
        assert_eq!(
            monthly_comparison(&logs, now).volume_delta_percent,
            monthly_comparison(&logs, now).volume_delta_percent
        );
    }

    #[test]
    fn test_weekly_report_counts_distinct_muscles() {
        let logs = vec![
            with_exercise(log_at(2024, 3, 5, 1000.0), "Squat", "Legs", &[(5, 120.0, true)]),
            with_exercise(log_at(2024, 3, 7, 800.0), "Lunge", "Legs", &[(8, 40.0, true)]),
        ];

        let report = weekly_report(&logs);
        assert_eq!(report.total_volume_kg, 1800.0);
        assert_eq!(report.workouts, 2);
        assert_eq!(report.distinct_muscles, 1);
    }
}
