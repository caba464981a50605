use chrono::Utc;
use clap::{Parser, Subcommand};
use ironlog_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "ironlog")]
#[command(about = "Workout tracking and analytics system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user with starter routines and sign them in
    Seed {
        /// Display name for the new user
        #[arg(long)]
        name: String,
    },

    /// Show load suggestions for a routine before training
    Recommend {
        /// Routine name to prepare
        #[arg(long)]
        routine: String,
    },

    /// Record a finished workout from a JSON file and show the report
    Finish {
        /// Path to a workout log JSON file
        #[arg(long)]
        log: PathBuf,
    },

    /// Aggregated statistics over workout history
    Stats {
        #[command(subcommand)]
        view: StatsView,
    },

    /// Show badge progress and unlocks
    Achievements,

    /// Coaching analysis of recent progress
    Coach,

    /// Suggest a weekly training split for the signed-in user
    Plan {
        /// Training days per week
        #[arg(long, default_value_t = 3)]
        days: u32,
    },

    /// Export workout history as CSV
    ExportCsv {
        /// Output file path
        #[arg(long)]
        out: PathBuf,
    },

    /// Export a full backup of the signed-in user's data
    Backup {
        /// Output file path
        #[arg(long)]
        out: PathBuf,
    },

    /// Merge a backup file into the local store
    Restore {
        /// Backup file to restore
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum StatsView {
    /// Volume per week or month, in tonnes
    Volume {
        /// Bucket by month instead of week
        #[arg(long)]
        monthly: bool,
    },
    /// Completed sets per muscle group
    Balance,
    /// Personal records (heaviest completed lifts)
    Records,
    /// Current vs. previous calendar month
    Monthly,
    /// Quick summary of the supplied history
    Week,
}

fn main() -> Result<()> {
    ironlog_core::logging::init();

    let cli = Cli::parse();

    // Nothing runs against a broken badge catalog
    badges::ensure_valid(badge_catalog())?;

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data dir {:?}", data_dir);
    let store = Store::in_dir(&data_dir);

    match cli.command {
        Commands::Seed { name } => cmd_seed(&store, &name),
        Commands::Recommend { routine } => cmd_recommend(&store, &config, &routine),
        Commands::Finish { log } => cmd_finish(&store, &log),
        Commands::Stats { view } => cmd_stats(&store, view),
        Commands::Achievements => cmd_achievements(&store),
        Commands::Coach => cmd_coach(&store),
        Commands::Plan { days } => cmd_plan(&store, days),
        Commands::ExportCsv { out } => cmd_export_csv(&store, &out),
        Commands::Backup { out } => cmd_backup(&store, &out),
        Commands::Restore { file } => cmd_restore(&store, &file),
    }
}

/// The signed-in user, or a helpful error
fn current_user(store: &Store) -> Result<User> {
    store
        .session()?
        .ok_or_else(|| Error::Store("No user signed in. Run `ironlog seed --name <you>` first.".into()))
}

fn cmd_seed(store: &Store, name: &str) -> Result<()> {
    if let Some(existing) = store.find_user_by_name(name)? {
        store.save_session(&existing, Utc::now())?;
        println!("Signed in as existing user '{}'.", existing.name);
        return Ok(());
    }

    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: None,
        goal: None,
        level: None,
    };
    store.save_user(&user)?;
    store.save_session(&user, Utc::now())?;
    let seeded = store.seed_initial_routines(user.id)?;

    println!("Created user '{}'.", user.name);
    if seeded {
        for routine in store.routines_for(user.id)? {
            println!("  + routine: {}", routine.name);
        }
    }
    Ok(())
}

fn cmd_recommend(store: &Store, config: &Config, routine_name: &str) -> Result<()> {
    let user = current_user(store)?;
    let routine = store
        .routine_by_name(user.id, routine_name)?
        .ok_or_else(|| Error::Store(format!("No routine named '{}'", routine_name)))?;
    let history = store.workout_logs_for(user.id)?;

    let recommendations = recommend(&routine, &history, &config.recommendation);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  LOAD SUGGESTIONS: {}", routine.name);
    println!("╰─────────────────────────────────────────╯");

    for exercise in &routine.exercises {
        println!("\n  {}", exercise.name);
        match recommendations.get(&exercise.id) {
            Some(rec) => {
                println!("  → {:?}: {}kg", rec.action, rec.suggested_weight);
                println!("    {}", rec.reasoning);
                if let Some(rest) = rec.suggested_rest_seconds {
                    println!("    Suggested rest: {}s", rest);
                }
            }
            None => println!("  → No usable history yet."),
        }
    }
    println!();
    Ok(())
}

fn cmd_finish(store: &Store, log_path: &PathBuf) -> Result<()> {
    let user = current_user(store)?;
    let now = Utc::now();

    let contents = std::fs::read_to_string(log_path)?;
    let mut log: WorkoutLog = serde_json::from_str(&contents)
        .map_err(|e| Error::Store(format!("Invalid workout log file {:?}: {}", log_path, e)))?;

    // The log belongs to the signed-in user regardless of the file contents
    log.user_id = user.id;
    if log.ended_at.is_none() || log.total_volume_kg.is_none() {
        log.finish(now);
    }

    store.save_workout_log(&log)?;

    // Performance report against prior history (current excluded by id)
    let history = store.workout_logs_for(user.id)?;
    let report = compare(&log, &history);

    println!("\n✓ Workout logged: {}", log.routine_name);
    println!(
        "  Volume: {}kg in {} min",
        log.volume(),
        log.total_duration_minutes.unwrap_or(0)
    );
    println!("\n  [{:?}] {}", report.highlight, report.message);

    // Refresh badge progress on the updated history
    let existing = store.user_badges(user.id)?;
    let update = check_achievements(user.id, &history, &existing, now);
    if !update.user_badges.is_empty() {
        store.save_user_badges(user.id, &update.user_badges)?;
    }
    for badge in &update.unlocked {
        println!("\n  ✓ Badge unlocked: {} - {}", badge.name, badge.description);
    }

    Ok(())
}

fn cmd_stats(store: &Store, view: StatsView) -> Result<()> {
    let user = current_user(store)?;
    let history = store.workout_logs_for(user.id)?;

    match view {
        StatsView::Volume { monthly } => {
            let period = if monthly { Period::Month } else { Period::Week };
            let points = volume_history(&history, period);
            if points.is_empty() {
                println!("No finished workouts yet.");
            }
            for point in points {
                println!("{:>8}  {}t", point.label, point.tonnes);
            }
        }
        StatsView::Balance => {
            for entry in muscle_balance(&history) {
                println!("{:>16}  {} sets", entry.muscle, entry.sets);
            }
        }
        StatsView::Records => {
            for record in personal_records(&history) {
                println!(
                    "{:>24}  {}kg  ({})",
                    record.exercise_name,
                    record.weight,
                    record.achieved_at.format("%Y-%m-%d")
                );
            }
        }
        StatsView::Monthly => {
            let cmp = monthly_comparison(&history, Utc::now());
            println!(
                "{}: {}kg over {} workouts (avg {}kg)",
                cmp.current.month_name,
                cmp.current.total_volume_kg,
                cmp.current.total_workouts,
                cmp.current.avg_volume_per_workout
            );
            println!(
                "{}: {}kg over {} workouts",
                cmp.previous.month_name, cmp.previous.total_volume_kg, cmp.previous.total_workouts
            );
            println!(
                "Volume {:+}%  |  Frequency {:+}%",
                cmp.volume_delta_percent, cmp.frequency_delta_percent
            );
            for best in cmp.best_exercises {
                println!("  → {}: {}kg ({})", best.name, best.weight, best.muscle);
            }
        }
        StatsView::Week => {
            let report = weekly_report(&history);
            println!(
                "{} workouts - {}kg total volume - {} muscle groups",
                report.workouts, report.total_volume_kg, report.distinct_muscles
            );
        }
    }
    Ok(())
}

fn cmd_achievements(store: &Store) -> Result<()> {
    let user = current_user(store)?;
    let history = store.workout_logs_for(user.id)?;
    let existing = store.user_badges(user.id)?;

    let update = check_achievements(user.id, &history, &existing, Utc::now());
    if update.user_badges.is_empty() {
        println!("No workouts logged yet - badges start tracking after your first session.");
        return Ok(());
    }
    store.save_user_badges(user.id, &update.user_badges)?;

    for badge in badge_catalog() {
        let record = update.user_badges.iter().find(|r| r.badge_id == badge.id);
        let (marker, progress) = match record {
            Some(r) if r.is_unlocked => ("✓", badge.requirement),
            Some(r) => (" ", r.current_progress),
            None => (" ", 0.0),
        };
        println!(
            "{} {:?} {}: {}/{}",
            marker, badge.tier, badge.name, progress, badge.requirement
        );
    }
    for badge in &update.unlocked {
        println!("\n✓ New badge: {} - {}", badge.name, badge.description);
    }
    Ok(())
}

fn cmd_coach(store: &Store) -> Result<()> {
    let user = current_user(store)?;
    let history = store.workout_logs_for(user.id)?;

    if history.is_empty() {
        println!("Log a few workouts first - the coach needs data to work with.");
        return Ok(());
    }

    println!("{}", analyze_progress(&StaticCoach, &history));
    Ok(())
}

fn cmd_plan(store: &Store, days: u32) -> Result<()> {
    let user = current_user(store)?;
    let history = store.workout_logs_for(user.id)?;

    // Profile fields are optional at signup; fall back to the broadest split
    let goal = user.goal.unwrap_or(TrainingGoal::Hypertrophy);
    let level = user.level.unwrap_or(ExperienceLevel::Beginner);

    println!("{}", suggest_weekly_plan(&StaticCoach, goal, level, days, &history));
    Ok(())
}

fn cmd_export_csv(store: &Store, out: &PathBuf) -> Result<()> {
    let user = current_user(store)?;
    let history = store.workout_logs_for(user.id)?;

    let rows = csv_export::export_logs(&history, out)?;
    println!("✓ Exported {} set rows to {}", rows, out.display());
    Ok(())
}

fn cmd_backup(store: &Store, out: &PathBuf) -> Result<()> {
    let user = current_user(store)?;
    backup::export_to_file(store, &user, Utc::now(), out)?;
    println!("✓ Backup written to {}", out.display());
    Ok(())
}

fn cmd_restore(store: &Store, file: &PathBuf) -> Result<()> {
    let restored = backup::restore_from_file(store, file)?;
    println!(
        "✓ Restored backup for '{}' ({} routines, {} logs)",
        restored.user.name,
        restored.routines.len(),
        restored.logs.len()
    );
    Ok(())
}
