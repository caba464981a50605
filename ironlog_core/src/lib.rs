#![forbid(unsafe_code)]

//! Core domain model and business logic for the Ironlog workout tracker.
//!
//! This crate provides:
//! - Domain types (users, routines, logs, sets, badges)
//! - Load/rest recommendation engine with stagnation detection
//! - Post-workout performance comparison
//! - Aggregated statistics (volume history, muscle balance, records)
//! - Rule-based achievement tracking
//! - Local JSON store, backup interchange and CSV export

pub mod types;
pub mod error;
pub mod badges;
pub mod config;
pub mod logging;
pub mod store;
pub mod backup;
pub mod csv_export;
pub mod recommend;
pub mod compare;
pub mod stats;
pub mod achievements;
pub mod coach;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use badges::badge_catalog;
pub use config::Config;
pub use store::Store;
pub use recommend::recommend;
pub use compare::compare;
pub use stats::{monthly_comparison, muscle_balance, personal_records, volume_history, weekly_report};
pub use achievements::{evaluate as check_achievements, AchievementUpdate};
pub use coach::{analyze_progress, suggest_weekly_plan, StaticCoach, TextGenerator};
