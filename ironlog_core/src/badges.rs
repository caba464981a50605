//! Static badge catalog.
//!
//! Badge definitions are fixed at process start and never persisted; only
//! per-user progress records ([`crate::UserBadge`]) reach the store.

use crate::types::{Badge, BadgeCategory, BadgeTier};
use crate::{Error, Result};
use once_cell::sync::Lazy;

/// Cached badge catalog - built once and reused across all evaluations
static BADGE_CATALOG: Lazy<Vec<Badge>> = Lazy::new(build_badge_catalog);

/// Get a reference to the cached badge catalog
pub fn badge_catalog() -> &'static [Badge] {
    &BADGE_CATALOG
}

/// Look up a badge definition by id
pub fn badge_by_id(id: &str) -> Option<&'static Badge> {
    BADGE_CATALOG.iter().find(|b| b.id == id)
}

fn badge(
    id: &str,
    name: &str,
    description: &str,
    category: BadgeCategory,
    tier: BadgeTier,
    requirement: f64,
) -> Badge {
    Badge {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        category,
        tier,
        requirement,
    }
}

/// Builds the badge catalog.
///
/// For production use prefer [`badge_catalog()`], which returns a cached
/// reference. This function is retained for testing.
pub fn build_badge_catalog() -> Vec<Badge> {
    vec![
        // Consistency
        badge(
            "c_rocket",
            "Runaway Rocket",
            "Completed 3 workouts in a single week.",
            BadgeCategory::Consistency,
            BadgeTier::Bronze,
            3.0,
        ),
        badge(
            "c_monster",
            "Discipline Monster",
            "Completed 12 workouts in a month.",
            BadgeCategory::Consistency,
            BadgeTier::Silver,
            12.0,
        ),
        badge(
            "c_unstoppable",
            "Unstoppable",
            "Trained for 3 months without missing.",
            BadgeCategory::Consistency,
            BadgeTier::Gold,
            90.0,
        ),
        // Volume
        badge(
            "v_million",
            "First Ton",
            "Lifted over 1,000kg in a single workout.",
            BadgeCategory::Volume,
            BadgeTier::Bronze,
            1000.0,
        ),
        badge(
            "v_sacred",
            "Sacred Tonnage",
            "Accumulated 10,000kg of volume in a month.",
            BadgeCategory::Volume,
            BadgeTier::Silver,
            10_000.0,
        ),
        badge(
            "v_giant",
            "Giant",
            "Accumulated 100,000kg of lifetime volume.",
            BadgeCategory::Volume,
            BadgeTier::Diamond,
            100_000.0,
        ),
        // Dedication
        badge(
            "d_clock",
            "Swiss Watch",
            "Followed the suggested rest times in 10 workouts.",
            BadgeCategory::Dedication,
            BadgeTier::Silver,
            10.0,
        ),
    ]
}

/// Validate the catalog for consistency and completeness
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate(catalog: &[Badge]) -> Vec<String> {
    let mut errors = Vec::new();

    for badge in catalog {
        if badge.id.is_empty() {
            errors.push("Badge has empty ID".to_string());
        }
        if badge.name.is_empty() {
            errors.push(format!("Badge '{}' has empty name", badge.id));
        }
        if badge.requirement <= 0.0 {
            errors.push(format!(
                "Badge '{}' has non-positive requirement {}",
                badge.id, badge.requirement
            ));
        }
    }

    // Duplicate ids would make progress records ambiguous
    for (i, badge) in catalog.iter().enumerate() {
        if catalog[..i].iter().any(|b| b.id == badge.id) {
            errors.push(format!("Duplicate badge ID '{}'", badge.id));
        }
    }

    errors
}

/// Startup guard: reject a catalog that fails validation.
///
/// Called once before any command dispatch; a broken catalog would make
/// progress records ambiguous, so nothing should run against one.
pub fn ensure_valid(catalog: &[Badge]) -> Result<()> {
    let errors = validate(catalog);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::BadgeCatalog(errors.join("; ")))
    }
}
