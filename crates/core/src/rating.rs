//! Difficulty and quality ratings.
//!
//! Each user rates a crackme at most once per kind. The crackme row caches
//! the mean of the live ratings; the cache is refreshed after every new
//! rating and repaired out of band when it drifts.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lowest accepted rating.
pub const MIN_RATING: i32 = 1;
/// Highest accepted rating.
pub const MAX_RATING: i32 = 5;
/// Largest difference between a cached and a recomputed average that is
/// still considered in sync.
pub const AVERAGE_TOLERANCE: f64 = 0.001;

/// What a rating measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingKind {
    Difficulty,
    Quality,
}

impl RatingKind {
    pub const ALL: [RatingKind; 2] = [Self::Difficulty, Self::Quality];

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "difficulty" => Ok(Self::Difficulty),
            "quality" => Ok(Self::Quality),
            other => Err(CoreError::Validation(format!(
                "Unknown rating kind '{other}'. Must be one of: difficulty, quality"
            ))),
        }
    }

    /// Stored name; also the name of the cached column on `crackmes`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Difficulty => "difficulty",
            Self::Quality => "quality",
        }
    }
}

/// Check a submitted rating value.
pub fn validate_rating(value: i32) -> Result<i32, CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(value)
}

/// Mean of `ratings`, `0.0` when there are none.
pub fn average(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    sum as f64 / ratings.len() as f64
}

/// Whether a cached average must be overwritten with `expected`.
///
/// A NaN cache always needs repair.
pub fn average_drifted(cached: f64, expected: f64) -> bool {
    cached.is_nan() || (cached - expected).abs() > AVERAGE_TOLERANCE
}
