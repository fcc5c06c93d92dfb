//! Persisted favorite-recipe model.
//!
//! # Responsibility
//! - Define the row shape stored in `favorite_recipes`.
//! - Validate user-overlay invariants before persistence.
//!
//! # Invariants
//! - `id` is the primary key and matches the catalog id of the source
//!   recipe; inserting an existing id replaces the whole row.
//! - `rating` stays within 0.0 to 5.0; 0.0 means "unrated".

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A favorite recipe as stored locally.
///
/// Created on first "add to favorites", mutated by notes/rating or
/// full updates, destroyed by delete or clear-all. Ingredients are
/// pre-flattened into one display string at conversion time; the
/// per-slot structure is not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecipe {
    /// Catalog id of the source recipe; primary key.
    pub id: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    /// Flattened ingredient text, one entry per line.
    pub ingredients: String,
    pub video_url: Option<String>,
    /// Personal notes; empty until the user writes some.
    pub user_notes: String,
    /// 0.0 (unrated) to 5.0.
    pub rating: f32,
    /// Epoch milliseconds of the first save.
    pub date_added: i64,
}

impl FavoriteRecipe {
    /// Creates a favorite with overlay defaults and no catalog fields.
    pub fn new(id: impl Into<String>, date_added: i64) -> Self {
        Self {
            id: id.into(),
            name: None,
            image_url: None,
            category: None,
            area: None,
            instructions: None,
            ingredients: String::new(),
            video_url: None,
            user_notes: String::new(),
            rating: 0.0,
            date_added,
        }
    }

    /// Checks persistence invariants. Write paths call this before
    /// any SQL runs.
    pub fn validate(&self) -> Result<(), FavoriteValidationError> {
        if self.id.trim().is_empty() {
            return Err(FavoriteValidationError::EmptyId);
        }
        validate_rating(self.rating)
    }
}

/// Checks a rating value against the 0.0 to 5.0 contract.
pub fn validate_rating(rating: f32) -> Result<(), FavoriteValidationError> {
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(FavoriteValidationError::RatingOutOfRange(rating));
    }
    Ok(())
}

/// Validation failure for favorite-recipe writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FavoriteValidationError {
    /// The primary key is empty or blank.
    EmptyId,
    /// Rating is non-finite or outside 0.0 to 5.0.
    RatingOutOfRange(f32),
}

impl Display for FavoriteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "favorite recipe id must not be empty"),
            Self::RatingOutOfRange(value) => {
                write!(f, "rating {value} is outside the 0.0 to 5.0 range")
            }
        }
    }
}

impl Error for FavoriteValidationError {}

#[cfg(test)]
mod tests {
    use super::{validate_rating, FavoriteRecipe, FavoriteValidationError};

    #[test]
    fn blank_id_is_rejected() {
        let favorite = FavoriteRecipe::new("  ", 0);
        assert_eq!(favorite.validate(), Err(FavoriteValidationError::EmptyId));
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(5.0).is_ok());
        assert!(validate_rating(5.1).is_err());
        assert!(validate_rating(-0.5).is_err());
        assert!(validate_rating(f32::NAN).is_err());
    }
}
