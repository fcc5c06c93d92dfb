//! Core domain logic for MealBook.
//! This crate is the single source of truth for catalog access and
//! favorite-recipe persistence; UI layers stay free of data rules.

pub mod api;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use api::meal_api::{ApiError, ApiResult, MealApiClient, DEFAULT_BASE_URL};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::convert::{to_favorite, to_recipe};
pub use model::favorite::{validate_rating, FavoriteRecipe, FavoriteValidationError};
pub use model::recipe::{IngredientSlot, MealsResponse, Recipe, MAX_INGREDIENT_SLOTS};
pub use repo::favorite_repo::{
    FavoriteRepository, RepoError, RepoResult, SqliteFavoriteRepository,
};
pub use service::fetch::Fetch;
pub use service::recipe_service::{now_epoch_ms, RecipeService};
pub use store::live::Live;
pub use store::FavoritesStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
