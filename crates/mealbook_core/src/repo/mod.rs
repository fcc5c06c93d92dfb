//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data-access contract for favorite recipes.
//! - Isolate SQLite query details from store/service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `FavoriteRecipe::validate()` before
//!   persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition
//!   to DB transport errors.

pub mod favorite_repo;
