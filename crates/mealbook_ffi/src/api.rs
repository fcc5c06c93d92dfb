//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for UI integration: empty results or
//!   message envelopes, never exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Catalog calls block the FRB worker, never the Dart UI thread
//!   (they are deliberately not marked `sync`).

use mealbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, now_epoch_ms,
    ping as ping_inner, validate_rating, FavoriteRecipe, FavoritesStore, MealApiClient, Recipe,
    RecipeService,
};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

const DB_FILE_NAME: &str = "mealbook.sqlite3";
const CATALOG_WAIT: Duration = Duration::from_secs(65);

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SERVICE: OnceCell<RecipeService> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Idempotent for the same `level + log_dir`.
/// - Never panics; returns empty string on success and an error
///   message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the favorites database location before first use.
///
/// # FFI contract
/// - Sync call; must run before any favorites/catalog call.
/// - Calling again with the same path is idempotent; a different
///   path after the store opened returns an error message.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_dir: String) -> String {
    let trimmed = db_dir.trim();
    if trimmed.is_empty() {
        return "db_dir cannot be empty".to_string();
    }
    let path = PathBuf::from(trimmed).join(DB_FILE_NAME);
    match DB_PATH.set(path.clone()) {
        Ok(()) => String::new(),
        Err(_) if DB_PATH.get() == Some(&path) => String::new(),
        Err(_) => "store path already pinned to a different location".to_string(),
    }
}

/// A recipe as shown by the UI, flattened for the FFI boundary.
///
/// Serves both catalog results (overlay fields at their defaults) and
/// stored favorites (overlay fields populated).
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeItem {
    pub id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    /// Display-ready ingredient text, one entry per line.
    pub ingredients: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub user_notes: String,
    pub rating: f32,
    pub date_added: i64,
}

/// Generic action response envelope for favorites commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

// ---- catalog calls (block the FRB worker, resolve once) ---------

/// Searches the remote catalog by name. Empty on no match or any
/// network failure.
pub fn catalog_search(query: String) -> Vec<RecipeItem> {
    with_service_list(|service| service.search_recipes(&query))
}

/// Recipes in one catalog category.
pub fn catalog_filter_by_category(category: String) -> Vec<RecipeItem> {
    with_service_list(|service| service.filter_by_category(&category))
}

/// Full details for one catalog id.
pub fn catalog_recipe_details(id: String) -> Option<RecipeItem> {
    with_service_single(|service| service.recipe_details(&id))
}

/// One recipe chosen by the catalog.
pub fn catalog_random_recipe() -> Option<RecipeItem> {
    with_service_single(RecipeService::random_recipe)
}

/// The catalog's category descriptors.
pub fn catalog_categories() -> Vec<RecipeItem> {
    with_service_list(RecipeService::categories)
}

// ---- favorites commands -----------------------------------------

/// Saves a recipe to favorites with overlay defaults.
///
/// # FFI contract
/// - Sync call; the write itself runs on the core worker pool.
#[flutter_rust_bridge::frb(sync)]
pub fn favorite_save(item: RecipeItem) -> ActionResponse {
    if item.id.trim().is_empty() {
        return ActionResponse::failure("recipe id must not be empty");
    }
    match service() {
        Ok(service) => {
            service.insert_favorite(favorite_from_item(item));
            ActionResponse::success("Recipe saved to favorites.")
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Updates the personal notes and rating of a stored favorite.
///
/// # FFI contract
/// - Sync call; validation happens here, the write runs on the pool.
/// - A missing id is a silent no-op, matching the store contract.
#[flutter_rust_bridge::frb(sync)]
pub fn favorite_update_notes_and_rating(id: String, notes: String, rating: f32) -> ActionResponse {
    if let Err(err) = validate_rating(rating) {
        return ActionResponse::failure(err.to_string());
    }
    match service() {
        Ok(service) => {
            service.update_notes_and_rating(id, notes, rating);
            ActionResponse::success("Notes and rating updated.")
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Removes one favorite by id.
#[flutter_rust_bridge::frb(sync)]
pub fn favorite_delete(id: String) -> ActionResponse {
    match service() {
        Ok(service) => {
            service.delete_favorite(&FavoriteRecipe::new(id, 0));
            ActionResponse::success("Recipe removed from favorites.")
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Clears every favorite.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_clear() -> ActionResponse {
    match service() {
        Ok(service) => {
            service.delete_all_favorites();
            ActionResponse::success("All favorites cleared.")
        }
        Err(err) => ActionResponse::failure(err),
    }
}

// ---- favorites queries ------------------------------------------

/// Whether a recipe id is currently favorited.
///
/// # FFI contract
/// - Sync DB-backed call; store failures read as "not favorited".
#[flutter_rust_bridge::frb(sync)]
pub fn favorite_is_saved(id: String) -> bool {
    match service() {
        Ok(service) => service.store().exists(&id).unwrap_or(false),
        Err(_) => false,
    }
}

/// All favorites, most recently added first.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_list() -> Vec<RecipeItem> {
    read_favorites(|store| store.list_all())
}

/// One favorite by id.
#[flutter_rust_bridge::frb(sync)]
pub fn favorite_by_id(id: String) -> Option<RecipeItem> {
    match service() {
        Ok(service) => service
            .store()
            .get_by_id(&id)
            .ok()
            .flatten()
            .map(item_from_favorite),
        Err(_) => None,
    }
}

/// Favorites whose name contains `term`, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_search(term: String) -> Vec<RecipeItem> {
    read_favorites(|store| store.search(&term))
}

/// Favorites in one category, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_by_category(category: String) -> Vec<RecipeItem> {
    read_favorites(|store| store.list_by_category(&category))
}

/// Favorites rated at or above `min_rating`, best first.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_top_rated(min_rating: f32) -> Vec<RecipeItem> {
    read_favorites(|store| store.top_rated(min_rating))
}

/// Number of stored favorites.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_count() -> i64 {
    match service() {
        Ok(service) => service.store().count().unwrap_or(0),
        Err(_) => 0,
    }
}

// ---- internals --------------------------------------------------

fn service() -> Result<&'static RecipeService, String> {
    SERVICE.get_or_try_init(|| {
        let store = FavoritesStore::open(resolve_db_path())
            .map_err(|err| format!("favorites store open failed: {err}"))?;
        Ok(RecipeService::new(
            MealApiClient::with_default_catalog(),
            store,
        ))
    })
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("MEALBOOK_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_service_list(
    start: impl FnOnce(&RecipeService) -> mealbook_core::Fetch<Vec<Recipe>>,
) -> Vec<RecipeItem> {
    let Ok(service) = service() else {
        return Vec::new();
    };
    let mut fetch = start(service);
    match fetch.wait_timeout(CATALOG_WAIT) {
        Some(recipes) => recipes.iter().map(item_from_recipe).collect(),
        None => Vec::new(),
    }
}

fn with_service_single(
    start: impl FnOnce(&RecipeService) -> mealbook_core::Fetch<Option<Recipe>>,
) -> Option<RecipeItem> {
    let service = service().ok()?;
    let mut fetch = start(service);
    fetch
        .wait_timeout(CATALOG_WAIT)
        .and_then(|recipe| recipe.as_ref().map(item_from_recipe))
}

fn read_favorites(
    read: impl FnOnce(&FavoritesStore) -> mealbook_core::RepoResult<Vec<FavoriteRecipe>>,
) -> Vec<RecipeItem> {
    match service() {
        Ok(service) => read(service.store())
            .map(|rows| rows.into_iter().map(item_from_favorite).collect())
            .unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

fn item_from_recipe(recipe: &Recipe) -> RecipeItem {
    RecipeItem {
        id: recipe.id.clone(),
        name: recipe.name.clone(),
        category: recipe.category.clone(),
        area: recipe.area.clone(),
        instructions: recipe.instructions.clone(),
        ingredients: recipe.formatted_ingredients(),
        image_url: recipe.image_url.clone(),
        video_url: recipe.video_url.clone(),
        user_notes: recipe.user_notes.clone(),
        rating: recipe.rating,
        date_added: recipe.date_added,
    }
}

fn item_from_favorite(favorite: FavoriteRecipe) -> RecipeItem {
    RecipeItem {
        id: favorite.id,
        name: favorite.name,
        category: favorite.category,
        area: favorite.area,
        instructions: favorite.instructions,
        ingredients: favorite.ingredients,
        image_url: favorite.image_url,
        video_url: favorite.video_url,
        user_notes: favorite.user_notes,
        rating: favorite.rating,
        date_added: favorite.date_added,
    }
}

fn favorite_from_item(item: RecipeItem) -> FavoriteRecipe {
    FavoriteRecipe {
        id: item.id,
        name: item.name,
        image_url: item.image_url,
        category: item.category,
        area: item.area,
        instructions: item.instructions,
        ingredients: item.ingredients,
        video_url: item.video_url,
        user_notes: String::new(),
        rating: 0.0,
        date_added: now_epoch_ms(),
    }
}
