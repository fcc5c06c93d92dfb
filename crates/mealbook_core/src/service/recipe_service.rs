//! Recipe use-case façade over the catalog client and the favorites
//! store.
//!
//! # Responsibility
//! - Translate each UI use case into either a catalog request or a
//!   background store operation.
//! - Deliver remote results through one-shot [`Fetch`] handles and
//!   local query results through [`Live`] subscriptions.
//!
//! # Invariants
//! - No method blocks the caller: remote ops resolve on their own
//!   thread, writes run on the two-worker pool, queries hand back
//!   subscriptions immediately.
//! - Remote failures never cross this boundary: zero results, bad
//!   status and transport failure all resolve to the same empty
//!   value, distinguished only in the log.
//! - Store failures inside pool jobs are logged and dropped; callers
//!   get no confirmation either way.

use crate::api::meal_api::{ApiResult, MealApiClient};
use crate::model::convert::to_favorite;
use crate::model::favorite::FavoriteRecipe;
use crate::model::recipe::{MealsResponse, Recipe};
use crate::repo::favorite_repo::RepoResult;
use crate::service::fetch::{self, Fetch};
use crate::service::write_pool::WritePool;
use crate::store::live::Live;
use crate::store::FavoritesStore;
use log::{debug, error};
use std::sync::Arc;
use std::thread::Builder;
use std::time::{SystemTime, UNIX_EPOCH};

const WRITE_WORKERS: usize = 2;

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Single entry point for recipe data: remote catalog reads and
/// local favorites CRUD behind one surface.
///
/// Both collaborators are injected at construction and owned for the
/// service lifetime; clones of the service are not needed because the
/// handle types it returns are self-contained.
pub struct RecipeService {
    api: Arc<MealApiClient>,
    store: FavoritesStore,
    pool: WritePool,
}

impl RecipeService {
    pub fn new(api: MealApiClient, store: FavoritesStore) -> Self {
        Self {
            api: Arc::new(api),
            store,
            pool: WritePool::new(WRITE_WORKERS),
        }
    }

    /// The underlying store handle, for callers that manage their own
    /// threading (FFI adapters, tests).
    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    // ---- catalog (remote-backed) --------------------------------

    /// Recipes whose name matches `query`; empty on no match or any
    /// failure.
    pub fn search_recipes(&self, query: &str) -> Fetch<Vec<Recipe>> {
        let api = Arc::clone(&self.api);
        let query = query.to_string();
        spawn_fetch("search", move || {
            list_or_empty("search", api.search_by_name(&query))
        })
    }

    /// Recipes in the given catalog category.
    pub fn filter_by_category(&self, category: &str) -> Fetch<Vec<Recipe>> {
        let api = Arc::clone(&self.api);
        let category = category.to_string();
        spawn_fetch("filter", move || {
            list_or_empty("filter", api.filter_by_category(&category))
        })
    }

    /// Full details for one recipe id; `None` on no match or any
    /// failure.
    pub fn recipe_details(&self, id: &str) -> Fetch<Option<Recipe>> {
        let api = Arc::clone(&self.api);
        let id = id.to_string();
        spawn_fetch("lookup", move || {
            first_or_none("lookup", api.get_by_id(&id))
        })
    }

    /// One recipe chosen by the catalog.
    pub fn random_recipe(&self) -> Fetch<Option<Recipe>> {
        let api = Arc::clone(&self.api);
        spawn_fetch("random", move || first_or_none("random", api.get_random()))
    }

    /// The catalog's category descriptors.
    pub fn categories(&self) -> Fetch<Vec<Recipe>> {
        let api = Arc::clone(&self.api);
        spawn_fetch("categories", move || {
            list_or_empty("categories", api.list_categories())
        })
    }

    // ---- favorites (local-backed writes) ------------------------

    /// Saves a favorite row; returns immediately, runs on the pool.
    pub fn insert_favorite(&self, favorite: FavoriteRecipe) {
        let store = self.store.clone();
        self.pool.execute(move || {
            log_write("insert", &favorite.id, store.insert_or_replace(&favorite));
        });
    }

    /// Converts a catalog recipe (stamping the current time) and
    /// saves it as a favorite.
    pub fn add_favorite(&self, recipe: &Recipe) {
        self.insert_favorite(to_favorite(recipe, now_epoch_ms()));
    }

    /// Full-row update of an existing favorite.
    pub fn update_favorite(&self, favorite: FavoriteRecipe) {
        let store = self.store.clone();
        self.pool.execute(move || {
            log_write("update", &favorite.id, store.update(&favorite));
        });
    }

    /// Quick update of just the notes and rating columns; a missing
    /// id is a silent no-op.
    pub fn update_notes_and_rating(
        &self,
        id: impl Into<String>,
        notes: impl Into<String>,
        rating: f32,
    ) {
        let store = self.store.clone();
        let id = id.into();
        let notes = notes.into();
        self.pool.execute(move || {
            log_write(
                "update_notes",
                &id,
                store.update_notes_and_rating(&id, &notes, rating).map(|_| ()),
            );
        });
    }

    /// Removes one favorite, keyed by the recipe's id.
    pub fn delete_favorite(&self, favorite: &FavoriteRecipe) {
        let store = self.store.clone();
        let id = favorite.id.clone();
        self.pool.execute(move || {
            log_write("delete", &id, store.delete(&id).map(|_| ()));
        });
    }

    /// Clears every favorite.
    pub fn delete_all_favorites(&self) {
        let store = self.store.clone();
        self.pool.execute(move || {
            log_write("delete_all", "*", store.delete_all().map(|_| ()));
        });
    }

    /// Asynchronous existence check. The callback runs exactly once,
    /// on a pool worker; a store failure reads as "not favorited".
    pub fn is_favorited(
        &self,
        id: impl Into<String>,
        on_result: impl FnOnce(bool) + Send + 'static,
    ) {
        let store = self.store.clone();
        let id = id.into();
        self.pool.execute(move || {
            let favorited = store.exists(&id).unwrap_or_else(|err| {
                error!("event=repo_write module=service op=exists id={id} status=error error={err}");
                false
            });
            on_result(favorited);
        });
    }

    // ---- favorites (local-backed live queries) ------------------

    pub fn all_favorites(&self) -> RepoResult<Live<Vec<FavoriteRecipe>>> {
        self.store.watch_all()
    }

    pub fn favorite_by_id(&self, id: &str) -> RepoResult<Live<Option<FavoriteRecipe>>> {
        self.store.watch_by_id(id)
    }

    pub fn search_favorites(&self, term: &str) -> RepoResult<Live<Vec<FavoriteRecipe>>> {
        self.store.watch_search(term)
    }

    pub fn favorites_by_category(&self, category: &str) -> RepoResult<Live<Vec<FavoriteRecipe>>> {
        self.store.watch_by_category(category)
    }

    pub fn top_rated_favorites(&self, min_rating: f32) -> RepoResult<Live<Vec<FavoriteRecipe>>> {
        self.store.watch_top_rated(min_rating)
    }

    pub fn favorites_count(&self) -> RepoResult<Live<i64>> {
        self.store.watch_count()
    }
}

/// Runs `produce` on a dedicated thread and resolves the returned
/// handle with its output. Network work never touches the caller's
/// thread or the write pool.
fn spawn_fetch<T: Send + 'static>(
    op: &str,
    produce: impl FnOnce() -> T + Send + 'static,
) -> Fetch<T> {
    let (sender, fetch) = fetch::pair();
    let spawned = Builder::new()
        .name(format!("mealbook-api-{op}"))
        .spawn(move || sender.resolve(produce()));
    if let Err(err) = spawned {
        // The handle stays unresolved; waiting callers read that as
        // an absent result.
        error!("event=api_dispatch module=service op={op} status=error error={err}");
    }
    fetch
}

fn list_or_empty(op: &str, result: ApiResult<MealsResponse>) -> Vec<Recipe> {
    match result {
        Ok(response) if response.has_results() => {
            debug!(
                "event=repo_remote module=service op={op} status=ok count={}",
                response.count()
            );
            response.into_recipes()
        }
        Ok(_) => {
            debug!("event=repo_remote module=service op={op} status=empty");
            Vec::new()
        }
        Err(err) => {
            error!("event=repo_remote module=service op={op} status=error error={err}");
            Vec::new()
        }
    }
}

fn first_or_none(op: &str, result: ApiResult<MealsResponse>) -> Option<Recipe> {
    list_or_empty(op, result).into_iter().next()
}

fn log_write(op: &str, id: &str, outcome: RepoResult<()>) {
    match outcome {
        Ok(()) => debug!("event=repo_write module=service op={op} id={id} status=ok"),
        Err(err) => {
            error!("event=repo_write module=service op={op} id={id} status=error error={err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{first_or_none, list_or_empty};
    use crate::api::meal_api::ApiError;
    use crate::model::recipe::{MealsResponse, Recipe};

    fn envelope(ids: &[&str]) -> MealsResponse {
        MealsResponse {
            meals: Some(ids.iter().map(|id| Recipe::with_id(*id)).collect()),
        }
    }

    #[test]
    fn failures_and_zero_results_collapse_to_empty() {
        assert!(list_or_empty("t", Ok(MealsResponse { meals: None })).is_empty());
        assert!(list_or_empty("t", Err(ApiError::Status { code: 500 })).is_empty());
        assert!(list_or_empty("t", Err(ApiError::Transport("refused".into()))).is_empty());
    }

    #[test]
    fn results_pass_through_in_order() {
        let recipes = list_or_empty("t", Ok(envelope(&["1", "2"])));
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].id, "1");
    }

    #[test]
    fn first_or_none_takes_the_first_result() {
        assert_eq!(first_or_none("t", Ok(envelope(&["9", "8"]))).unwrap().id, "9");
        assert!(first_or_none("t", Ok(MealsResponse { meals: None })).is_none());
    }
}
