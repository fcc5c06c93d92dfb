//! Observable favorites store.
//!
//! # Responsibility
//! - Own the process-wide SQLite connection for favorites (single
//!   writer).
//! - Run every write through the repository contract and refresh all
//!   registered live queries after a row-changing commit.
//!
//! # Invariants
//! - Lock order is always connection, then watcher registry.
//! - Watchers are refreshed only after the triggering write committed.
//! - Dead subscriptions are pruned on the next notification sweep.

pub mod live;

use crate::db::{open_db, open_db_in_memory};
use crate::model::favorite::FavoriteRecipe;
use crate::repo::favorite_repo::{FavoriteRepository, RepoResult, SqliteFavoriteRepository};
use live::Live;
use log::error;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Re-runs one live query against the connection; returns false once
/// its consumer is gone.
type Refresher = Box<dyn FnMut(&Connection) -> bool + Send>;

/// Cloneable handle to the favorites collection.
///
/// All clones share one connection and one watcher registry; the
/// store is the sole writer of the persisted collection.
#[derive(Clone)]
pub struct FavoritesStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    conn: Mutex<Connection>,
    watchers: Mutex<Vec<Refresher>>,
}

impl FavoritesStore {
    /// Opens (and migrates) the store at the given file path.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens an in-memory store, for tests and ephemeral sessions.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        SqliteFavoriteRepository::try_new(&conn)?;
        Ok(Self {
            inner: Arc::new(StoreInner {
                conn: Mutex::new(conn),
                watchers: Mutex::new(Vec::new()),
            }),
        })
    }

    // ---- writes -------------------------------------------------

    /// Upserts a favorite and refreshes live queries.
    pub fn insert_or_replace(&self, favorite: &FavoriteRecipe) -> RepoResult<()> {
        self.write(|repo| repo.insert_or_replace(favorite).map(|()| ((), true)))
    }

    /// Full-row update; `NotFound` when the id is absent.
    pub fn update(&self, favorite: &FavoriteRecipe) -> RepoResult<()> {
        self.write(|repo| repo.update(favorite).map(|()| ((), true)))
    }

    /// Partial overlay update; silent no-op (and no refresh) when the
    /// id is absent.
    pub fn update_notes_and_rating(
        &self,
        id: &str,
        notes: &str,
        rating: f32,
    ) -> RepoResult<bool> {
        self.write(|repo| {
            let changed = repo.update_notes_and_rating(id, notes, rating)?;
            Ok((changed, changed))
        })
    }

    /// Deletes one favorite; refreshes only when a row existed.
    pub fn delete(&self, id: &str) -> RepoResult<bool> {
        self.write(|repo| {
            let removed = repo.delete(id)?;
            Ok((removed, removed))
        })
    }

    /// Clears the collection; refreshes only when rows were removed.
    pub fn delete_all(&self) -> RepoResult<usize> {
        self.write(|repo| {
            let removed = repo.delete_all()?;
            Ok((removed, removed > 0))
        })
    }

    // ---- one-shot reads -----------------------------------------

    pub fn exists(&self, id: &str) -> RepoResult<bool> {
        self.read(|repo| repo.exists(id))
    }

    pub fn get_by_id(&self, id: &str) -> RepoResult<Option<FavoriteRecipe>> {
        self.read(|repo| repo.get_by_id(id))
    }

    pub fn list_all(&self) -> RepoResult<Vec<FavoriteRecipe>> {
        self.read(|repo| repo.list_all())
    }

    pub fn search(&self, term: &str) -> RepoResult<Vec<FavoriteRecipe>> {
        self.read(|repo| repo.search(term))
    }

    pub fn list_by_category(&self, category: &str) -> RepoResult<Vec<FavoriteRecipe>> {
        self.read(|repo| repo.list_by_category(category))
    }

    pub fn top_rated(&self, min_rating: f32) -> RepoResult<Vec<FavoriteRecipe>> {
        self.read(|repo| repo.top_rated(min_rating))
    }

    pub fn count(&self) -> RepoResult<i64> {
        self.read(|repo| repo.count())
    }

    // ---- live queries -------------------------------------------

    /// All favorites, newest first, refreshed after every change.
    pub fn watch_all(&self) -> RepoResult<Live<Vec<FavoriteRecipe>>> {
        self.watch(|repo| repo.list_all())
    }

    /// Zero-or-one favorite for the id.
    pub fn watch_by_id(&self, id: &str) -> RepoResult<Live<Option<FavoriteRecipe>>> {
        let id = id.to_string();
        self.watch(move |repo| repo.get_by_id(&id))
    }

    /// Case-insensitive name substring match, newest first.
    pub fn watch_search(&self, term: &str) -> RepoResult<Live<Vec<FavoriteRecipe>>> {
        let term = term.to_string();
        self.watch(move |repo| repo.search(&term))
    }

    /// Exact category match, newest first.
    pub fn watch_by_category(&self, category: &str) -> RepoResult<Live<Vec<FavoriteRecipe>>> {
        let category = category.to_string();
        self.watch(move |repo| repo.list_by_category(&category))
    }

    /// Favorites rated at or above `min_rating`, best first.
    pub fn watch_top_rated(&self, min_rating: f32) -> RepoResult<Live<Vec<FavoriteRecipe>>> {
        self.watch(move |repo| repo.top_rated(min_rating))
    }

    /// Total number of favorites.
    pub fn watch_count(&self) -> RepoResult<Live<i64>> {
        self.watch(|repo| repo.count())
    }

    // ---- internals ----------------------------------------------

    /// Runs a write under the connection lock. The op reports whether
    /// rows changed; watchers are refreshed only in that case, before
    /// the lock is released, so snapshots cannot interleave with a
    /// competing write.
    fn write<T>(
        &self,
        op: impl FnOnce(&SqliteFavoriteRepository<'_>) -> RepoResult<(T, bool)>,
    ) -> RepoResult<T> {
        let conn = lock(&self.inner.conn);
        let repo = SqliteFavoriteRepository::try_new(&conn)?;
        let (value, changed) = op(&repo)?;
        if changed {
            self.refresh_watchers(&conn);
        }
        Ok(value)
    }

    fn read<T>(
        &self,
        op: impl FnOnce(&SqliteFavoriteRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let conn = lock(&self.inner.conn);
        let repo = SqliteFavoriteRepository::try_new(&conn)?;
        op(&repo)
    }

    fn watch<T, F>(&self, mut query: F) -> RepoResult<Live<T>>
    where
        T: Clone + Send + 'static,
        F: FnMut(&SqliteFavoriteRepository<'_>) -> RepoResult<T> + Send + 'static,
    {
        let conn = lock(&self.inner.conn);
        let repo = SqliteFavoriteRepository::try_new(&conn)?;
        let initial = query(&repo)?;
        let (sender, live) = live::channel(initial);

        let mut watchers = lock(&self.inner.watchers);
        watchers.push(Box::new(move |conn: &Connection| {
            let repo = match SqliteFavoriteRepository::try_new(conn) {
                Ok(repo) => repo,
                Err(err) => {
                    error!("event=store_watch module=store status=error error={err}");
                    return true;
                }
            };
            match query(&repo) {
                Ok(snapshot) => sender.send(snapshot),
                Err(err) => {
                    error!("event=store_watch module=store status=error error={err}");
                    true
                }
            }
        }));

        Ok(live)
    }

    fn refresh_watchers(&self, conn: &Connection) {
        let mut watchers = lock(&self.inner.watchers);
        watchers.retain_mut(|refresh| refresh(conn));
    }
}

// A poisoned lock only means another thread panicked mid-operation;
// the connection itself stays usable, so recover the guard.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
