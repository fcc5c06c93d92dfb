//! Favorite-recipe repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and query APIs over the `favorite_recipes`
//!   table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `FavoriteRecipe::validate()` before SQL runs.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Insertion uses replace semantics on the primary key: saving an
//!   existing id overwrites the prior row entirely.
//! - List queries order by `date_added DESC`, tie-broken by `id` for
//!   deterministic pagination.

use crate::db::DbError;
use crate::model::favorite::{validate_rating, FavoriteRecipe, FavoriteValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FAVORITE_SELECT_SQL: &str = "SELECT
    id,
    name,
    image_url,
    category,
    area,
    instructions,
    ingredients,
    video_url,
    user_notes,
    rating,
    date_added
FROM favorite_recipes";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "name",
    "image_url",
    "category",
    "area",
    "instructions",
    "ingredients",
    "video_url",
    "user_notes",
    "rating",
    "date_added",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for favorite persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(FavoriteValidationError),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "favorite recipe not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted favorite data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FavoriteValidationError> for RepoError {
    fn from(value: FavoriteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for favorite-recipe operations.
pub trait FavoriteRepository {
    /// Upserts by primary key; an existing id is fully replaced.
    fn insert_or_replace(&self, favorite: &FavoriteRecipe) -> RepoResult<()>;
    /// Full-row update by primary key; `NotFound` when absent.
    fn update(&self, favorite: &FavoriteRecipe) -> RepoResult<()>;
    /// Partial update of the two overlay columns. Returns whether a
    /// row changed; a missing id is a silent no-op.
    fn update_notes_and_rating(&self, id: &str, notes: &str, rating: f32) -> RepoResult<bool>;
    /// Removes the row for the key. Returns whether a row existed.
    fn delete(&self, id: &str) -> RepoResult<bool>;
    /// Clears the table, returning the number of removed rows.
    fn delete_all(&self) -> RepoResult<usize>;
    /// Synchronous existence check; callers keep this off the
    /// UI-owning thread.
    fn exists(&self, id: &str) -> RepoResult<bool>;
    fn get_by_id(&self, id: &str) -> RepoResult<Option<FavoriteRecipe>>;
    /// All favorites, most recently added first.
    fn list_all(&self) -> RepoResult<Vec<FavoriteRecipe>>;
    /// Case-insensitive substring match on name, newest first.
    fn search(&self, term: &str) -> RepoResult<Vec<FavoriteRecipe>>;
    /// Exact category match, newest first.
    fn list_by_category(&self, category: &str) -> RepoResult<Vec<FavoriteRecipe>>;
    /// Favorites with `rating >= min_rating`, best first, ties newest
    /// first.
    fn top_rated(&self, min_rating: f32) -> RepoResult<Vec<FavoriteRecipe>>;
    fn count(&self) -> RepoResult<i64>;
}

/// SQLite-backed favorite repository.
pub struct SqliteFavoriteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFavoriteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl FavoriteRepository for SqliteFavoriteRepository<'_> {
    fn insert_or_replace(&self, favorite: &FavoriteRecipe) -> RepoResult<()> {
        favorite.validate()?;

        self.conn.execute(
            "INSERT OR REPLACE INTO favorite_recipes (
                id,
                name,
                image_url,
                category,
                area,
                instructions,
                ingredients,
                video_url,
                user_notes,
                rating,
                date_added
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                favorite.id.as_str(),
                favorite.name.as_deref(),
                favorite.image_url.as_deref(),
                favorite.category.as_deref(),
                favorite.area.as_deref(),
                favorite.instructions.as_deref(),
                favorite.ingredients.as_str(),
                favorite.video_url.as_deref(),
                favorite.user_notes.as_str(),
                f64::from(favorite.rating),
                favorite.date_added,
            ],
        )?;

        Ok(())
    }

    fn update(&self, favorite: &FavoriteRecipe) -> RepoResult<()> {
        favorite.validate()?;

        let changed = self.conn.execute(
            "UPDATE favorite_recipes
             SET
                name = ?2,
                image_url = ?3,
                category = ?4,
                area = ?5,
                instructions = ?6,
                ingredients = ?7,
                video_url = ?8,
                user_notes = ?9,
                rating = ?10,
                date_added = ?11
             WHERE id = ?1;",
            params![
                favorite.id.as_str(),
                favorite.name.as_deref(),
                favorite.image_url.as_deref(),
                favorite.category.as_deref(),
                favorite.area.as_deref(),
                favorite.instructions.as_deref(),
                favorite.ingredients.as_str(),
                favorite.video_url.as_deref(),
                favorite.user_notes.as_str(),
                f64::from(favorite.rating),
                favorite.date_added,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(favorite.id.clone()));
        }

        Ok(())
    }

    fn update_notes_and_rating(&self, id: &str, notes: &str, rating: f32) -> RepoResult<bool> {
        validate_rating(rating)?;

        let changed = self.conn.execute(
            "UPDATE favorite_recipes
             SET user_notes = ?2, rating = ?3
             WHERE id = ?1;",
            params![id, notes, f64::from(rating)],
        )?;

        Ok(changed > 0)
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM favorite_recipes WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete_all(&self) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM favorite_recipes;", [])?;
        Ok(changed)
    }

    fn exists(&self, id: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorite_recipes WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<FavoriteRecipe>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FAVORITE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_favorite_row(row)?));
        }

        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<FavoriteRecipe>> {
        self.query_rows(
            &format!("{FAVORITE_SELECT_SQL} ORDER BY date_added DESC, id ASC;"),
            params![],
        )
    }

    fn search(&self, term: &str) -> RepoResult<Vec<FavoriteRecipe>> {
        self.query_rows(
            &format!(
                "{FAVORITE_SELECT_SQL}
                 WHERE name LIKE '%' || ?1 || '%'
                 ORDER BY date_added DESC, id ASC;"
            ),
            params![term],
        )
    }

    fn list_by_category(&self, category: &str) -> RepoResult<Vec<FavoriteRecipe>> {
        self.query_rows(
            &format!(
                "{FAVORITE_SELECT_SQL}
                 WHERE category = ?1
                 ORDER BY date_added DESC, id ASC;"
            ),
            params![category],
        )
    }

    fn top_rated(&self, min_rating: f32) -> RepoResult<Vec<FavoriteRecipe>> {
        self.query_rows(
            &format!(
                "{FAVORITE_SELECT_SQL}
                 WHERE rating >= ?1
                 ORDER BY rating DESC, date_added DESC, id ASC;"
            ),
            params![f64::from(min_rating)],
        )
    }

    fn count(&self) -> RepoResult<i64> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM favorite_recipes;", [], |row| {
                    row.get(0)
                })?;
        Ok(count)
    }
}

impl SqliteFavoriteRepository<'_> {
    fn query_rows(
        &self,
        sql: &str,
        bind: impl rusqlite::Params,
    ) -> RepoResult<Vec<FavoriteRecipe>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut favorites = Vec::new();
        while let Some(row) = rows.next()? {
            favorites.push(parse_favorite_row(row)?);
        }
        Ok(favorites)
    }
}

fn parse_favorite_row(row: &Row<'_>) -> RepoResult<FavoriteRecipe> {
    let rating = row.get::<_, f64>("rating")? as f32;

    let favorite = FavoriteRecipe {
        id: row.get("id")?,
        name: row.get("name")?,
        image_url: row.get("image_url")?,
        category: row.get("category")?,
        area: row.get("area")?,
        instructions: row.get("instructions")?,
        ingredients: row.get("ingredients")?,
        video_url: row.get("video_url")?,
        user_notes: row.get("user_notes")?,
        rating,
        date_added: row.get("date_added")?,
    };
    favorite
        .validate()
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    Ok(favorite)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected = crate::db::migrations::latest_version();
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual == 0 {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }

    if !table_exists(conn, "favorite_recipes")? {
        return Err(RepoError::MissingRequiredTable("favorite_recipes"));
    }

    for column in REQUIRED_COLUMNS.iter().copied() {
        if !table_has_column(conn, "favorite_recipes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "favorite_recipes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
