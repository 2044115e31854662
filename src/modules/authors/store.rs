//! Persistence gateway for authors.
//!
//! Reads go straight to the database. Writes are staged in a [`ChangeSet`]
//! and applied atomically by [`AuthorGateway::commit`].

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

use super::models::Author;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// A staged write matched no row: the author changed or vanished after it was read.
    #[error("concurrency conflict on author {id}: expected 1 affected row, got {affected}")]
    Conflict { id: i32, affected: u64 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Add(Author),
    Modify(Author),
    Remove(i32),
}

/// Pending writes for a single commit.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an insert; the id is assigned on commit.
    pub fn add(&mut self, author: Author) {
        self.changes.push(Change::Add(author));
    }

    /// Stage a full overwrite of an existing author.
    pub fn modify(&mut self, author: Author) {
        self.changes.push(Change::Modify(author));
    }

    pub fn remove(&mut self, author: &Author) {
        self.changes.push(Change::Remove(author.id));
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// What a commit produced.
#[derive(Debug, Default)]
pub struct Committed {
    /// Staged additions in order, with their assigned ids.
    pub added: Vec<Author>,
}

#[async_trait]
pub trait AuthorGateway: Send + Sync {
    async fn find_by_id(&self, id: i32) -> GatewayResult<Option<Author>>;

    async fn list_all(&self) -> GatewayResult<Vec<Author>>;

    async fn exists(&self, id: i32) -> GatewayResult<bool>;

    /// Apply every staged change in one transaction, or none of them.
    async fn commit(&self, changes: ChangeSet) -> GatewayResult<Committed>;
}

/// [`AuthorGateway`] over the `authors` table.
#[derive(Clone)]
pub struct SqlAuthorGateway {
    pool: SqlitePool,
}

impl SqlAuthorGateway {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorGateway for SqlAuthorGateway {
    async fn find_by_id(&self, id: i32) -> GatewayResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, last_name, bio FROM authors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    async fn list_all(&self) -> GatewayResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, last_name, bio FROM authors ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn exists(&self, id: i32) -> GatewayResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    async fn commit(&self, changes: ChangeSet) -> GatewayResult<Committed> {
        let mut committed = Committed::default();
        if changes.is_empty() {
            return Ok(committed);
        }

        // Dropping the transaction on any early return rolls it back.
        let mut tx = self.pool.begin().await?;

        for change in changes.changes {
            match change {
                Change::Add(mut author) => {
                    let result = sqlx::query(
                        "INSERT INTO authors (first_name, last_name, bio) VALUES (?, ?, ?)",
                    )
                    .bind(&author.first_name)
                    .bind(&author.last_name)
                    .bind(&author.bio)
                    .execute(&mut *tx)
                    .await?;

                    author.id = i32::try_from(result.last_insert_rowid()).map_err(|_| {
                        sqlx::Error::Decode(
                            format!(
                                "author id {} does not fit in i32",
                                result.last_insert_rowid()
                            )
                            .into(),
                        )
                    })?;
                    committed.added.push(author);
                }
                Change::Modify(author) => {
                    let result = sqlx::query(
                        "UPDATE authors SET first_name = ?, last_name = ?, bio = ? WHERE id = ?",
                    )
                    .bind(&author.first_name)
                    .bind(&author.last_name)
                    .bind(&author.bio)
                    .bind(author.id)
                    .execute(&mut *tx)
                    .await?;

                    expect_one_row(author.id, result.rows_affected())?;
                }
                Change::Remove(id) => {
                    let result = sqlx::query("DELETE FROM authors WHERE id = ?")
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;

                    expect_one_row(id, result.rows_affected())?;
                }
            }
        }

        tx.commit().await?;
        Ok(committed)
    }
}

fn expect_one_row(id: i32, affected: u64) -> GatewayResult<()> {
    if affected == 1 {
        Ok(())
    } else {
        Err(GatewayError::Conflict { id, affected })
    }
}

/// Table definition contributed as the module's first migration.
pub const CREATE_AUTHORS_TABLE: &str = r#"
    CREATE TABLE authors (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name  TEXT NOT NULL,
        bio        TEXT NULL
    );
"#;
