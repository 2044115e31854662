//! The CRUD lifecycle for authors: validate, fetch, mutate, commit.

use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;

use super::mapper;
use super::models::{Author, AuthorCreateDto, AuthorReadOnlyDto, AuthorUpdateDto};
use super::store::{AuthorGateway, ChangeSet, GatewayError};

#[derive(Debug, Error)]
pub enum AuthorError {
    #[error("author {0} not found")]
    NotFound(i32),

    #[error("path id {path} does not match payload id {body}")]
    IdMismatch { path: i32, body: i32 },

    #[error("author {0} was modified concurrently")]
    Conflict(i32),

    #[error(transparent)]
    Failure(#[from] anyhow::Error),
}

pub type AuthorResult<T> = Result<T, AuthorError>;

#[derive(Clone)]
pub struct AuthorService {
    gateway: Arc<dyn AuthorGateway>,
}

impl AuthorService {
    pub fn new(gateway: Arc<dyn AuthorGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> AuthorResult<Vec<AuthorReadOnlyDto>> {
        let authors = self
            .gateway
            .list_all()
            .await
            .context("failed to list authors")?;

        Ok(authors.into_iter().map(AuthorReadOnlyDto::from).collect())
    }

    pub async fn get(&self, id: i32) -> AuthorResult<AuthorReadOnlyDto> {
        let author = self.find("get_author", id).await?;
        Ok(author.into())
    }

    pub async fn create(&self, dto: AuthorCreateDto) -> AuthorResult<AuthorReadOnlyDto> {
        let mut changes = ChangeSet::new();
        changes.add(Author::from(dto));

        let committed = self
            .gateway
            .commit(changes)
            .await
            .context("failed to create author")?;

        let author = committed
            .added
            .into_iter()
            .next()
            .context("commit reported no created author")?;

        tracing::info!(action = "create_author", author_id = author.id, "author created");
        Ok(author.into())
    }

    /// Replace every field of author `id`.
    ///
    /// A conflicting commit is only forgiven when the author has since been
    /// deleted; any other conflict is returned as [`AuthorError::Conflict`].
    pub async fn update(&self, id: i32, dto: AuthorUpdateDto) -> AuthorResult<()> {
        if id != dto.id {
            tracing::warn!(
                action = "update_author",
                path_id = id,
                payload_id = dto.id,
                "invalid record id"
            );
            return Err(AuthorError::IdMismatch { path: id, body: dto.id });
        }

        let mut author = self.find("update_author", id).await?;
        mapper::apply_update(dto, &mut author);

        let mut changes = ChangeSet::new();
        changes.modify(author);

        match self.gateway.commit(changes).await {
            Ok(_) => Ok(()),
            Err(GatewayError::Conflict { .. }) => {
                let still_there = self
                    .gateway
                    .exists(id)
                    .await
                    .context("failed to re-check author after conflict")?;

                if still_there {
                    Err(AuthorError::Conflict(id))
                } else {
                    tracing::warn!(action = "update_author", author_id = id, "author not found");
                    Err(AuthorError::NotFound(id))
                }
            }
            Err(err) => Err(anyhow::Error::new(err)
                .context(format!("failed to update author {}", id))
                .into()),
        }
    }

    pub async fn delete(&self, id: i32) -> AuthorResult<()> {
        let author = self.find("delete_author", id).await?;

        let mut changes = ChangeSet::new();
        changes.remove(&author);

        self.gateway
            .commit(changes)
            .await
            .with_context(|| format!("failed to delete author {}", id))?;

        tracing::info!(action = "delete_author", author_id = id, "author deleted");
        Ok(())
    }

    async fn find(&self, action: &'static str, id: i32) -> AuthorResult<Author> {
        let author = self
            .gateway
            .find_by_id(id)
            .await
            .with_context(|| format!("failed to load author {}", id))?;

        author.ok_or_else(|| {
            tracing::warn!(action, author_id = id, "author not found");
            AuthorError::NotFound(id)
        })
    }
}
