//! Field copies between the author entity and its DTOs.

use super::models::{Author, AuthorCreateDto, AuthorReadOnlyDto, AuthorUpdateDto};

impl From<AuthorCreateDto> for Author {
    fn from(dto: AuthorCreateDto) -> Self {
        Self {
            id: 0,
            first_name: dto.first_name,
            last_name: dto.last_name,
            bio: dto.bio,
        }
    }
}

impl From<&Author> for AuthorReadOnlyDto {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            bio: author.bio.clone(),
        }
    }
}

impl From<Author> for AuthorReadOnlyDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            bio: author.bio,
        }
    }
}

/// Overwrite every mutable field of `author` from `dto`.
///
/// `author.id` is left alone: callers have already matched `dto.id` against it.
pub fn apply_update(dto: AuthorUpdateDto, author: &mut Author) {
    author.first_name = dto.first_name;
    author.last_name = dto.last_name;
    author.bio = dto.bio;
}
