use serde::{Deserialize, Serialize};

/// Persisted author record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Author {
    /// Assigned by the database on insert; `0` until the author is committed.
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Request body for `POST /api/authors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCreateDto {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Request body for `PUT /api/authors/{id}`; `id` must match the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorUpdateDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Response body for every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorReadOnlyDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}
