//! HTTP handlers for `/api/authors`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bookstore_http::error::AppError;
use serde_json::json;

use super::models::{AuthorCreateDto, AuthorReadOnlyDto, AuthorUpdateDto};
use super::service::{AuthorError, AuthorService};
use super::MODULE_NAME;

/// Routes relative to the module mount point.
pub fn router(service: AuthorService) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .with_state(service)
}

async fn list_authors(
    State(service): State<AuthorService>,
) -> Result<Json<Vec<AuthorReadOnlyDto>>, AppError> {
    let authors = service
        .list()
        .await
        .map_err(into_app_error("list_authors"))?;
    Ok(Json(authors))
}

async fn get_author(
    State(service): State<AuthorService>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<AuthorReadOnlyDto>, AppError> {
    let id = path_id(path)?;
    let author = service
        .get(id)
        .await
        .map_err(into_app_error("get_author"))?;
    Ok(Json(author))
}

async fn create_author(
    State(service): State<AuthorService>,
    payload: Result<Json<AuthorCreateDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(dto) = payload.map_err(body_rejected)?;
    let created = service
        .create(dto)
        .await
        .map_err(into_app_error("create_author"))?;

    let location = format!("/api/{}/{}", MODULE_NAME, created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

async fn update_author(
    State(service): State<AuthorService>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<AuthorUpdateDto>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path)?;
    let Json(dto) = payload.map_err(body_rejected)?;
    service
        .update(id, dto)
        .await
        .map_err(into_app_error("update_author"))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_author(
    State(service): State<AuthorService>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path)?;
    service
        .delete(id)
        .await
        .map_err(into_app_error("delete_author"))?;
    Ok(StatusCode::NO_CONTENT)
}

fn path_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => Err(AppError::validation(
            vec![json!({"field": "id", "error": rejection.body_text()})],
            "author id must be an integer",
        )),
    }
}

fn body_rejected(rejection: JsonRejection) -> AppError {
    AppError::validation(
        vec![json!({"field": "body", "error": rejection.body_text()})],
        "request body is not a valid author payload",
    )
}

fn into_app_error(action: &'static str) -> impl Fn(AuthorError) -> AppError {
    move |err| match err {
        AuthorError::NotFound(id) => AppError::not_found(format!("author {} not found", id)),
        AuthorError::IdMismatch { path, body } => AppError::validation(
            vec![json!({"field": "id", "error": "must match the id in the path", "path": path, "payload": body})],
            "invalid record id",
        ),
        AuthorError::Failure(cause) => {
            AppError::Internal(cause.context(format!("error performing {}", action)))
        }
        conflict @ AuthorError::Conflict(_) => AppError::Internal(
            anyhow::Error::new(conflict).context(format!("error performing {}", action)),
        ),
    }
}
