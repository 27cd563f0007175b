//! Library (branch) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::library::{CreateLibrary, Library, UpdateLibrary},
    AppState,
};

use super::CurrentStaff;

/// List all libraries
#[utoipa::path(
    get,
    path = "/libraries",
    tag = "libraries",
    responses(
        (status = 200, description = "List of libraries", body = Vec<Library>)
    )
)]
pub async fn list_libraries(State(state): State<AppState>) -> AppResult<Json<Vec<Library>>> {
    let libraries = state.services.catalog.list_libraries().await?;
    Ok(Json(libraries))
}

/// Get library by ID
#[utoipa::path(
    get,
    path = "/libraries/{id}",
    tag = "libraries",
    params(
        ("id" = i32, Path, description = "Library ID")
    ),
    responses(
        (status = 200, description = "Library details", body = Library),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_library(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Library>> {
    let library = state.services.catalog.get_library(id).await?;
    Ok(Json(library))
}

/// Create a library
#[utoipa::path(
    post,
    path = "/libraries",
    tag = "libraries",
    security(("bearer_auth" = [])),
    request_body = CreateLibrary,
    responses(
        (status = 201, description = "Library created", body = Library),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_library(
    State(state): State<AppState>,
    CurrentStaff(_staff): CurrentStaff,
    Json(library): Json<CreateLibrary>,
) -> AppResult<(StatusCode, Json<Library>)> {
    let created = state.services.catalog.create_library(library).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a library
#[utoipa::path(
    put,
    path = "/libraries/{id}",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Library ID")
    ),
    request_body = UpdateLibrary,
    responses(
        (status = 200, description = "Library updated", body = Library),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_library(
    State(state): State<AppState>,
    CurrentStaff(_staff): CurrentStaff,
    Path(id): Path<i32>,
    Json(library): Json<UpdateLibrary>,
) -> AppResult<Json<Library>> {
    let updated = state.services.catalog.update_library(id, library).await?;
    Ok(Json(updated))
}

/// Delete a library and its copies
#[utoipa::path(
    delete,
    path = "/libraries/{id}",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Library ID")
    ),
    responses(
        (status = 204, description = "Library deleted"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_library(
    State(state): State<AppState>,
    CurrentStaff(_staff): CurrentStaff,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_library(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
