//! Physical copy endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::copy::{CopyDetails, CreateCopy, UpdateCopy},
    AppState,
};

use super::CurrentStaff;

/// List copies of a book
#[utoipa::path(
    get,
    path = "/books/{id}/copies",
    tag = "copies",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Copies of the book", body = Vec<CopyDetails>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_copies(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<CopyDetails>>> {
    let copies = state.services.catalog.list_copies(book_id).await?;
    Ok(Json(copies))
}

/// Add a copy of a book to a library
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateCopy,
    responses(
        (status = 201, description = "Copy created", body = CopyDetails),
        (status = 400, description = "Invalid input or unknown library", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Inventory number already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_copy(
    State(state): State<AppState>,
    CurrentStaff(_staff): CurrentStaff,
    Path(book_id): Path<i32>,
    Json(copy): Json<CreateCopy>,
) -> AppResult<(StatusCode, Json<CopyDetails>)> {
    let created = state.services.catalog.create_copy(book_id, copy).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a copy (status, location or inventory number)
#[utoipa::path(
    put,
    path = "/books/copies/{id}",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Copy ID")
    ),
    request_body = UpdateCopy,
    responses(
        (status = 200, description = "Copy updated", body = CopyDetails),
        (status = 400, description = "Invalid input or unknown library", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_copy(
    State(state): State<AppState>,
    CurrentStaff(_staff): CurrentStaff,
    Path(id): Path<i32>,
    Json(copy): Json<UpdateCopy>,
) -> AppResult<Json<CopyDetails>> {
    let updated = state.services.catalog.update_copy(id, copy).await?;
    Ok(Json(updated))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/books/copies/{id}",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Copy ID")
    ),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_copy(
    State(state): State<AppState>,
    CurrentStaff(_staff): CurrentStaff,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_copy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
