//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::copy::CopyLocation;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub isbn: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Book with its author name and copy counts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
    pub isbn: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub total_count: i64,
    pub available_count: i64,
}

/// Book summary plus where each copy is held
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: BookSummary,
    pub copies_by_library: Vec<CopyLocation>,
}

/// Book listing parameters
#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    #[validate(range(min = 0, message = "skip must not be negative"))]
    pub skip: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub author_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 500, message = "Title must be 1 to 500 characters"))]
    pub title: String,
    pub author_id: i32,
    #[validate(length(min = 10, max = 13, message = "ISBN must be 10 to 13 characters"))]
    pub isbn: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    #[validate(length(max = 500, message = "Cover URL must be at most 500 characters"))]
    pub cover_url: Option<String>,
}

/// Partial update, absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 500, message = "Title must be 1 to 500 characters"))]
    pub title: Option<String>,
    pub author_id: Option<i32>,
    #[validate(length(min = 10, max = 13, message = "ISBN must be 10 to 13 characters"))]
    pub isbn: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    #[validate(length(max = 500, message = "Cover URL must be at most 500 characters"))]
    pub cover_url: Option<String>,
}
