//! Staff user (credential) model and requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Staff account as stored
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StaffUser {
    pub id: i32,
    pub username: String,
    /// Argon2 PHC digest, never serialized
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub library_id: Option<i32>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Row to insert, password already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaffUser {
    pub username: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub library_id: Option<i32>,
    pub is_active: bool,
    pub is_admin: bool,
}

/// Register staff user request (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterStaffUser {
    #[validate(length(min = 3, max = 100, message = "Username must be 3 to 100 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub full_name: Option<String>,
    pub library_id: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
}

fn default_true() -> bool {
    true
}

/// Update own profile request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(max = 255, message = "Full name must be at most 255 characters"))]
    pub full_name: Option<String>,
    /// Current password (required to change password)
    pub current_password: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: Option<String>,
}
