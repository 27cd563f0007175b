//! Authentication endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Form, Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::TokenPair,
    error::{AppError, AppResult},
    models::staff_user::{RegisterStaffUser, StaffUser, UpdateProfile},
    AppState,
};

use super::{AdminStaff, CurrentStaff};

/// OAuth2 password-grant style login form
#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RefreshParams {
    /// Refresh token obtained at login
    pub refresh_token: Option<String>,
}

/// Authenticate with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenPair),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<TokenPair>> {
    let pair = state.services.auth.login(&form.username, &form.password).await?;
    Ok(Json(pair))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    params(RefreshParams),
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 401, description = "Invalid or expired refresh token", body = crate::error::ErrorResponse)
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> AppResult<Json<TokenPair>> {
    let token = params.refresh_token.ok_or(AppError::Unauthenticated)?;
    let pair = state.services.auth.refresh(&token).await?;
    Ok(Json(pair))
}

/// Get the authenticated staff user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current staff user", body = StaffUser),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Account inactive", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(CurrentStaff(user): CurrentStaff) -> Json<StaffUser> {
    Json(user)
}

/// Update own name or password
#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = StaffUser),
        (status = 400, description = "Invalid input or wrong current password", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(profile): Json<UpdateProfile>,
) -> AppResult<Json<StaffUser>> {
    let updated = state.services.auth.update_profile(&user, profile).await?;
    Ok(Json(updated))
}

/// Register a new staff user (admin only)
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = RegisterStaffUser,
    responses(
        (status = 201, description = "Staff user created", body = StaffUser),
        (status = 400, description = "Username already registered or invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AdminStaff(_admin): AdminStaff,
    Json(new_user): Json<RegisterStaffUser>,
) -> AppResult<(StatusCode, Json<StaffUser>)> {
    let created = state.services.auth.register(new_user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
