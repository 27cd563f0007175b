//! Staff users repository, the credential store behind authentication

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::staff_user::{NewStaffUser, StaffUser},
};

/// Persistent credential lookups used by the auth service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<StaffUser>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<StaffUser>>;

    /// Insert a new credential. A taken username yields `AppError::UsernameTaken`.
    async fn insert(&self, user: NewStaffUser) -> AppResult<StaffUser>;

    /// Overwrite the given profile fields, leaving `None` fields untouched
    async fn update_profile(
        &self,
        id: i32,
        full_name: Option<String>,
        hashed_password: Option<String>,
    ) -> AppResult<StaffUser>;
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UsersRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<StaffUser>> {
        let user = sqlx::query_as::<_, StaffUser>("SELECT * FROM staff_users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<StaffUser>> {
        let user = sqlx::query_as::<_, StaffUser>("SELECT * FROM staff_users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewStaffUser) -> AppResult<StaffUser> {
        sqlx::query_as::<_, StaffUser>(
            r#"
            INSERT INTO staff_users (username, hashed_password, full_name, library_id, is_active, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.hashed_password)
        .bind(&user.full_name)
        .bind(user.library_id)
        .bind(user.is_active)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::UsernameTaken
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn update_profile(
        &self,
        id: i32,
        full_name: Option<String>,
        hashed_password: Option<String>,
    ) -> AppResult<StaffUser> {
        sqlx::query_as::<_, StaffUser>(
            r#"
            UPDATE staff_users
            SET full_name = COALESCE($2, full_name),
                hashed_password = COALESCE($3, hashed_password)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(full_name)
        .bind(hashed_password)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Staff user with id {} not found", id)))
    }
}
