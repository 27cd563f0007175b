//! Libraries repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::library::{CreateLibrary, Library, UpdateLibrary},
};

#[derive(Clone)]
pub struct LibrariesRepository {
    pool: Pool<Postgres>,
}

impl LibrariesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Library>> {
        let libraries = sqlx::query_as::<_, Library>("SELECT * FROM libraries ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(libraries)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Library>> {
        let library = sqlx::query_as::<_, Library>("SELECT * FROM libraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(library)
    }

    pub async fn create(&self, library: &CreateLibrary) -> AppResult<Library> {
        let created = sqlx::query_as::<_, Library>(
            r#"
            INSERT INTO libraries (name, address, phone, work_hours)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&library.name)
        .bind(&library.address)
        .bind(&library.phone)
        .bind(&library.work_hours)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Returns `None` when no library has this id
    pub async fn update(&self, id: i32, library: &UpdateLibrary) -> AppResult<Option<Library>> {
        let updated = sqlx::query_as::<_, Library>(
            r#"
            UPDATE libraries
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                work_hours = COALESCE($5, work_hours)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&library.name)
        .bind(&library.address)
        .bind(&library.phone)
        .bind(&library.work_hours)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    /// Returns whether a row was deleted
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM libraries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
