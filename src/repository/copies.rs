//! Copies repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::copy::{CopyDetails, CreateCopy, UpdateCopy},
};

const DETAILS_SELECT: &str = r#"
    SELECT c.id, c.book_id, c.library_id, c.inventory_number, c.status, c.created_at,
           l.name AS library_name, b.title AS book_title
    FROM copies c
    LEFT JOIN libraries l ON l.id = c.library_id
    LEFT JOIN books b ON b.id = c.book_id
"#;

fn inventory_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict("Inventory number already in use".to_string())
    } else {
        AppError::Database(e)
    }
}

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<CopyDetails>> {
        let sql = format!("{} WHERE c.book_id = $1 ORDER BY c.inventory_number", DETAILS_SELECT);
        let copies = sqlx::query_as::<_, CopyDetails>(&sql)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(copies)
    }

    pub async fn get_details(&self, id: i32) -> AppResult<Option<CopyDetails>> {
        let sql = format!("{} WHERE c.id = $1", DETAILS_SELECT);
        let copy = sqlx::query_as::<_, CopyDetails>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(copy)
    }

    /// Returns the new copy id
    pub async fn create(&self, book_id: i32, copy: &CreateCopy) -> AppResult<i32> {
        sqlx::query_scalar(
            r#"
            INSERT INTO copies (book_id, library_id, inventory_number, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(book_id)
        .bind(copy.library_id)
        .bind(&copy.inventory_number)
        .bind(copy.status)
        .fetch_one(&self.pool)
        .await
        .map_err(inventory_conflict)
    }

    /// Returns whether a row was updated
    pub async fn update(&self, id: i32, copy: &UpdateCopy) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE copies
            SET library_id = COALESCE($2, library_id),
                inventory_number = COALESCE($3, inventory_number),
                status = COALESCE($4, status)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(copy.library_id)
        .bind(&copy.inventory_number)
        .bind(copy.status)
        .execute(&self.pool)
        .await
        .map_err(inventory_conflict)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM copies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
