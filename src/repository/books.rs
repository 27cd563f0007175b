//! Books repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::{
        book::{Book, BookQuery, BookSummary, CreateBook, UpdateBook},
        copy::CopyLocation,
    },
};

const SUMMARY_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id, a.name AS author_name, b.isbn, b.year,
           b.description, b.cover_url, b.created_at, b.updated_at,
           COUNT(c.id) AS total_count,
           COUNT(c.id) FILTER (WHERE c.status = 'available') AS available_count
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
    LEFT JOIN copies c ON c.book_id = b.id
"#;

fn isbn_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict("A book with this ISBN already exists".to_string())
    } else {
        AppError::Database(e)
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Newest first, optionally restricted to one author
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<BookSummary>> {
        let sql = format!(
            r#"
            {}
            WHERE ($1::INT IS NULL OR b.author_id = $1)
            GROUP BY b.id, a.name
            ORDER BY b.created_at DESC, b.id DESC
            LIMIT $2 OFFSET $3
            "#,
            SUMMARY_SELECT
        );

        let books = sqlx::query_as::<_, BookSummary>(&sql)
            .bind(query.author_id)
            .bind(query.limit.unwrap_or(20))
            .bind(query.skip.unwrap_or(0))
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    pub async fn get_summary(&self, id: i32) -> AppResult<Option<BookSummary>> {
        let sql = format!("{} WHERE b.id = $1 GROUP BY b.id, a.name", SUMMARY_SELECT);
        let book = sqlx::query_as::<_, BookSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn copies_by_library(&self, book_id: i32) -> AppResult<Vec<CopyLocation>> {
        let copies = sqlx::query_as::<_, CopyLocation>(
            r#"
            SELECT c.library_id, l.name AS library_name, c.inventory_number, c.status
            FROM copies c
            JOIN libraries l ON l.id = c.library_id
            WHERE c.book_id = $1
            ORDER BY l.name, c.inventory_number
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author_id, isbn, year, description, cover_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(&book.isbn)
        .bind(book.year)
        .bind(&book.description)
        .bind(&book.cover_url)
        .fetch_one(&self.pool)
        .await
        .map_err(isbn_conflict)
    }

    /// Returns `None` when no book has this id
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author_id = COALESCE($3, author_id),
                isbn = COALESCE($4, isbn),
                year = COALESCE($5, year),
                description = COALESCE($6, description),
                cover_url = COALESCE($7, cover_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(book.author_id)
        .bind(&book.isbn)
        .bind(book.year)
        .bind(&book.description)
        .bind(&book.cover_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(isbn_conflict)
    }

    /// Copies go with the book (ON DELETE CASCADE)
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
