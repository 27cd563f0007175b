//! Catalog search queries

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::search::SearchResult,
};

/// Filters shared by simple and advanced search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Matched against title or author name
    pub text: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub library_id: Option<i32>,
    pub available_only: bool,
}

/// Wrap user text for ILIKE, escaping its wildcards
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Row offset of a 1-based page, `None` when out of range
pub fn page_offset(page: i64, per_page: i64) -> Option<i64> {
    if page < 1 || per_page < 1 {
        return None;
    }
    (page - 1).checked_mul(per_page)
}

#[derive(Clone)]
pub struct SearchRepository {
    pool: Pool<Postgres>,
}

impl SearchRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// One page of matching books ordered by title, plus the total match count
    pub async fn search(
        &self,
        filters: &SearchFilters,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<SearchResult>, i64)> {
        let offset = page_offset(page, per_page)
            .ok_or_else(|| AppError::Validation("Page out of range".to_string()))?;

        let mut count_builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM (SELECT b.id");
        Self::push_matching_books(&mut count_builder, filters);
        count_builder.push(") matched");
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT b.id, b.title, a.name AS author_name, b.year,
                   COUNT(c.id) FILTER (WHERE c.status = 'available') AS available_count,
                   COUNT(c.id) AS total_count
            "#,
        );
        Self::push_matching_books(&mut builder, filters);
        builder
            .push(" ORDER BY b.title, b.id LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind(offset);

        let results = builder
            .build_query_as::<SearchResult>()
            .fetch_all(&self.pool)
            .await?;

        Ok((results, total))
    }

    /// Titles containing `text`, alphabetical
    pub async fn matching_titles(&self, text: &str, limit: i64) -> AppResult<Vec<String>> {
        let titles = sqlx::query_scalar(
            "SELECT DISTINCT title FROM books WHERE title ILIKE $1 ORDER BY title LIMIT $2",
        )
        .bind(like_pattern(text))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(titles)
    }

    /// Author names containing `text`, alphabetical
    pub async fn matching_authors(&self, text: &str, limit: i64) -> AppResult<Vec<String>> {
        let names = sqlx::query_scalar(
            "SELECT name FROM authors WHERE name ILIKE $1 ORDER BY name LIMIT $2",
        )
        .bind(like_pattern(text))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    fn push_matching_books(builder: &mut QueryBuilder<'_, Postgres>, filters: &SearchFilters) {
        builder.push(
            r#"
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            LEFT JOIN copies c ON c.book_id = b.id
            WHERE TRUE
            "#,
        );

        if let Some(ref text) = filters.text {
            let pattern = like_pattern(text);
            builder
                .push(" AND (b.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR a.name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(ref title) = filters.title {
            builder.push(" AND b.title ILIKE ").push_bind(like_pattern(title));
        }
        if let Some(ref author) = filters.author {
            builder.push(" AND a.name ILIKE ").push_bind(like_pattern(author));
        }
        if let Some(year_from) = filters.year_from {
            builder.push(" AND b.year >= ").push_bind(year_from);
        }
        if let Some(year_to) = filters.year_to {
            builder.push(" AND b.year <= ").push_bind(year_to);
        }
        if let Some(library_id) = filters.library_id {
            builder.push(" AND c.library_id = ").push_bind(library_id);
        }

        builder.push(" GROUP BY b.id, a.name");

        if filters.available_only {
            builder.push(" HAVING COUNT(c.id) FILTER (WHERE c.status = 'available') > 0");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("Пушкин"), "%Пушкин%");
        assert_eq!(like_pattern("100%_done\\"), "%100\\%\\_done\\\\%");
    }

    #[test]
    fn page_offset_is_checked() {
        assert_eq!(page_offset(1, 20), Some(0));
        assert_eq!(page_offset(3, 20), Some(40));
        assert_eq!(page_offset(i64::MAX, 100), None);
        assert_eq!(page_offset(0, 20), None);
        assert_eq!(page_offset(2, 0), None);
    }

    #[test]
    fn builds_filtered_query() {
        let filters = SearchFilters {
            title: Some("war".to_string()),
            year_from: Some(1860),
            available_only: true,
            ..SearchFilters::default()
        };
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT b.id");
        SearchRepository::push_matching_books(&mut builder, &filters);
        let sql = builder.sql();

        assert!(sql.contains("b.title ILIKE $1"));
        assert!(sql.contains("b.year >= $2"));
        assert!(!sql.contains("a.name ILIKE"));
        assert!(sql.contains("HAVING"));
    }
}
