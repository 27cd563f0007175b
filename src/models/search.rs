//! Catalog search request and response types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_PER_PAGE: i64 = 20;

#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text matched against titles and author names
    #[validate(length(min = 1, message = "Search query must not be empty"))]
    pub q: String,
    /// Only books with copies in this library
    pub library_id: Option<i32>,
    #[validate(range(min = 1, max = 10000, message = "page must be between 1 and 10000"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    pub per_page: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AdvancedSearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub library_id: Option<i32>,
    /// Drop books with no available copy
    #[serde(default)]
    pub available_only: bool,
    #[validate(range(min = 1, max = 10000, message = "page must be between 1 and 10000"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SuggestionQuery {
    #[validate(length(min = 1, message = "Search query must not be empty"))]
    pub q: String,
    #[validate(range(min = 1, max = 10, message = "limit must be between 1 and 10"))]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SearchResult {
    pub id: i32,
    pub title: String,
    pub author_name: Option<String>,
    pub year: Option<i32>,
    pub available_count: i64,
    pub total_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    pub fn new(query: String, total: i64, page: i64, per_page: i64, results: Vec<SearchResult>) -> Self {
        let pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };
        Self {
            query,
            total,
            page,
            per_page,
            pages,
            results,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Book,
    Author,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionsResponse {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(SearchResponse::new("q".into(), 0, 1, 20, vec![]).pages, 0);
        assert_eq!(SearchResponse::new("q".into(), 20, 1, 20, vec![]).pages, 1);
        assert_eq!(SearchResponse::new("q".into(), 21, 1, 20, vec![]).pages, 2);
    }

    #[test]
    fn page_is_bounded() {
        let query = |page: i64| SearchQuery {
            q: "war".to_string(),
            library_id: None,
            page: Some(page),
            per_page: Some(100),
        };
        assert!(query(1).validate().is_ok());
        assert!(query(10_000).validate().is_ok());
        assert!(query(10_001).validate().is_err());
        assert!(query(i64::MAX).validate().is_err());

        let advanced = AdvancedSearchQuery {
            page: Some(i64::MAX),
            ..AdvancedSearchQuery::default()
        };
        assert!(advanced.validate().is_err());
    }
}
