//! Catalog search endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::search::{
        AdvancedSearchQuery, SearchQuery, SearchResponse, SuggestionQuery, SuggestionsResponse,
    },
    AppState,
};

/// Search books by title or author name
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books", body = SearchResponse),
        (status = 400, description = "Empty query or invalid pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let response = state.services.catalog.search(&query).await?;
    Ok(Json(response))
}

/// Autocomplete suggestions from titles and author names
#[utoipa::path(
    get,
    path = "/search/suggestions",
    tag = "search",
    params(SuggestionQuery),
    responses(
        (status = 200, description = "Suggestions", body = SuggestionsResponse),
        (status = 400, description = "Invalid query", body = crate::error::ErrorResponse)
    )
)]
pub async fn suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> AppResult<Json<SuggestionsResponse>> {
    let response = state.services.catalog.suggestions(&query).await?;
    Ok(Json(response))
}

/// Search with separate title, author, year and availability filters
#[utoipa::path(
    get,
    path = "/search/advanced",
    tag = "search",
    params(AdvancedSearchQuery),
    responses(
        (status = 200, description = "Matching books", body = SearchResponse),
        (status = 400, description = "Invalid pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn advanced_search(
    State(state): State<AppState>,
    Query(query): Query<AdvancedSearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let response = state.services.catalog.advanced_search(&query).await?;
    Ok(Json(response))
}
