//! Catalog service: libraries, authors, books, copies and search

use std::collections::HashSet;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor},
        book::{BookDetail, BookQuery, BookSummary, CreateBook, UpdateBook},
        copy::{CopyDetails, CreateCopy, UpdateCopy},
        library::{CreateLibrary, Library, UpdateLibrary},
        search::{
            AdvancedSearchQuery, SearchQuery, SearchResponse, Suggestion, SuggestionKind,
            SuggestionQuery, SuggestionsResponse, DEFAULT_PER_PAGE,
        },
    },
    repository::{search::SearchFilters, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Libraries

    pub async fn list_libraries(&self) -> AppResult<Vec<Library>> {
        self.repository.libraries.list().await
    }

    pub async fn get_library(&self, id: i32) -> AppResult<Library> {
        self.repository
            .libraries
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Library not found".to_string()))
    }

    pub async fn create_library(&self, library: CreateLibrary) -> AppResult<Library> {
        library.validate()?;
        self.repository.libraries.create(&library).await
    }

    pub async fn update_library(&self, id: i32, library: UpdateLibrary) -> AppResult<Library> {
        library.validate()?;
        self.repository
            .libraries
            .update(id, &library)
            .await?
            .ok_or_else(|| AppError::NotFound("Library not found".to_string()))
    }

    pub async fn delete_library(&self, id: i32) -> AppResult<()> {
        if !self.repository.libraries.delete(id).await? {
            return Err(AppError::NotFound("Library not found".to_string()));
        }
        Ok(())
    }

    // Authors

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        author.validate()?;
        if self.repository.authors.name_exists(&author.name).await? {
            return Err(AppError::BadRequest("Author already exists".to_string()));
        }
        self.repository.authors.create(&author).await
    }

    // Books

    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<BookSummary>> {
        query.validate()?;
        self.repository.books.list(query).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        let book = self.book_summary(id).await?;
        let copies_by_library = self.repository.books.copies_by_library(id).await?;
        Ok(BookDetail {
            book,
            copies_by_library,
        })
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<BookSummary> {
        book.validate()?;
        self.ensure_author(book.author_id).await?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, "Book created");
        self.book_summary(created.id).await
    }

    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<BookSummary> {
        book.validate()?;
        if let Some(author_id) = book.author_id {
            self.ensure_author(author_id).await?;
        }

        self.repository
            .books
            .update(id, &book)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        self.book_summary(id).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        if !self.repository.books.delete(id).await? {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    // Copies

    pub async fn list_copies(&self, book_id: i32) -> AppResult<Vec<CopyDetails>> {
        self.ensure_book(book_id).await?;
        self.repository.copies.list_for_book(book_id).await
    }

    pub async fn create_copy(&self, book_id: i32, copy: CreateCopy) -> AppResult<CopyDetails> {
        copy.validate()?;
        self.ensure_book(book_id).await?;
        self.ensure_library(copy.library_id).await?;

        let id = self.repository.copies.create(book_id, &copy).await?;
        self.copy_details(id).await
    }

    pub async fn update_copy(&self, id: i32, copy: UpdateCopy) -> AppResult<CopyDetails> {
        copy.validate()?;
        if let Some(library_id) = copy.library_id {
            self.ensure_library(library_id).await?;
        }

        if !self.repository.copies.update(id, &copy).await? {
            return Err(AppError::NotFound("Copy not found".to_string()));
        }
        self.copy_details(id).await
    }

    pub async fn delete_copy(&self, id: i32) -> AppResult<()> {
        if !self.repository.copies.delete(id).await? {
            return Err(AppError::NotFound("Copy not found".to_string()));
        }
        Ok(())
    }

    // Search

    /// Match books by title or author name
    pub async fn search(&self, query: &SearchQuery) -> AppResult<SearchResponse> {
        query.validate()?;
        let text = query.q.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Search query must not be empty".to_string()));
        }

        let filters = SearchFilters {
            text: Some(text.to_string()),
            library_id: query.library_id,
            ..SearchFilters::default()
        };
        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);

        let (results, total) = self.repository.search.search(&filters, page, per_page).await?;
        Ok(SearchResponse::new(text.to_string(), total, page, per_page, results))
    }

    pub async fn advanced_search(&self, query: &AdvancedSearchQuery) -> AppResult<SearchResponse> {
        query.validate()?;

        let filters = advanced_filters(query);
        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);

        let (results, total) = self.repository.search.search(&filters, page, per_page).await?;
        Ok(SearchResponse::new(describe_filters(&filters), total, page, per_page, results))
    }

    /// Autocomplete: book titles first, then author names
    pub async fn suggestions(&self, query: &SuggestionQuery) -> AppResult<SuggestionsResponse> {
        query.validate()?;
        let text = query.q.trim();
        let limit = query.limit.unwrap_or(5);

        let titles = self.repository.search.matching_titles(text, limit).await?;
        let authors = self.repository.search.matching_authors(text, limit).await?;

        Ok(SuggestionsResponse {
            query: text.to_string(),
            suggestions: merge_suggestions(titles, authors, limit as usize),
        })
    }

    async fn book_summary(&self, id: i32) -> AppResult<BookSummary> {
        self.repository
            .books
            .get_summary(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn copy_details(&self, id: i32) -> AppResult<CopyDetails> {
        self.repository
            .copies
            .get_details(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Copy not found".to_string()))
    }

    async fn ensure_book(&self, id: i32) -> AppResult<()> {
        if !self.repository.books.exists(id).await? {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        Ok(())
    }

    async fn ensure_author(&self, id: i32) -> AppResult<()> {
        if !self.repository.authors.exists(id).await? {
            return Err(AppError::BadRequest("Author not found".to_string()));
        }
        Ok(())
    }

    async fn ensure_library(&self, id: i32) -> AppResult<()> {
        if self.repository.libraries.get_by_id(id).await?.is_none() {
            return Err(AppError::BadRequest("Library not found".to_string()));
        }
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn advanced_filters(query: &AdvancedSearchQuery) -> SearchFilters {
    SearchFilters {
        text: None,
        title: non_blank(&query.title),
        author: non_blank(&query.author),
        year_from: query.year_from,
        year_to: query.year_to,
        library_id: query.library_id,
        available_only: query.available_only,
    }
}

/// Human-readable echo of the applied filters
fn describe_filters(filters: &SearchFilters) -> String {
    let mut parts = Vec::new();
    if let Some(ref title) = filters.title {
        parts.push(format!("title={}", title));
    }
    if let Some(ref author) = filters.author {
        parts.push(format!("author={}", author));
    }
    if let Some(year_from) = filters.year_from {
        parts.push(format!("year_from={}", year_from));
    }
    if let Some(year_to) = filters.year_to {
        parts.push(format!("year_to={}", year_to));
    }
    if let Some(library_id) = filters.library_id {
        parts.push(format!("library_id={}", library_id));
    }
    if filters.available_only {
        parts.push("available_only=true".to_string());
    }
    parts.join(", ")
}

fn merge_suggestions(titles: Vec<String>, authors: Vec<String>, limit: usize) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    titles
        .into_iter()
        .map(|text| Suggestion {
            kind: SuggestionKind::Book,
            text,
        })
        .chain(authors.into_iter().map(|text| Suggestion {
            kind: SuggestionKind::Author,
            text,
        }))
        .filter(|s| seen.insert((s.kind, s.text.clone())))
        .take(limit)
        .collect()
}
