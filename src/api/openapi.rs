//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, copies, health, libraries, search};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "0.1.0",
        description = "Catalog of books, authors, libraries and physical copies",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::refresh,
        auth::me,
        auth::update_profile,
        auth::register,
        // Libraries
        libraries::list_libraries,
        libraries::get_library,
        libraries::create_library,
        libraries::update_library,
        libraries::delete_library,
        // Authors
        authors::list_authors,
        authors::create_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Copies
        copies::list_copies,
        copies::create_copy,
        copies::update_copy,
        copies::delete_copy,
        // Search
        search::search,
        search::suggestions,
        search::advanced_search,
    ),
    components(
        schemas(
            // Auth
            auth::LoginForm,
            crate::auth::TokenPair,
            crate::models::staff_user::StaffUser,
            crate::models::staff_user::RegisterStaffUser,
            crate::models::staff_user::UpdateProfile,
            // Catalog
            crate::models::library::Library,
            crate::models::library::CreateLibrary,
            crate::models::library::UpdateLibrary,
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookDetail,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::copy::CopyStatus,
            crate::models::copy::BookCopy,
            crate::models::copy::CopyDetails,
            crate::models::copy::CopyLocation,
            crate::models::copy::CreateCopy,
            crate::models::copy::UpdateCopy,
            // Search
            crate::models::search::SearchResult,
            crate::models::search::SearchResponse,
            crate::models::search::Suggestion,
            crate::models::search::SuggestionKind,
            crate::models::search::SuggestionsResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Staff authentication"),
        (name = "libraries", description = "Library branches"),
        (name = "authors", description = "Authors"),
        (name = "books", description = "Book catalog"),
        (name = "copies", description = "Physical copies"),
        (name = "search", description = "Catalog search")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_catalog_paths_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/auth/login"));
        assert!(doc.paths.paths.contains_key("/books/{id}/copies"));
        assert!(doc.paths.paths.contains_key("/books/copies/{id}"));
        assert!(doc.paths.paths.contains_key("/libraries/{id}"));
        assert!(doc.paths.paths.contains_key("/search/advanced"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
