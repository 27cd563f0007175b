//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod copies;
pub mod libraries;
pub mod search;
pub mod users;

use sqlx::{Pool, Postgres};

pub use users::CredentialStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub libraries: libraries::LibrariesRepository,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub copies: copies::CopiesRepository,
    pub search: search::SearchRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            libraries: libraries::LibrariesRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            copies: copies::CopiesRepository::new(pool.clone()),
            search: search::SearchRepository::new(pool.clone()),
            pool,
        }
    }
}
