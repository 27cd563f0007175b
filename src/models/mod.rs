//! Data models for the catalog

pub mod author;
pub mod book;
pub mod copy;
pub mod library;
pub mod search;
pub mod staff_user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetail, BookSummary};
pub use copy::{BookCopy, CopyDetails, CopyStatus};
pub use library::Library;
pub use staff_user::StaffUser;
