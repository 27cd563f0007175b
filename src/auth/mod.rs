//! Staff authentication primitives
//!
//! Password hashing and JWT issuance/verification. Nothing in here touches
//! the database or HTTP; the authorization chain that ties these to stored
//! credentials lives in `services::auth` and the `api` extractors.

pub mod jwt;
pub mod password;

pub use jwt::{TokenClaims, TokenError, TokenKind, TokenManager, TokenPair};
pub use password::{hash_password, verify_password};
