//! Physical copy model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CopyStatus {
    #[default]
    Available,
    Loaned,
    Reserved,
}

impl CopyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Available => "available",
            CopyStatus::Loaned => "loaned",
            CopyStatus::Reserved => "reserved",
        }
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CopyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(CopyStatus::Available),
            "loaned" => Ok(CopyStatus::Loaned),
            "reserved" => Ok(CopyStatus::Reserved),
            _ => Err(format!("Invalid copy status: {}", s)),
        }
    }
}

// Stored as TEXT with a CHECK constraint
impl sqlx::Type<Postgres> for CopyStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for CopyStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for CopyStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: i32,
    pub book_id: i32,
    pub library_id: i32,
    pub inventory_number: String,
    pub status: CopyStatus,
    pub created_at: DateTime<Utc>,
}

/// Copy joined with its library and book names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CopyDetails {
    pub id: i32,
    pub book_id: i32,
    pub library_id: i32,
    pub inventory_number: String,
    pub status: CopyStatus,
    pub created_at: DateTime<Utc>,
    pub library_name: Option<String>,
    pub book_title: Option<String>,
}

/// Where a copy of a book is shelved, used in book details
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CopyLocation {
    pub library_id: i32,
    pub library_name: String,
    pub inventory_number: String,
    pub status: CopyStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCopy {
    pub library_id: i32,
    #[validate(length(min = 1, max = 50, message = "Inventory number must be 1 to 50 characters"))]
    pub inventory_number: String,
    #[serde(default)]
    pub status: CopyStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCopy {
    pub library_id: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "Inventory number must be 1 to 50 characters"))]
    pub inventory_number: Option<String>,
    pub status: Option<CopyStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Loaned".parse::<CopyStatus>(), Ok(CopyStatus::Loaned));
        assert!("lost".parse::<CopyStatus>().is_err());
    }

    #[test]
    fn create_copy_defaults_to_available() {
        let copy: CreateCopy =
            serde_json::from_str(r#"{"library_id": 1, "inventory_number": "INV-001"}"#).unwrap();
        assert_eq!(copy.status, CopyStatus::Available);
    }
}
