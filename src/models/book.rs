//! Book model and its derived projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book row from the catalog. Identity is store-assigned and immutable;
/// lending operations only ever read it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
}

/// Seed input for catalog creation. Books are only created at seeding time;
/// there are no book CRUD endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
}

/// Derived, read-only projection of a book plus its current borrow status.
///
/// `available` means no open borrow record exists; `borrowed_at` is the open
/// record's timestamp, or `None`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookView {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub available: bool,
    pub borrowed_at: Option<DateTime<Utc>>,
}
