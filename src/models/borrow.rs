//! Borrow record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One lending episode. `returned_at = None` marks the record as open, i.e.
/// the book is currently checked out. Records are never deleted; they are the
/// durable borrow history.
///
/// Invariant: for any `book_id`, at most one record is open at any instant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BorrowRecord {
    pub id: i32,
    pub book_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl BorrowRecord {
    /// Whether this record represents a book currently checked out.
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}
