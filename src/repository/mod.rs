//! Catalog store: the persistence contract for lending state
//!
//! The store owns the atomicity of borrow/return transitions. Everything
//! above it (service, handlers) treats it as an opaque transactional
//! interface; everything below it (Postgres, the in-memory backend) must
//! honor the same contract: for any book, at most one open borrow record
//! exists at any instant, under concurrent callers.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::models::{Book, BookView, NewBook};

/// Store-level failure, distinct from domain outcomes. Never swallowed;
/// fatal for the request that hit it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of an atomic borrow transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowOutcome {
    /// A new open borrow record was created.
    Borrowed,
    /// An open record already existed; no second one was created.
    AlreadyBorrowed,
    /// No book with that id exists.
    BookMissing,
}

/// Outcome of an atomic return transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// The unique open record was closed.
    Returned,
    /// No open record existed; nothing was changed.
    NotCurrentlyBorrowed,
    /// No book with that id exists.
    BookMissing,
}

/// Persistence contract for the lending catalog.
///
/// `try_borrow` and `try_return` perform the availability check and the
/// state change as one indivisible operation; callers must never split the
/// check and the write across two calls.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a book. Only the seeding path creates books.
    async fn add_book(&self, book: &NewBook) -> Result<Book, StoreError>;

    /// Read-only lookup by id.
    async fn find_book(&self, id: i32) -> Result<Option<Book>, StoreError>;

    /// All books with their borrow status, ordered by id ascending.
    async fn list_books(&self) -> Result<Vec<BookView>, StoreError>;

    /// One book with its borrow status.
    async fn find_book_view(&self, id: i32) -> Result<Option<BookView>, StoreError>;

    /// Atomically create an open borrow record for the book, provided none
    /// exists. Concurrent callers observe exactly one `Borrowed`.
    async fn try_borrow(&self, book_id: i32) -> Result<BorrowOutcome, StoreError>;

    /// Atomically close the open borrow record for the book, provided one
    /// exists. Concurrent callers observe exactly one `Returned`.
    async fn try_return(&self, book_id: i32) -> Result<ReturnOutcome, StoreError>;
}
