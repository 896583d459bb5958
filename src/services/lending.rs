//! Lending service
//!
//! Domain rules on top of the catalog store. The whole check-and-transition
//! sequence is delegated to the store's atomic operations; the existence
//! pre-checks here only sharpen error messages, and the store outcome is
//! always authoritative for the final result.

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookView, NewBook},
    repository::{BorrowOutcome, CatalogStore, ReturnOutcome},
};

#[derive(Clone)]
pub struct LendingService {
    store: Arc<dyn CatalogStore>,
}

impl LendingService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// All books with their borrow status, ordered by id.
    pub async fn get_all(&self) -> AppResult<Vec<BookView>> {
        Ok(self.store.list_books().await?)
    }

    /// One book with its borrow status.
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookView> {
        self.store
            .find_book_view(id)
            .await?
            .ok_or_else(|| AppError::NotFound(not_found(id)))
    }

    /// Borrow a book. Fails when the book is unknown or already checked out.
    pub async fn borrow(&self, id: i32) -> AppResult<BookView> {
        if self.store.find_book(id).await?.is_none() {
            return Err(AppError::NotFound(not_found(id)));
        }

        match self.store.try_borrow(id).await? {
            BorrowOutcome::Borrowed => {
                tracing::info!(book_id = id, "book borrowed");
            }
            BorrowOutcome::AlreadyBorrowed => {
                return Err(AppError::NotAvailable(format!(
                    "Book with id {} is not available",
                    id
                )));
            }
            BorrowOutcome::BookMissing => {
                return Err(AppError::NotFound(not_found(id)));
            }
        }

        // Re-read for the freshly set borrowed_at.
        self.get_by_id(id).await
    }

    /// Return a book. Fails when the book is unknown or not checked out.
    pub async fn return_book(&self, id: i32) -> AppResult<BookView> {
        if self.store.find_book(id).await?.is_none() {
            return Err(AppError::NotFound(not_found(id)));
        }

        match self.store.try_return(id).await? {
            ReturnOutcome::Returned => {
                tracing::info!(book_id = id, "book returned");
            }
            ReturnOutcome::NotCurrentlyBorrowed => {
                return Err(AppError::NotBorrowed(format!(
                    "Book with id {} is not currently borrowed",
                    id
                )));
            }
            ReturnOutcome::BookMissing => {
                return Err(AppError::NotFound(not_found(id)));
            }
        }

        self.get_by_id(id).await
    }

    /// Validate and insert seed books. Bootstrap calls this once, when the
    /// catalog is empty.
    pub async fn seed_catalog(&self, seed: &[NewBook]) -> AppResult<Vec<Book>> {
        let mut created = Vec::with_capacity(seed.len());
        for book in seed {
            book.validate().map_err(|e| {
                AppError::Validation(format!("Invalid seed book '{}': {}", book.title, e))
            })?;
            created.push(self.store.add_book(book).await?);
        }
        if !created.is_empty() {
            tracing::info!(count = created.len(), "catalog seeded");
        }
        Ok(created)
    }
}

fn not_found(id: i32) -> String {
    format!("Book with id {} not found", id)
}
