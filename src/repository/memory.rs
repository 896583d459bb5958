//! In-memory catalog store
//!
//! Backs the test suite and local development. A whole-store mutex makes
//! each operation atomic within the process, which is the scope this backend
//! claims; cross-process deployments use the Postgres store.

use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::Mutex;

use super::{BorrowOutcome, CatalogStore, ReturnOutcome, StoreError};
use crate::models::{Book, BookView, BorrowRecord, NewBook};

#[derive(Default)]
struct MemoryInner {
    books: BTreeMap<i32, Book>,
    borrows: Vec<BorrowRecord>,
    next_book_id: i32,
    next_borrow_id: i32,
}

impl MemoryInner {
    fn open_record(&self, book_id: i32) -> Option<&BorrowRecord> {
        self.borrows
            .iter()
            .find(|r| r.book_id == book_id && r.is_open())
    }

    fn view(&self, book: &Book) -> BookView {
        let open = self.open_record(book.id);
        BookView {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            available: open.is_none(),
            borrowed_at: open.map(|r| r.borrowed_at),
        }
    }
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn add_book(&self, book: &NewBook) -> Result<Book, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_book_id += 1;
        let created = Book {
            id: inner.next_book_id,
            title: book.title.clone(),
            author: book.author.clone(),
        };
        inner.books.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_book(&self, id: i32) -> Result<Option<Book>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.books.get(&id).cloned())
    }

    async fn list_books(&self) -> Result<Vec<BookView>, StoreError> {
        let inner = self.inner.lock().await;
        // BTreeMap iteration gives ascending id order.
        Ok(inner.books.values().map(|b| inner.view(b)).collect())
    }

    async fn find_book_view(&self, id: i32) -> Result<Option<BookView>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.books.get(&id).map(|b| inner.view(b)))
    }

    async fn try_borrow(&self, book_id: i32) -> Result<BorrowOutcome, StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.books.contains_key(&book_id) {
            return Ok(BorrowOutcome::BookMissing);
        }
        if inner.open_record(book_id).is_some() {
            return Ok(BorrowOutcome::AlreadyBorrowed);
        }
        inner.next_borrow_id += 1;
        let record = BorrowRecord {
            id: inner.next_borrow_id,
            book_id,
            borrowed_at: Utc::now(),
            returned_at: None,
        };
        inner.borrows.push(record);
        Ok(BorrowOutcome::Borrowed)
    }

    async fn try_return(&self, book_id: i32) -> Result<ReturnOutcome, StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.books.contains_key(&book_id) {
            return Ok(ReturnOutcome::BookMissing);
        }
        let now = Utc::now();
        match inner
            .borrows
            .iter_mut()
            .find(|r| r.book_id == book_id && r.is_open())
        {
            Some(record) => {
                record.returned_at = Some(now);
                Ok(ReturnOutcome::Returned)
            }
            None => Ok(ReturnOutcome::NotCurrentlyBorrowed),
        }
    }
}
