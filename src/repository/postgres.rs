//! PostgreSQL catalog store
//!
//! The borrow transition is a single conditional insert arbitrated by the
//! partial unique index `borrows_one_open_per_book` (one open row per
//! book_id). The index, not application code, serializes concurrent
//! callers, so the guarantee holds across processes sharing the database.

use sqlx::{Pool, Postgres};

use super::{BorrowOutcome, CatalogStore, ReturnOutcome, StoreError};
use crate::models::{Book, BookView, NewBook};

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: Pool<Postgres>,
}

impl PgCatalogStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Existence probe used to refine zero-row transition outcomes into
    /// `BookMissing`. Advisory only; the conditional statement that preceded
    /// it is the serialization point.
    async fn book_exists(&self, id: i32) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn add_book(&self, book: &NewBook) -> Result<Book, StoreError> {
        let created = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author) VALUES ($1, $2) RETURNING id, title, author",
        )
        .bind(&book.title)
        .bind(&book.author)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_book(&self, id: i32) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn list_books(&self) -> Result<Vec<BookView>, StoreError> {
        let views = sqlx::query_as::<_, BookView>(
            r#"
            SELECT b.id, b.title, b.author,
                   (br.id IS NULL) AS available,
                   br.borrowed_at AS borrowed_at
            FROM books b
            LEFT JOIN borrows br
              ON br.book_id = b.id AND br.returned_at IS NULL
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    async fn find_book_view(&self, id: i32) -> Result<Option<BookView>, StoreError> {
        let view = sqlx::query_as::<_, BookView>(
            r#"
            SELECT b.id, b.title, b.author,
                   (br.id IS NULL) AS available,
                   br.borrowed_at AS borrowed_at
            FROM books b
            LEFT JOIN borrows br
              ON br.book_id = b.id AND br.returned_at IS NULL
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(view)
    }

    async fn try_borrow(&self, book_id: i32) -> Result<BorrowOutcome, StoreError> {
        // Check and insert in one statement: the SELECT supplies the row only
        // if the book exists, and the partial unique index rejects a second
        // open record for the same book.
        let inserted = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO borrows (book_id, borrowed_at)
            SELECT id, NOW() FROM books WHERE id = $1
            ON CONFLICT (book_id) WHERE returned_at IS NULL DO NOTHING
            RETURNING id
            "#,
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        if inserted.is_some() {
            tracing::debug!(book_id, "open borrow record created");
            return Ok(BorrowOutcome::Borrowed);
        }

        if self.book_exists(book_id).await? {
            Ok(BorrowOutcome::AlreadyBorrowed)
        } else {
            Ok(BorrowOutcome::BookMissing)
        }
    }

    async fn try_return(&self, book_id: i32) -> Result<ReturnOutcome, StoreError> {
        // Conditional close of the unique open record. When two returns race,
        // only one sees rows_affected == 1.
        let result = sqlx::query(
            "UPDATE borrows SET returned_at = NOW() WHERE book_id = $1 AND returned_at IS NULL",
        )
        .bind(book_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::debug!(book_id, "open borrow record closed");
            return Ok(ReturnOutcome::Returned);
        }

        if self.book_exists(book_id).await? {
            Ok(ReturnOutcome::NotCurrentlyBorrowed)
        } else {
            Ok(ReturnOutcome::BookMissing)
        }
    }
}
