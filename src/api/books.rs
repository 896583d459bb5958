//! Book lending endpoints
//!
//! Thin adapters: parse the path parameter, call the lending service, wrap
//! the result in the response envelope. No business logic lives here.

use axum::response::Response;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::BookView,
    router::Params,
    AppState,
};

use super::{envelope, ApiEnvelope};

/// Book list payload
#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub books: Vec<BookView>,
}

/// Single book payload
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub book: BookView,
}

/// Payload for a successful borrow or return transition
#[derive(Serialize, ToSchema)]
pub struct LendingResponse {
    pub book: BookView,
    /// Status message
    pub message: String,
}

/// Parse the `{id}` path parameter under a strict positive-integer grammar.
///
/// Anything but ASCII digits is a client error. Digit strings that cannot
/// name a stored book (leading zeros, beyond i32) read as absent entities.
fn parse_book_id(params: &Params) -> AppResult<i32> {
    let raw = params.get("id").map(String::as_str).unwrap_or_default();

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::InvalidId(format!(
            "Invalid book identifier '{}'",
            raw
        )));
    }

    if raw.len() > 1 && raw.starts_with('0') {
        return Err(AppError::NotFound(format!(
            "Book with id {} not found",
            raw
        )));
    }

    raw.parse::<i32>()
        .map_err(|_| AppError::NotFound(format!("Book with id {} not found", raw)))
}

/// List all books with their availability
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books in the catalog", body = ApiEnvelope<BookListResponse>),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(state: AppState, _params: Params) -> AppResult<Response> {
    let books = state.services.lending.get_all().await?;
    Ok(envelope(BookListResponse { books }))
}

/// Get one book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = ApiEnvelope<BookResponse>),
        (status = 400, description = "Invalid identifier", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(state: AppState, params: Params) -> AppResult<Response> {
    let id = parse_book_id(&params)?;
    let book = state.services.lending.get_by_id(id).await?;
    Ok(envelope(BookResponse { book }))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book borrowed", body = ApiEnvelope<LendingResponse>),
        (status = 400, description = "Book not available", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(state: AppState, params: Params) -> AppResult<Response> {
    let id = parse_book_id(&params)?;
    let book = state.services.lending.borrow(id).await?;
    Ok(envelope(LendingResponse {
        book,
        message: format!("Book {} borrowed successfully", id),
    }))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ApiEnvelope<LendingResponse>),
        (status = 400, description = "Book not currently borrowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(state: AppState, params: Params) -> AppResult<Response> {
    let id = parse_book_id(&params)?;
    let book = state.services.lending.return_book(id).await?;
    Ok(envelope(LendingResponse {
        book,
        message: format!("Book {} returned successfully", id),
    }))
}
