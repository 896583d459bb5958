//! Liber Lending Catalog Server
//!
//! A small Rust REST API over a lending catalog: list books, fetch one by
//! identifier, borrow it, return it. Availability is derived from the borrow
//! history; the store guarantees at most one open borrow per book.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
