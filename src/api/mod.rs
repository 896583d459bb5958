//! API handlers for the Liber REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    router::{Params, Router},
    AppState,
};

/// Success envelope wrapping every payload
#[derive(Serialize, ToSchema)]
pub struct ApiEnvelope<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub data: T,
    pub status: u16,
}

/// Wrap a payload in the 200 success envelope.
pub(crate) fn envelope<T>(data: T) -> Response
where
    T: Serialize + for<'a> ToSchema<'a>,
{
    (
        StatusCode::OK,
        Json(ApiEnvelope { data, status: 200 }),
    )
        .into_response()
}

/// The dispatch table for all resource endpoints.
pub fn routes() -> Router {
    Router::new()
        .route(Method::GET, "/health", health::health_check)
        .route(Method::GET, "/books", books::list_books)
        .route(Method::GET, "/books/{id}", books::get_book)
        .route(Method::POST, "/books/{id}/borrow", books::borrow_book)
        .route(Method::POST, "/books/{id}/return", books::return_book)
}

/// Build the application: swagger-ui routes, the resource router mounted as
/// the fallback service, and the middleware stack around both.
pub fn create_app(state: AppState) -> axum::Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Arc::new(routes());

    let dispatch = move |req: Request| {
        let router = router.clone();
        let state = state.clone();
        async move {
            let method = req.method().clone();
            let path = req.uri().path().to_owned();
            router.dispatch(state, &method, &path).await
        }
    };

    axum::Router::new()
        .merge(openapi::create_openapi_router())
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
