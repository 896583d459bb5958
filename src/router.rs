//! Request router
//!
//! Matches a method and path against registered path templates, binds named
//! placeholders, and dispatches to async handlers. Matching is anchored to
//! the full path, case-sensitive on literal segments, and tried in
//! registration order. A placeholder binds exactly one non-empty segment and
//! can never absorb a slash.

use std::{future::Future, pin::Pin};

use axum::{
    http::Method,
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Captured path parameters, in template order.
pub type Params = IndexMap<String, String>;

/// Type-erased async handler invoked with the shared state and the captured
/// parameters.
pub type RouteHandler =
    Box<dyn Fn(AppState, Params) -> Pin<Box<dyn Future<Output = AppResult<Response>> + Send>> + Send + Sync>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("template must start with '/': '{0}'")]
    MissingLeadingSlash(String),

    #[error("empty placeholder name in '{0}'")]
    EmptyPlaceholder(String),

    #[error("stray brace in segment '{0}'")]
    StrayBrace(String),

    #[error("duplicate placeholder '{0}'")]
    DuplicatePlaceholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template: literal segments and `{name}` placeholders.
#[derive(Debug, Clone)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a template. Malformed templates are rejected here, at
    /// registration time, not at match time.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let rest = template
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(template.to_string()))?;

        let mut segments = Vec::new();
        let mut names: Vec<&str> = Vec::new();

        for raw in rest.split('/') {
            if let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                if name.is_empty() {
                    return Err(PatternError::EmptyPlaceholder(template.to_string()));
                }
                if name.contains(['{', '}']) {
                    return Err(PatternError::StrayBrace(raw.to_string()));
                }
                if names.contains(&name) {
                    return Err(PatternError::DuplicatePlaceholder(name.to_string()));
                }
                names.push(name);
                segments.push(Segment::Param(name.to_string()));
            } else if raw.contains(['{', '}']) {
                return Err(PatternError::StrayBrace(raw.to_string()));
            } else {
                segments.push(Segment::Literal(raw.to_string()));
            }
        }

        Ok(Self { segments })
    }

    /// Match a full path against this pattern, binding placeholders. Returns
    /// `None` unless every segment matches and the whole path is consumed.
    pub fn capture(&self, path: &str) -> Option<Params> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), part.to_string());
                }
            }
        }

        Some(params)
    }
}

struct Route {
    method: Method,
    pattern: PathPattern,
    handler: RouteHandler,
}

/// Dispatch table. Routes are tried in registration order; the first whose
/// method and pattern both match wins.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a handler for a (method, template) pair. Panics on a
    /// malformed template; route tables are built once at startup.
    pub fn route<H, F>(mut self, method: Method, template: &str, handler: H) -> Self
    where
        H: Fn(AppState, Params) -> F + Send + Sync + 'static,
        F: Future<Output = AppResult<Response>> + Send + 'static,
    {
        let pattern = PathPattern::parse(template)
            .unwrap_or_else(|e| panic!("invalid route template '{}': {}", template, e));
        self.routes.push(Route {
            method,
            pattern,
            handler: Box::new(move |state, params| Box::pin(handler(state, params))),
        });
        self
    }

    /// Find the first matching route and bind its parameters.
    pub fn find(&self, method: &Method, path: &str) -> Option<(&RouteHandler, Params)> {
        self.routes.iter().find_map(|route| {
            if route.method != *method {
                return None;
            }
            route
                .pattern
                .capture(path)
                .map(|params| (&route.handler, params))
        })
    }

    /// Dispatch a request. Handler errors are mapped to the error envelope
    /// here, exactly once; an unmatched request yields the 404 envelope.
    pub async fn dispatch(&self, state: AppState, method: &Method, path: &str) -> Response {
        match self.find(method, path) {
            Some((handler, params)) => match handler(state, params).await {
                Ok(response) => response,
                Err(err) => err.into_response(),
            },
            None => {
                tracing::debug!(%method, path, "no route matched");
                AppError::NotFound(format!("No route for {} {}", method, path)).into_response()
            }
        }
    }
}
