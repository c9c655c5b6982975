//! Current-path extraction.
//!
//! # Responsibilities
//! - Define what the stack reads from a request ([`RequestPath`])
//! - Derive the path a pattern is compared against
//! - Carry path rewrites on `http::Request`
//!
//! # Design Decisions
//! - A pre-parsed path (e.g. a rewrite set by an earlier handler) wins over
//!   the request URL
//! - The path is derived on demand and never cached, so mutations made by a
//!   handler are visible to the next pattern
//! - `http::Request` hands over its URI path as is; raw URL strings from other
//!   request types are parsed with `url` unless they are origin-form

use std::borrow::Cow;

use axum::http::Request;
use url::Url;

/// Request attributes the middleware stack reads.
pub trait RequestPath {
    /// Path already parsed by the framework, if any.
    fn parsed_path(&self) -> Option<&str> {
        None
    }

    /// The request URL, absolute or origin-form. Request types that already
    /// split their URL may return just the path.
    fn url(&self) -> Cow<'_, str>;
}

/// Path the stack should match against instead of the URI path.
///
/// Handlers insert this into the request extensions to rewrite the path seen
/// by later pipes (and, through the layer, by the inner service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath(String);

impl RoutePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<B> RequestPath for Request<B> {
    fn parsed_path(&self) -> Option<&str> {
        self.extensions().get::<RoutePath>().map(RoutePath::as_str)
    }

    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.uri().path())
    }
}

/// Compute the path of `req` as it stands right now.
pub fn current_path<R: RequestPath + ?Sized>(req: &R) -> Cow<'_, str> {
    if let Some(path) = req.parsed_path() {
        return Cow::Borrowed(path);
    }
    Cow::Owned(path_of(&req.url()))
}

/// Path component of a URL string.
///
/// Strings `url` cannot parse fall back to everything before `?` or `#`.
pub fn path_of(raw: &str) -> String {
    if raw.starts_with('/') {
        return strip_query(raw).to_string();
    }
    match Url::parse(raw) {
        Ok(url) => url.path().to_string(),
        Err(_) => strip_query(raw).to_string(),
    }
}

fn strip_query(raw: &str) -> &str {
    raw.split(['?', '#']).next().unwrap_or_default()
}
