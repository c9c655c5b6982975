//! Shared utilities for integration tests.

use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use middleware_stack::RequestPath;

/// Build a request for `path` on localhost.
#[allow(dead_code)]
pub fn request(path: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("http://localhost{}", path))
        .body(Body::empty())
        .unwrap()
}

/// A request with a raw URL and an optional pre-parsed path,
/// for stacks that are not tied to `http`.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct PlainRequest {
    pub url: String,
    pub next_path: Option<String>,
}

#[allow(dead_code)]
impl PlainRequest {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            next_path: None,
        }
    }
}

impl RequestPath for PlainRequest {
    fn parsed_path(&self) -> Option<&str> {
        self.next_path.as_deref()
    }

    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }
}

/// Counts handler invocations across clones.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct Calls(Arc<AtomicUsize>);

#[allow(dead_code)]
impl Calls {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn called(&self) -> bool {
        self.count() > 0
    }
}
