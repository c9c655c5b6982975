//! Pattern matching logic.
//!
//! # Responsibilities
//! - Represent the three matching strategies of a pipe: path template,
//!   regular expression, predicate function
//! - Evaluate a pattern against a request's current path, without touching
//!   the request
//!
//! # Design Decisions
//! - One closed enum, evaluated by a single exhaustive `match`
//! - Templates and regexes are compiled once, when the pattern is built
//! - Predicates may be synchronous or return a future; both are awaited the
//!   same way by the stack
//! - Predicate errors are returned untouched

use std::fmt;

use futures_util::future::BoxFuture;
use regex::Regex;

use crate::routing::path::{current_path, RequestPath};
use crate::routing::template::PathTemplate;

type SyncPredicateFn<R> = dyn Fn(&R) -> bool + Send + Sync;
type AsyncPredicateFn<R, E> = dyn for<'a> Fn(&'a R) -> BoxFuture<'a, Result<bool, E>> + Send + Sync;

/// A predicate over the whole request.
pub struct Predicate<R, E>(PredicateFn<R, E>);

enum PredicateFn<R, E> {
    Sync(Box<SyncPredicateFn<R>>),
    Async(Box<AsyncPredicateFn<R, E>>),
}

/// How a pipe decides whether it applies to a request.
pub enum Pattern<R, E> {
    /// Route template compared against the current path.
    Template(PathTemplate),
    /// Regular expression tested against the current path.
    Regex(Regex),
    /// Function of the request.
    Predicate(Predicate<R, E>),
}

impl<R, E> Pattern<R, E> {
    /// Match the current path against a route template.
    pub fn path(template: impl Into<PathTemplate>) -> Self {
        Pattern::Template(template.into())
    }

    /// Match when `regex` finds a match in the current path.
    pub fn regex(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }

    /// Match when `f` returns true.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Pattern::Predicate(Predicate(PredicateFn::Sync(Box::new(f))))
    }

    /// Match when the future returned by `f` resolves to `Ok(true)`.
    ///
    /// An `Err` aborts the dispatch and is handed back to its caller.
    pub fn predicate_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a R) -> BoxFuture<'a, Result<bool, E>> + Send + Sync + 'static,
    {
        Pattern::Predicate(Predicate(PredicateFn::Async(Box::new(f))))
    }
}

impl<R: RequestPath, E> Pattern<R, E> {
    /// Evaluate this pattern against `req`.
    ///
    /// The current path is derived from the request on every call. Takes
    /// `&mut R` so the returned future is `Send` for requests that are not
    /// `Sync`; the request is never modified.
    pub async fn matches(&self, req: &mut R) -> Result<bool, E> {
        match self {
            Pattern::Template(template) => Ok(template.compare(&current_path(&*req)).is_some()),
            Pattern::Regex(regex) => Ok(regex.is_match(&current_path(&*req))),
            Pattern::Predicate(Predicate(PredicateFn::Sync(f))) => Ok(f(&*req)),
            Pattern::Predicate(Predicate(PredicateFn::Async(f))) => {
                let test = f(&*req);
                test.await
            }
        }
    }
}

impl<R, E> From<&str> for Pattern<R, E> {
    fn from(template: &str) -> Self {
        Pattern::path(template)
    }
}

impl<R, E> From<String> for Pattern<R, E> {
    fn from(template: String) -> Self {
        Pattern::path(template)
    }
}

impl<R, E> From<PathTemplate> for Pattern<R, E> {
    fn from(template: PathTemplate) -> Self {
        Pattern::Template(template)
    }
}

impl<R, E> From<Regex> for Pattern<R, E> {
    fn from(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }
}

impl<R, E> fmt::Debug for Pattern<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Template(template) => {
                f.debug_tuple("Template").field(&template.as_str()).finish()
            }
            Pattern::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
            Pattern::Predicate(Predicate(PredicateFn::Sync(_))) => f.write_str("Predicate(sync)"),
            Pattern::Predicate(Predicate(PredicateFn::Async(_))) => f.write_str("Predicate(async)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::path::RoutePath;
    use axum::body::Body;
    use axum::http::Request;
    use std::convert::Infallible;

    type TestPattern = Pattern<Request<Body>, Infallible>;

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::default()).unwrap()
    }

    #[tokio::test]
    async fn test_template_pattern() {
        let pattern: TestPattern = "/users/:id".into();

        let mut req = request("http://localhost/users/42");
        assert!(pattern.matches(&mut req).await.unwrap());
        assert!(req.extensions().is_empty());

        let mut req = request("http://localhost/admin");
        assert!(!pattern.matches(&mut req).await.unwrap());
    }

    #[tokio::test]
    async fn test_regex_pattern() {
        let pattern: TestPattern = Regex::new(r"^/admin/.*").unwrap().into();

        assert!(pattern.matches(&mut request("/admin/dashboard")).await.unwrap());
        assert!(!pattern.matches(&mut request("/users/42")).await.unwrap());
    }

    #[tokio::test]
    async fn test_predicate_patterns() {
        let sync: TestPattern =
            Pattern::predicate(|req: &Request<Body>| req.uri().path().contains("secure"));
        assert!(sync.matches(&mut request("/secure")).await.unwrap());
        assert!(!sync.matches(&mut request("/anything")).await.unwrap());

        let suspending: TestPattern = Pattern::predicate_async(|_req| Box::pin(async { Ok(true) }));
        assert!(suspending.matches(&mut request("/anything")).await.unwrap());
    }

    #[tokio::test]
    async fn test_predicate_error_is_returned() {
        let pattern: Pattern<Request<Body>, String> =
            Pattern::predicate_async(|_req| Box::pin(async { Err("lookup failed".to_string()) }));

        let err = pattern.matches(&mut request("/")).await.unwrap_err();
        assert_eq!(err, "lookup failed");
    }

    #[tokio::test]
    async fn test_path_is_read_on_every_call() {
        let pattern: TestPattern = Pattern::path("/rewritten");
        let mut req = request("/original");
        assert!(!pattern.matches(&mut req).await.unwrap());

        req.extensions_mut().insert(RoutePath::new("/rewritten"));
        assert!(pattern.matches(&mut req).await.unwrap());
    }

    #[test]
    fn test_debug_output() {
        let pattern: TestPattern = "/users/:id".into();
        assert_eq!(format!("{:?}", pattern), r#"Template("/users/:id")"#);

        let pattern: TestPattern = Pattern::predicate(|_| true);
        assert_eq!(format!("{:?}", pattern), "Predicate(sync)");
    }
}
