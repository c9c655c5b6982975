//! Pipes: a pattern paired with a handler.
//!
//! A [`Pipe`] can only be built through [`pipe`], [`pipe_fn`] or the
//! associated constructors; its fields are private, so a bare
//! `(pattern, handler)` tuple never stands in for one.

use std::fmt;

use futures_util::future::BoxFuture;

use crate::routing::matcher::Pattern;

/// What a handler produces: a response to short-circuit with, `None` to
/// continue with the next pipe, or an error that aborts the dispatch.
pub type HandlerResult<T, E> = Result<Option<T>, E>;

type SyncHandlerFn<R, T, E> = dyn Fn(&mut R) -> HandlerResult<T, E> + Send + Sync;
type AsyncHandlerFn<R, T, E> =
    dyn for<'a> Fn(&'a mut R) -> BoxFuture<'a, HandlerResult<T, E>> + Send + Sync;

enum Handler<R, T, E> {
    Sync(Box<SyncHandlerFn<R, T, E>>),
    Async(Box<AsyncHandlerFn<R, T, E>>),
}

/// An immutable (pattern, handler) entry of a middleware stack.
pub struct Pipe<R, T, E> {
    pattern: Pattern<R, E>,
    handler: Handler<R, T, E>,
}

impl<R, T, E> Pipe<R, T, E> {
    /// Pair a pattern with a handler returning a future.
    pub fn new<F>(pattern: impl Into<Pattern<R, E>>, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut R) -> BoxFuture<'a, HandlerResult<T, E>> + Send + Sync + 'static,
    {
        Self {
            pattern: pattern.into(),
            handler: Handler::Async(Box::new(handler)),
        }
    }

    /// Pair a pattern with a synchronous handler.
    pub fn sync<F>(pattern: impl Into<Pattern<R, E>>, handler: F) -> Self
    where
        F: Fn(&mut R) -> HandlerResult<T, E> + Send + Sync + 'static,
    {
        Self {
            pattern: pattern.into(),
            handler: Handler::Sync(Box::new(handler)),
        }
    }

    pub fn pattern(&self) -> &Pattern<R, E> {
        &self.pattern
    }

    /// Run the handler on `req`.
    pub async fn handle(&self, req: &mut R) -> HandlerResult<T, E> {
        match &self.handler {
            Handler::Sync(f) => f(req),
            Handler::Async(f) => f(req).await,
        }
    }
}

impl<R, T, E> fmt::Debug for Pipe<R, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handler = match self.handler {
            Handler::Sync(_) => "sync",
            Handler::Async(_) => "async",
        };
        f.debug_struct("Pipe")
            .field("pattern", &self.pattern)
            .field("handler", &handler)
            .finish()
    }
}

/// Create a pipe from a pattern and a handler returning a future.
///
/// ```ignore
/// let auth = pipe(Regex::new("^/admin")?, |req: &mut Request<Body>| {
///     Box::pin(async move { Ok(check(req).await.err().map(IntoResponse::into_response)) })
/// });
/// ```
pub fn pipe<R, T, E, F>(pattern: impl Into<Pattern<R, E>>, handler: F) -> Pipe<R, T, E>
where
    F: for<'a> Fn(&'a mut R) -> BoxFuture<'a, HandlerResult<T, E>> + Send + Sync + 'static,
{
    Pipe::new(pattern, handler)
}

/// Create a pipe from a pattern and a synchronous handler.
pub fn pipe_fn<R, T, E, F>(pattern: impl Into<Pattern<R, E>>, handler: F) -> Pipe<R, T, E>
where
    F: Fn(&mut R) -> HandlerResult<T, E> + Send + Sync + 'static,
{
    Pipe::sync(pattern, handler)
}
