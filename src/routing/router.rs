//! Ordered dispatch over a list of pipes.
//!
//! # Responsibilities
//! - Store pipes in the order they were given
//! - Evaluate patterns left to right against the request
//! - Run the handler of every matching pipe until one produces a response
//!
//! # Design Decisions
//! - Immutable after construction (shareable via `Arc` without locks)
//! - The current path is derived again before every pattern, never cached:
//!   a handler may rewrite it for the pipes that follow
//! - Strictly sequential: pipe N+1 is not looked at before pipe N finished
//! - Errors from predicates and handlers are returned as-is

use std::fmt;

use crate::routing::path::{current_path, RequestPath};
use crate::routing::pipe::{HandlerResult, Pipe};

/// An ordered, immutable middleware stack.
pub struct MiddlewareStack<R, T, E> {
    pipes: Vec<Pipe<R, T, E>>,
}

impl<R, T, E> MiddlewareStack<R, T, E> {
    pub fn new(pipes: impl IntoIterator<Item = Pipe<R, T, E>>) -> Self {
        Self {
            pipes: pipes.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }
}

impl<R: RequestPath, T, E> MiddlewareStack<R, T, E> {
    /// Run `req` through the stack.
    ///
    /// Returns the response of the first matching pipe whose handler
    /// produced one, or `Ok(None)` when no pipe did. The first error stops
    /// the dispatch and is returned unchanged.
    pub async fn dispatch(&self, req: &mut R) -> HandlerResult<T, E> {
        for (index, pipe) in self.pipes.iter().enumerate() {
            tracing::trace!(pipe = index, path = %current_path(&*req), "Evaluating pipe");

            if !pipe.pattern().matches(req).await? {
                continue;
            }

            tracing::debug!(pipe = index, pattern = ?pipe.pattern(), "Pipe matched");

            if let Some(response) = pipe.handle(req).await? {
                tracing::debug!(pipe = index, "Pipe short-circuited");
                return Ok(Some(response));
            }
        }

        Ok(None)
    }
}

impl<R, T, E> fmt::Debug for MiddlewareStack<R, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.pipes).finish()
    }
}

/// Build a middleware stack from pipes, kept in the given order.
pub fn middleware_stack<R, T, E>(
    pipes: impl IntoIterator<Item = Pipe<R, T, E>>,
) -> MiddlewareStack<R, T, E> {
    MiddlewareStack::new(pipes)
}
