//! Tower integration.
//!
//! # Responsibilities
//! - Run a middleware stack in front of any tower service
//! - Return short-circuit responses without touching the inner service
//! - Forward everything else, applying path rewrites to the URI
//!
//! # Design Decisions
//! - The stack is shared through `Arc`; the layer itself holds no state
//! - Stack errors become responses via `IntoResponse`
//! - The query string survives a rewrite

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{uri::PathAndQuery, Request, Uri},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::observability::metrics::{self, DispatchOutcome};
use crate::routing::{MiddlewareStack, RoutePath};

type HttpStack<E> = MiddlewareStack<Request<Body>, Response, E>;

/// Layer that runs a middleware stack before the wrapped service.
pub struct StackLayer<E> {
    stack: Arc<HttpStack<E>>,
}

impl<E> StackLayer<E> {
    pub fn new(stack: HttpStack<E>) -> Self {
        Self::from_shared(Arc::new(stack))
    }

    /// Use a stack that is already shared elsewhere.
    pub fn from_shared(stack: Arc<HttpStack<E>>) -> Self {
        Self { stack }
    }
}

impl<E> Clone for StackLayer<E> {
    fn clone(&self) -> Self {
        Self {
            stack: Arc::clone(&self.stack),
        }
    }
}

impl<S, E> Layer<S> for StackLayer<E> {
    type Service = StackService<S, E>;

    fn layer(&self, inner: S) -> Self::Service {
        StackService {
            inner,
            stack: Arc::clone(&self.stack),
        }
    }
}

/// Service produced by [`StackLayer`].
pub struct StackService<S, E> {
    inner: S,
    stack: Arc<HttpStack<E>>,
}

impl<S: Clone, E> Clone for StackService<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            stack: Arc::clone(&self.stack),
        }
    }
}

impl<S, E> Service<Request<Body>> for StackService<S, E>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
    E: IntoResponse + Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let stack = Arc::clone(&self.stack);
        // Keep the service that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match stack.dispatch(&mut req).await {
                Ok(Some(response)) => {
                    metrics::record_dispatch(DispatchOutcome::Response);
                    Ok(response)
                }
                Ok(None) => {
                    metrics::record_dispatch(DispatchOutcome::Pass);
                    apply_rewrite(&mut req);
                    inner.call(req).await
                }
                Err(err) => {
                    metrics::record_dispatch(DispatchOutcome::Error);
                    Ok(err.into_response())
                }
            }
        })
    }
}

/// Replace the URI path with the rewritten one, if a pipe set it.
fn apply_rewrite(req: &mut Request<Body>) {
    let target = match req.extensions().get::<RoutePath>() {
        Some(route) if route.as_str() != req.uri().path() => route.as_str().to_string(),
        _ => return,
    };

    let path_and_query = match req.uri().query() {
        Some(query) => format!("{}?{}", target, query),
        None => target,
    };

    let mut parts = req.uri().clone().into_parts();
    let rewritten = PathAndQuery::try_from(path_and_query.as_str())
        .map_err(axum::http::Error::from)
        .and_then(|pq| {
            parts.path_and_query = Some(pq);
            Uri::from_parts(parts).map_err(axum::http::Error::from)
        });

    match rewritten {
        Ok(uri) => {
            tracing::debug!(from = %req.uri(), to = %uri, "Forwarding rewritten request");
            metrics::record_rewrite();
            *req.uri_mut() = uri;
        }
        Err(err) => {
            tracing::warn!(
                rewrite = %path_and_query,
                error = %err,
                "Ignoring invalid rewrite target"
            );
        }
    }
}
