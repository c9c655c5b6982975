//! Ordered middleware stack.
//!
//! Pipes pair a pattern (path template, regex or predicate) with a handler.
//! A stack evaluates its pipes in order against each request and returns the
//! first response a matching handler produces.
//!
//! ```ignore
//! use middleware_stack::{middleware_stack, pipe_fn, RoutePath};
//!
//! let stack = middleware_stack([
//!     pipe_fn("/old/:id", |req: &mut Request<Body>| {
//!         req.extensions_mut().insert(RoutePath::new("/new"));
//!         Ok(None)
//!     }),
//!     pipe_fn(Regex::new("^/admin")?, |_| {
//!         Ok(Some(StatusCode::FORBIDDEN.into_response()))
//!     }),
//! ]);
//! let response = stack.dispatch(&mut request).await?;
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::{build_stack, load_config, StackConfig};
pub use http::StackLayer;
pub use routing::{
    compare_path, current_path, middleware_stack, pipe, pipe_fn, HandlerResult, MiddlewareStack,
    PathParams, PathTemplate, Pattern, Pipe, RequestPath, RoutePath,
};
