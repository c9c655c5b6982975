//! Routing subsystem: the ordered middleware stack.
//!
//! # Data Flow
//! ```text
//! Stack construction (once):
//!     pipe(pattern, handler) ...
//!     → pipe.rs (opaque Pipe entries)
//!     → router.rs (freeze as immutable MiddlewareStack)
//!
//! Dispatch (per request):
//!     for each pipe, in order:
//!         path.rs    (derive current path, fresh every iteration)
//!         matcher.rs (template / regex / predicate)
//!         pipe.rs    (run handler on match)
//!     → first Some(response) short-circuits
//!     → otherwise None after the last pipe
//! ```
//!
//! # Design Decisions
//! - Pipes are built only through their constructors, never from tuples
//! - Order is preserved exactly; evaluation is depth 1, left to right
//! - Sync and async predicates/handlers share one code path
//! - No error handling in the loop: the caller decides

pub mod matcher;
pub mod path;
pub mod pipe;
pub mod router;
pub mod template;

pub use matcher::{Pattern, Predicate};
pub use path::{current_path, RequestPath, RoutePath};
pub use pipe::{pipe, pipe_fn, HandlerResult, Pipe};
pub use router::{middleware_stack, MiddlewareStack};
pub use template::{compare_path, PathParams, PathTemplate};
