//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (axum / tower)
//!     → layer.rs (StackService: dispatch through the stack)
//!         → actions.rs (built-in handlers from config)
//!     → Some(response): returned to the client
//!     → None: URI rewritten if needed, forwarded to the inner service
//! ```

pub mod actions;
pub mod layer;

pub use actions::Action;
pub use layer::{StackLayer, StackService};
