//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / http layer produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (dispatch counters via `metrics`)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → whatever `metrics` recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging, JSON available for machine parsing
//! - Metrics are cheap (no-ops until a recorder is installed)
//! - The core never logs errors it returns; callers decide

pub mod logging;
pub mod metrics;
