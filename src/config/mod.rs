//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → StackConfig (validated, immutable)
//!     → build.rs (compile patterns and actions)
//!     → MiddlewareStack, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a rebuild
//! - All optional fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod build;
pub mod loader;
pub mod schema;
pub mod validation;

pub use build::{build_stack, HttpStack};
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ActionConfig, LogFormat, ObservabilityConfig, PipeConfig, StackConfig};
pub use validation::{validate_config, ValidationError};
