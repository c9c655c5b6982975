//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Each pipe names exactly one matcher
//! - Templates and regexes compile, methods and headers are well-formed
//! - Actions carry valid status codes and targets
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StackConfig → Result<(), Vec<ValidationError>>
//! - Uses the same compile functions as the stack builder, so what validates
//!   is exactly what builds

use thiserror::Error;

use crate::config::build::compile_pattern;
use crate::config::schema::{PipeConfig, StackConfig};
use crate::http::actions::Action;

/// A semantic problem in a stack configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("pipe #{index}: name must not be empty")]
    EmptyName { index: usize },

    #[error("pipe '{pipe}': no matcher set (expected one of path, regex, method, header, always)")]
    MissingMatcher { pipe: String },

    #[error("pipe '{pipe}': only one matcher allowed, found {}", .found.join(", "))]
    MultipleMatchers { pipe: String, found: Vec<&'static str> },

    #[error("pipe '{pipe}': invalid path template: {reason}")]
    InvalidPath { pipe: String, reason: String },

    #[error("pipe '{pipe}': invalid regex: {reason}")]
    InvalidRegex { pipe: String, reason: String },

    #[error("pipe '{pipe}': invalid method '{method}'")]
    InvalidMethod { pipe: String, method: String },

    #[error("pipe '{pipe}': invalid header name '{name}'")]
    InvalidHeaderName { pipe: String, name: String },

    #[error("pipe '{pipe}': invalid value for header '{name}'")]
    InvalidHeaderValue { pipe: String, name: String },

    #[error("pipe '{pipe}': invalid status code {status}")]
    InvalidStatus { pipe: String, status: u16 },

    #[error("pipe '{pipe}': redirect status {status} is not a 3xx code")]
    NotRedirect { pipe: String, status: u16 },

    #[error("pipe '{pipe}': rewrite target '{target}' must start with '/'")]
    InvalidRewrite { pipe: String, target: String },
}

/// Validate a whole configuration.
pub fn validate_config(config: &StackConfig) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = config
        .pipes
        .iter()
        .enumerate()
        .flat_map(|(index, pipe)| validate_pipe(index, pipe))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate one pipe, returning every problem found.
pub fn validate_pipe(index: usize, pipe: &PipeConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if pipe.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName { index });
    }
    if let Err(err) = compile_pattern(pipe) {
        errors.push(err);
    }
    if let Err(err) = Action::from_config(&pipe.name, &pipe.action) {
        errors.push(err);
    }

    errors
}
