//! Compile a configuration into a middleware stack.

use std::convert::Infallible;

use axum::{
    body::Body,
    http::{HeaderName, Method, Request},
    response::Response,
};
use regex::Regex;

use crate::config::loader::ConfigError;
use crate::config::schema::{PipeConfig, StackConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::http::actions::Action;
use crate::routing::{current_path, MiddlewareStack, PathTemplate, Pattern, Pipe};

/// Stack type produced from configuration files.
pub type HttpStack = MiddlewareStack<Request<Body>, Response, Infallible>;

type HttpPattern = Pattern<Request<Body>, Infallible>;
type HttpPipe = Pipe<Request<Body>, Response, Infallible>;

/// Validate `config` and compile it into a stack, keeping pipe order.
pub fn build_stack(config: &StackConfig) -> Result<HttpStack, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let pipes = config
        .pipes
        .iter()
        .map(compile_pipe)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ConfigError::Validation(vec![err]))?;

    tracing::debug!(pipes = pipes.len(), "Middleware stack compiled");
    Ok(MiddlewareStack::new(pipes))
}

fn compile_pipe(config: &PipeConfig) -> Result<HttpPipe, ValidationError> {
    let pattern = compile_pattern(config)?;
    let action = Action::from_config(&config.name, &config.action)?;
    // Rewrite params come from this pipe's template only.
    let template = config.path.as_deref().and_then(|path| PathTemplate::parse(path).ok());
    let name = config.name.clone();

    Ok(Pipe::sync(pattern, move |req: &mut Request<Body>| {
        tracing::debug!(pipe = %name, "Applying action");
        let params = template
            .as_ref()
            .and_then(|template| template.compare(&current_path(&*req)))
            .unwrap_or_default();
        Ok(action.apply(req, &params))
    }))
}

/// Compile the single matcher of a pipe.
pub(crate) fn compile_pattern(config: &PipeConfig) -> Result<HttpPattern, ValidationError> {
    let pipe = config.name.as_str();

    match config.matcher_fields().as_slice() {
        [] => {
            return Err(ValidationError::MissingMatcher { pipe: pipe.to_string() });
        }
        [_] => {}
        found => {
            return Err(ValidationError::MultipleMatchers {
                pipe: pipe.to_string(),
                found: found.to_vec(),
            });
        }
    }

    if let Some(template) = &config.path {
        let template = PathTemplate::parse(template.as_str()).map_err(|err| {
            ValidationError::InvalidPath {
                pipe: pipe.to_string(),
                reason: err.to_string(),
            }
        })?;
        return Ok(Pattern::Template(template));
    }

    if let Some(source) = &config.regex {
        let regex = Regex::new(source).map_err(|err| ValidationError::InvalidRegex {
            pipe: pipe.to_string(),
            reason: err.to_string(),
        })?;
        return Ok(Pattern::regex(regex));
    }

    if let Some(method) = &config.method {
        let expected = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| {
            ValidationError::InvalidMethod {
                pipe: pipe.to_string(),
                method: method.clone(),
            }
        })?;
        return Ok(Pattern::predicate(move |req: &Request<Body>| req.method() == expected));
    }

    if let Some(header) = &config.header {
        let name = HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            ValidationError::InvalidHeaderName {
                pipe: pipe.to_string(),
                name: header.clone(),
            }
        })?;
        return Ok(Pattern::predicate(move |req: &Request<Body>| {
            req.headers().contains_key(&name)
        }));
    }

    Ok(Pattern::predicate(|_: &Request<Body>| true))
}
