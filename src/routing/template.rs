//! Path template comparison.
//!
//! # Responsibilities
//! - Compile route templates such as `/users/:id` once, at stack construction
//! - Compare a concrete request path against a template
//! - Expose the captured segments as [`PathParams`]
//! - Fill a rewrite target from captured params
//!
//! # Template Syntax
//! Templates are `matchit` routes:
//! - `:name` matches one segment and captures it under `name`
//! - `*name` as the last segment matches the rest of the path
//! - anything else matches literally (case-sensitive, trailing slash included)
//!
//! # Design Decisions
//! - Each template owns a single-route `matchit::Router`
//! - Templates `matchit` rejects never match; [`PathTemplate::parse`] reports
//!   why for callers that want to validate up front
//! - No percent-decoding; segments are compared as they appear in the path

use std::fmt;

use matchit::{InsertError, Router};

/// A compiled route template.
pub struct PathTemplate {
    source: String,
    router: Router<()>,
}

impl PathTemplate {
    /// Compile a template, failing if `matchit` rejects it.
    pub fn parse(template: impl Into<String>) -> Result<Self, InsertError> {
        let source = template.into();
        let mut router = Router::new();
        router.insert(source.clone(), ())?;
        Ok(Self { source, router })
    }

    fn lenient(source: String) -> Self {
        match Self::parse(source.clone()) {
            Ok(template) => template,
            Err(err) => {
                tracing::warn!(template = %source, error = %err, "Path template never matches");
                Self {
                    source,
                    router: Router::new(),
                }
            }
        }
    }

    /// The template as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compare `path` against this template.
    ///
    /// Returns the captured parameters when the path matches, `None` otherwise.
    pub fn compare(&self, path: &str) -> Option<PathParams> {
        let matched = self.router.at(path).ok()?;
        Some(matched.params.iter().collect())
    }
}

impl fmt::Debug for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathTemplate").field(&self.source).finish()
    }
}

impl From<&str> for PathTemplate {
    fn from(template: &str) -> Self {
        Self::lenient(template.to_string())
    }
}

impl From<String> for PathTemplate {
    fn from(template: String) -> Self {
        Self::lenient(template)
    }
}

/// Compare a template against a concrete path in one call.
pub fn compare_path(template: &str, path: &str) -> Option<PathParams> {
    PathTemplate::parse(template).ok()?.compare(path)
}

/// Substitute `:name` and `*name` segments of `template` with values from
/// `params`. Placeholders without a value are kept verbatim.
pub fn render(template: &str, params: &PathParams) -> String {
    template
        .split('/')
        .map(|segment| {
            let name = segment.strip_prefix(':').or_else(|| segment.strip_prefix('*'));
            match name.and_then(|name| params.get(name)) {
                Some(value) => value,
                None => segment,
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Parameters captured by a template match, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    /// Look up a captured value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'k, 'v> FromIterator<(&'k str, &'v str)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (&'k str, &'v str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }
}
