//! Configuration schema definitions.
//!
//! This module defines the declarative form of a middleware stack.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration: observability settings plus the ordered pipes.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StackConfig {
    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Pipes, evaluated in file order.
    pub pipes: Vec<PipeConfig>,
}

/// A single pipe: exactly one matcher and one action.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipeConfig {
    /// Pipe identifier for logging.
    pub name: String,

    /// Route template matched against the path (e.g. "/users/:id").
    #[serde(default)]
    pub path: Option<String>,

    /// Regular expression matched against the path.
    #[serde(default)]
    pub regex: Option<String>,

    /// HTTP method the request must use.
    #[serde(default)]
    pub method: Option<String>,

    /// Header the request must carry.
    #[serde(default)]
    pub header: Option<String>,

    /// Match every request.
    #[serde(default)]
    pub always: bool,

    /// What to do when the pipe matches.
    pub action: ActionConfig,
}

impl PipeConfig {
    /// Names of the matcher fields that are set.
    pub fn matcher_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.path.is_some() {
            fields.push("path");
        }
        if self.regex.is_some() {
            fields.push("regex");
        }
        if self.method.is_some() {
            fields.push("method");
        }
        if self.header.is_some() {
            fields.push("header");
        }
        if self.always {
            fields.push("always");
        }
        fields
    }
}

/// Action taken by a matching pipe.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionConfig {
    /// Answer directly (short-circuits).
    Respond(RespondConfig),

    /// Redirect the client (short-circuits).
    Redirect(RedirectConfig),

    /// Rewrite the path seen by later pipes and the inner service.
    /// `:name` placeholders are filled from the matched template.
    Rewrite(String),

    /// Set a request header and continue.
    SetHeader(SetHeaderConfig),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RespondConfig {
    #[serde(default = "default_respond_status")]
    pub status: u16,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RedirectConfig {
    pub location: String,

    #[serde(default = "default_redirect_status")]
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SetHeaderConfig {
    pub name: String,
    pub value: String,
}

fn default_respond_status() -> u16 {
    200
}

fn default_redirect_status() -> u16 {
    307
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
