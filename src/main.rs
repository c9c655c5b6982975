//! middleware-stack CLI.
//!
//! Loads a stack configuration and runs a single request through it without
//! opening any socket, printing what the stack decided as JSON.
//!
//! ```text
//! middleware-stack --config stack.toml -X POST -H "x-debug: 1" http://localhost/admin/users
//! ```

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    response::Response,
};
use clap::Parser;
use serde_json::{json, Map, Value};

use middleware_stack::config::{build_stack, load_config};
use middleware_stack::current_path;
use middleware_stack::observability::logging;

#[derive(Parser)]
#[command(name = "middleware-stack")]
#[command(about = "Dispatch one request through a configured middleware stack", long_about = None)]
struct Cli {
    /// Stack configuration file (TOML).
    #[arg(short, long)]
    config: PathBuf,

    /// Request method.
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header, as "name: value". May be repeated.
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Request URL, absolute or path-only.
    url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.observability);

    let stack = build_stack(&config)?;
    tracing::info!(config = %cli.config.display(), pipes = stack.len(), "Middleware stack loaded");

    let mut builder = Request::builder().method(cli.method.as_str()).uri(cli.url.as_str());
    for (name, value) in &cli.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let mut request = builder.body(Body::empty())?;

    let report = match stack.dispatch(&mut request).await {
        Ok(Some(response)) => response_report(response).await?,
        Ok(None) => pass_report(&request),
        Err(never) => match never {},
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected \"name: value\", got {:?}", raw)),
    }
}

async fn response_report(response: Response) -> Result<Value, Box<dyn std::error::Error>> {
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(json!({
        "outcome": "response",
        "status": parts.status.as_u16(),
        "headers": headers_json(&parts.headers),
        "body": String::from_utf8_lossy(&bytes),
    }))
}

fn pass_report(request: &Request<Body>) -> Value {
    json!({
        "outcome": "pass",
        "method": request.method().as_str(),
        "path": current_path(request),
        "headers": headers_json(request.headers()),
    })
}

fn headers_json(headers: &HeaderMap) -> Value {
    let map: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().unwrap_or("<binary>");
            (name.as_str().to_string(), Value::from(value))
        })
        .collect();
    Value::Object(map)
}
