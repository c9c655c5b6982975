//! Built-in pipe actions for `http::Request`.
//!
//! # Responsibilities
//! - Compile an [`ActionConfig`] into ready-to-use header values and codes
//! - Apply the action to a request, producing a response or nothing
//! - Fill rewrite targets from the params the pipe's own template captured
//!
//! # Design Decisions
//! - All parsing happens at compile time; `apply` cannot fail
//! - `respond` and `redirect` short-circuit, `rewrite` and `set_header`
//!   mutate the request and let the stack continue

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::schema::ActionConfig;
use crate::config::validation::ValidationError;
use crate::routing::template::render;
use crate::routing::{PathParams, RoutePath};

/// A compiled action.
#[derive(Debug, Clone)]
pub enum Action {
    Respond {
        status: StatusCode,
        headers: HeaderMap,
        body: String,
    },
    Redirect {
        status: StatusCode,
        location: HeaderValue,
    },
    /// Target path; `:name` and `*name` segments are filled from params.
    Rewrite(String),
    SetHeader {
        name: HeaderName,
        value: HeaderValue,
    },
}

impl Action {
    /// Compile the action of pipe `pipe`.
    pub fn from_config(pipe: &str, config: &ActionConfig) -> Result<Self, ValidationError> {
        match config {
            ActionConfig::Respond(respond) => {
                let status = status_code(pipe, respond.status)?;
                let mut headers = HeaderMap::new();
                for (name, value) in &respond.headers {
                    let (name, value) = header_pair(pipe, name, value)?;
                    headers.insert(name, value);
                }
                Ok(Action::Respond {
                    status,
                    headers,
                    body: respond.body.clone(),
                })
            }
            ActionConfig::Redirect(redirect) => {
                let status = status_code(pipe, redirect.status)?;
                if !status.is_redirection() {
                    return Err(ValidationError::NotRedirect {
                        pipe: pipe.to_string(),
                        status: redirect.status,
                    });
                }
                let (_, location) =
                    header_pair(pipe, header::LOCATION.as_str(), &redirect.location)?;
                Ok(Action::Redirect { status, location })
            }
            ActionConfig::Rewrite(target) => {
                if !target.starts_with('/') {
                    return Err(ValidationError::InvalidRewrite {
                        pipe: pipe.to_string(),
                        target: target.clone(),
                    });
                }
                Ok(Action::Rewrite(target.clone()))
            }
            ActionConfig::SetHeader(set) => {
                let (name, value) = header_pair(pipe, &set.name, &set.value)?;
                Ok(Action::SetHeader { name, value })
            }
        }
    }

    /// Apply the action to `req`.
    ///
    /// `params` are the values captured by the pipe's template, empty for
    /// other matchers.
    pub fn apply(&self, req: &mut Request<Body>, params: &PathParams) -> Option<Response> {
        match self {
            Action::Respond { status, headers, body } => {
                let mut response = (*status, body.clone()).into_response();
                response.headers_mut().extend(headers.clone());
                Some(response)
            }
            Action::Redirect { status, location } => {
                let mut response = Response::new(Body::empty());
                *response.status_mut() = *status;
                response.headers_mut().insert(header::LOCATION, location.clone());
                Some(response)
            }
            Action::Rewrite(template) => {
                let target = render(template, params);
                tracing::debug!(path = %target, "Rewriting path");
                req.extensions_mut().insert(RoutePath::new(target));
                None
            }
            Action::SetHeader { name, value } => {
                req.headers_mut().insert(name.clone(), value.clone());
                None
            }
        }
    }
}

fn status_code(pipe: &str, status: u16) -> Result<StatusCode, ValidationError> {
    StatusCode::from_u16(status).map_err(|_| ValidationError::InvalidStatus {
        pipe: pipe.to_string(),
        status,
    })
}

fn header_pair(
    pipe: &str,
    name: &str,
    value: &str,
) -> Result<(HeaderName, HeaderValue), ValidationError> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| ValidationError::InvalidHeaderName {
            pipe: pipe.to_string(),
            name: name.to_string(),
        })?;
    let header_value =
        HeaderValue::from_str(value).map_err(|_| ValidationError::InvalidHeaderValue {
            pipe: pipe.to_string(),
            name: name.to_string(),
        })?;
    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{RedirectConfig, RespondConfig, SetHeaderConfig};
    use crate::routing::compare_path;

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_respond() {
        let config = ActionConfig::Respond(RespondConfig {
            status: 403,
            body: "forbidden".into(),
            headers: [("x-reason".to_string(), "admin".to_string())].into(),
        });
        let action = Action::from_config("gate", &config).unwrap();

        let response = action.apply(&mut request("/admin"), &PathParams::default()).unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()["x-reason"], "admin");
    }

    #[test]
    fn test_redirect() {
        let config = ActionConfig::Redirect(RedirectConfig {
            location: "/login".into(),
            status: 302,
        });
        let action = Action::from_config("login", &config).unwrap();

        let response = action.apply(&mut request("/account"), &PathParams::default()).unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[test]
    fn test_redirect_requires_3xx() {
        let config = ActionConfig::Redirect(RedirectConfig {
            location: "/login".into(),
            status: 200,
        });
        let err = Action::from_config("login", &config).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotRedirect {
                pipe: "login".into(),
                status: 200
            }
        );
    }

    #[test]
    fn test_rewrite_uses_captured_params() {
        let config = ActionConfig::Rewrite("/v2/users/:id".into());
        let action = Action::from_config("legacy", &config).unwrap();

        let mut req = request("/users/42");
        let params = compare_path("/users/:id", "/users/42").unwrap();

        assert!(action.apply(&mut req, &params).is_none());
        assert_eq!(req.extensions().get::<RoutePath>().unwrap().as_str(), "/v2/users/42");
        assert!(req.extensions().get::<PathParams>().is_none());
    }

    #[test]
    fn test_rewrite_must_be_absolute() {
        let err = Action::from_config("legacy", &ActionConfig::Rewrite("v2".into())).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRewrite { .. }));
    }

    #[test]
    fn test_set_header() {
        let config = ActionConfig::SetHeader(SetHeaderConfig {
            name: "x-edge".into(),
            value: "1".into(),
        });
        let action = Action::from_config("tag", &config).unwrap();

        let mut req = request("/");
        assert!(action.apply(&mut req, &PathParams::default()).is_none());
        assert_eq!(req.headers()["x-edge"], "1");

        let bad = ActionConfig::SetHeader(SetHeaderConfig {
            name: "bad header".into(),
            value: "1".into(),
        });
        assert!(matches!(
            Action::from_config("tag", &bad),
            Err(ValidationError::InvalidHeaderName { .. })
        ));
    }
}
