//! Running a stack in front of an axum router.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::Path;
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use regex::Regex;
use tower::{Layer, ServiceExt};

use middleware_stack::config::{build_stack, parse_config};
use middleware_stack::{middleware_stack, pipe_fn, MiddlewareStack, Pattern, StackLayer};

mod common;
use common::Calls;

type Req = Request<Body>;

fn app() -> Router {
    Router::new()
        .route("/", get(|| async { "home" }))
        .route("/users/{id}", get(|Path(id): Path<String>| async move { format!("user {}", id) }))
        .route("/echo", get(|uri: Uri| async move { uri.to_string() }))
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get_request(uri: &str) -> Req {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_pass_through_reaches_inner_service() {
    let seen = Calls::default();
    let seen_calls = seen.clone();
    let stack: MiddlewareStack<Req, Response, Infallible> = middleware_stack([pipe_fn(
        Pattern::predicate(|_: &Req| true),
        move |_req: &mut Req| {
            seen_calls.hit();
            Ok(None)
        },
    )]);

    let service = StackLayer::new(stack).layer(app());
    let response = service.oneshot(get_request("/users/42")).await.unwrap();

    assert!(seen.called());
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "user 42");
}

#[tokio::test]
async fn test_short_circuit_skips_inner_service() {
    let stack: MiddlewareStack<Req, Response, Infallible> = middleware_stack([pipe_fn(
        Regex::new("^/users/").unwrap(),
        |_req: &mut Req| Ok(Some((StatusCode::FORBIDDEN, "blocked").into_response())),
    )]);

    let service = StackLayer::new(stack).layer(app());

    let response = service.clone().oneshot(get_request("/users/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(response).await, "blocked");

    let response = service.oneshot(get_request("/")).await.unwrap();
    assert_eq!(body_text(response).await, "home");
}

#[tokio::test]
async fn test_rewrite_changes_forwarded_uri() {
    let config = parse_config(
        r#"
        [[pipes]]
        name = "legacy-profile"
        path = "/profile/:id"
        action = { rewrite = "/users/:id" }
        "#,
    )
    .unwrap();
    let service = StackLayer::new(build_stack(&config).unwrap()).layer(app());

    let response = service.clone().oneshot(get_request("/profile/9")).await.unwrap();
    assert_eq!(body_text(response).await, "user 9");

    let config = parse_config(
        r#"
        [[pipes]]
        name = "to-echo"
        path = "/old"
        action = { rewrite = "/echo" }
        "#,
    )
    .unwrap();
    let service = StackLayer::new(build_stack(&config).unwrap()).layer(app());

    let response = service.oneshot(get_request("/old?keep=1")).await.unwrap();
    assert_eq!(body_text(response).await, "/echo?keep=1");
}

#[tokio::test]
async fn test_errors_become_responses() {
    type Rejection = (StatusCode, &'static str);
    let stack: MiddlewareStack<Req, Response, Rejection> = middleware_stack([pipe_fn(
        "/users/:id",
        |_req: &mut Req| Err((StatusCode::SERVICE_UNAVAILABLE, "directory offline")),
    )]);

    let service = StackLayer::new(stack).layer(app());
    let response = service.oneshot(get_request("/users/1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_text(response).await, "directory offline");
}

#[tokio::test]
async fn test_router_layer() {
    let config = parse_config(
        r#"
        [[pipes]]
        name = "login"
        header = "x-anonymous"
        action = { redirect = { location = "/login" } }
        "#,
    )
    .unwrap();
    let app = app().layer(StackLayer::new(build_stack(&config).unwrap()));

    let anonymous = Request::builder()
        .uri("/")
        .header("x-anonymous", "1")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(anonymous).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()["location"], "/login");

    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(body_text(response).await, "home");
}
