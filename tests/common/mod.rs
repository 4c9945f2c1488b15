//! Shared utilities for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower::ServiceExt;
use version_gate::{negotiate_version, RequestVersion, VersionNegotiator, VersionedRoute};

/// App with the negotiation middleware in front of an echo handler.
#[allow(dead_code)]
pub fn create_server(negotiator: VersionNegotiator) -> Router {
    Router::new()
        .route("/", get(|version: RequestVersion| async move { Json(version) }))
        .layer(middleware::from_fn_with_state(negotiator, negotiate_version))
}

/// App with one route for `version` (200) and a catch-all route (201) on the same path.
#[allow(dead_code)]
pub fn create_routing_server(versions: &[&str], version: &str) -> Router {
    let negotiator = VersionNegotiator::from_versions(versions.iter().copied()).unwrap();
    let echo = |status: StatusCode| {
        get(move |version: RequestVersion| async move { (status, Json(version)) })
    };
    let route = VersionedRoute::new()
        .version(version, echo(StatusCode::OK))
        .unwrap()
        .fallback(echo(StatusCode::CREATED));

    Router::new()
        .route("/", route.into_method_router())
        .layer(middleware::from_fn_with_state(negotiator, negotiate_version))
}

pub fn get_request(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

pub async fn send(app: Router, request: axum::http::request::Builder) -> Response {
    app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
