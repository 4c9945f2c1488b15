//! Per-path dispatch across versioned routes.
//!
//! # Responsibilities
//! - Hold the routes registered for one path, in registration order
//! - Hand the request to the first route whose version matches and
//!   which handles the request method
//! - Fall through to an optional fallback, else 404
//!
//! # Design Decisions
//! - axum has no "next route" signal, so delegation is resolved here
//! - A versioned route without a handler for the method hands the
//!   untouched request back through its method fallback
//! - Immutable after construction; cloning shares the route list

use std::sync::{Arc, Mutex};

use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
};
use tower::ServiceExt;

use crate::negotiation::config::ConfigError;
use crate::negotiation::RequestVersion;
use crate::routing::matcher::{RouteDecision, RouteVersion};

/// Several route definitions for one path, one per API version.
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use version_gate::routing::VersionedRoute;
///
/// let greeting = VersionedRoute::new()
///     .version("1.0.0", get(|| async { "hello" })).unwrap()
///     .version("2.0.0", get(|| async { "hello, world" })).unwrap();
/// let app: Router = Router::new().route("/greeting", greeting.into_method_router());
/// ```
#[derive(Clone, Default)]
pub struct VersionedRoute {
    routes: Vec<(RouteVersion, MethodRouter)>,
    fallback: Option<MethodRouter>,
}

impl VersionedRoute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route for `version`. Fails if `version` is not valid semver.
    pub fn version(self, version: &str, route: MethodRouter) -> Result<Self, ConfigError> {
        Ok(self.on(RouteVersion::new(version)?, route))
    }

    /// Register a route for an already parsed version. Methods `route`
    /// has no handler for move on to the next route.
    pub fn on(mut self, version: RouteVersion, route: MethodRouter) -> Self {
        self.routes.push((version, pass_unhandled_methods(route)));
        self
    }

    /// Route taking every request no versioned route accepted.
    pub fn fallback(mut self, route: MethodRouter) -> Self {
        self.fallback = Some(route);
        self
    }

    pub fn versions(&self) -> impl Iterator<Item = &RouteVersion> {
        self.routes.iter().map(|(version, _)| version)
    }

    /// Run the request through the first route that accepts it.
    pub async fn dispatch(&self, mut request: Request) -> Response {
        let context = request.extensions().get::<RequestVersion>().cloned();

        for (version, route) in &self.routes {
            if version.decide_for(context.as_ref()) == RouteDecision::Delegate {
                tracing::debug!(route_version = %version, "Delegating to next route");
                continue;
            }

            let response = call(route.clone(), request).await;
            let returned = response
                .extensions()
                .get::<Unhandled>()
                .and_then(Unhandled::take);
            match returned {
                Some(unhandled) => {
                    tracing::debug!(
                        route_version = %version,
                        method = %unhandled.method(),
                        "Method not handled, delegating to next route"
                    );
                    request = unhandled;
                }
                None => return response,
            }
        }

        match &self.fallback {
            Some(route) => call(route.clone(), request).await,
            None => {
                tracing::debug!(
                    matched = ?context.as_ref().and_then(|c| c.matched.as_deref()),
                    "No route for negotiated version"
                );
                StatusCode::NOT_FOUND.into_response()
            }
        }
    }

    /// Convert into a handler mountable with `Router::route`.
    pub fn into_method_router(self) -> MethodRouter {
        let shared = Arc::new(self);
        any(move |request: Request| {
            let shared = shared.clone();
            async move { shared.dispatch(request).await }
        })
    }
}

/// A request a versioned route had no method handler for.
#[derive(Clone)]
struct Unhandled(Arc<Mutex<Option<Request>>>);

impl Unhandled {
    fn take(&self) -> Option<Request> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

fn pass_unhandled_methods(route: MethodRouter) -> MethodRouter {
    route.fallback(|request: Request| async move {
        let mut response = StatusCode::METHOD_NOT_ALLOWED.into_response();
        response
            .extensions_mut()
            .insert(Unhandled(Arc::new(Mutex::new(Some(request)))));
        response
    })
}

async fn call(route: MethodRouter, request: Request) -> Response {
    match route.oneshot(request).await {
        Ok(response) => response,
        Err(err) => match err {},
    }
}
