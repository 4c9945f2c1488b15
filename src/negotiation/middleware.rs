//! Version negotiation middleware.
//!
//! Mount once per application:
//!
//! ```no_run
//! use axum::{middleware, routing::get, Router};
//! use version_gate::negotiation::{negotiate_version, VersionNegotiator};
//!
//! let negotiator = VersionNegotiator::from_versions(["1.0.0", "2.0.0"]).unwrap();
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "ok" }))
//!     .layer(middleware::from_fn_with_state(negotiator, negotiate_version));
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::negotiation::config::{validate_args, ConfigError, NegotiationConfig};
use crate::negotiation::context::{requested_version, RequestVersion, API_VERSION};
use crate::negotiation::error;
use crate::negotiation::matcher::{self, SupportedVersion};
use crate::observability::metrics;

/// Outcome of negotiating one requested version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation<'a> {
    Matched(&'a SupportedVersion),
    Rejected(Rejection),
}

/// Why negotiation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No version supplied while negotiation is mandatory.
    Missing,
    /// No supported version satisfies the request, or the request is malformed.
    Unsatisfied,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Missing => "missing",
            Rejection::Unsatisfied => "unsatisfied",
        }
    }
}

/// Negotiates request versions against an immutable configuration.
#[derive(Debug, Clone)]
pub struct VersionNegotiator {
    config: Arc<NegotiationConfig>,
}

impl VersionNegotiator {
    pub fn new(config: NegotiationConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Negotiator with default policy for a bare list of versions.
    pub fn from_versions<I, S>(versions: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        NegotiationConfig::new(versions).map(Self::new)
    }

    /// Negotiator from dynamic input, see `validate_args`.
    pub fn from_value(args: &Value) -> Result<Self, ConfigError> {
        validate_args(args).map(Self::new)
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Decide which supported version serves `requested`.
    pub fn negotiate(&self, requested: Option<&str>) -> Negotiation<'_> {
        let versions = self.config.versions();
        let selected = match requested {
            Some(range) => matcher::best_match(range, versions).ok_or(Rejection::Unsatisfied),
            None if self.config.is_mandatory() => Err(Rejection::Missing),
            None => matcher::max_version(versions).ok_or(Rejection::Unsatisfied),
        };

        match selected {
            Ok(version) => Negotiation::Matched(version),
            Err(rejection) => Negotiation::Rejected(rejection),
        }
    }
}

/// Middleware function for version negotiation.
pub async fn negotiate_version(
    State(negotiator): State<VersionNegotiator>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let requested = requested_version(request.uri(), request.headers());
    let mut context = RequestVersion::requested(requested);

    // Visible downstream before matching
    request.extensions_mut().insert(context.clone());

    let config = negotiator.config();
    match negotiator.negotiate(context.requested.as_deref()) {
        Negotiation::Matched(version) => {
            tracing::debug!(
                requested = ?context.requested,
                matched = %version,
                "Version negotiated"
            );
            metrics::record_negotiation("matched");

            context.matched = Some(version.as_str().to_string());
            request.extensions_mut().insert(context);

            let mut response = next.run(request).await;
            if config.send_version_header() {
                if let Ok(value) = HeaderValue::from_str(version.as_str()) {
                    response.headers_mut().entry(API_VERSION).or_insert(value);
                }
            }
            response
        }
        Negotiation::Rejected(rejection) => {
            tracing::warn!(
                requested = ?context.requested,
                reason = rejection.as_str(),
                send_reply = config.send_reply(),
                "Version negotiation failed"
            );
            metrics::record_negotiation(rejection.as_str());

            let mut response = error::respond(config.error_factory(), config.send_reply());
            response.extensions_mut().insert(context);
            response
        }
    }
}
