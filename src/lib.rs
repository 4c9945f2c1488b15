//! Request-version negotiation for axum services.
//!
//! A client names the API version it wants, exactly or as a semver range, in
//! the `version` query parameter or the `accept-version` / `api-version`
//! headers. The negotiation middleware picks the highest supported version
//! that satisfies it and attaches a `RequestVersion` to the request, or
//! answers with a structured error. `VersionedRoute` then lets one path carry
//! a separate handler per API version.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod negotiation;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use negotiation::{negotiate_version, NegotiationConfig, RequestVersion, VersionError, VersionNegotiator};
pub use routing::{RouteDecision, RouteVersion, VersionedRoute};
