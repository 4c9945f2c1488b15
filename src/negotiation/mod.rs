//! Version negotiation subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     version list / options
//!     → config.rs (normalize, validate, bind default error)
//!     → NegotiationConfig (immutable, shared via Arc)
//!
//! Per request:
//!     query `version` | `accept-version` | `api-version`
//!     → context.rs (extract, attach RequestVersion)
//!     → matcher.rs (highest supported version satisfying the range)
//!     → middleware.rs
//!         matched  → annotate request, continue, set API-VERSION
//!         rejected → error.rs (reply with JSON, or forward the error)
//! ```
//!
//! # Design Decisions
//! - Stateless: every request is negotiated independently
//! - Malformed client input is a rejection, never a crash
//! - The requested version is attached before matching, so it is visible on failure

pub mod config;
pub mod context;
pub mod error;
pub mod matcher;
pub mod middleware;

pub use config::{validate_args, ConfigError, NegotiationConfig, NegotiationConfigBuilder};
pub use context::{RequestVersion, ACCEPT_VERSION, API_VERSION, VERSION_QUERY_PARAM};
pub use error::{DefaultErrorFactory, ErrorBody, ErrorFactory, VersionError};
pub use matcher::{SupportedVersion, VersionRange};
pub use middleware::{negotiate_version, Negotiation, Rejection, VersionNegotiator};
