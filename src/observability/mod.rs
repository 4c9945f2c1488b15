//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! negotiation / routing produce:
//!     → tracing events (requested, matched, rejection reason)
//!     → metrics.rs (negotiation outcomes, route decisions)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never formatted strings, for request data
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
