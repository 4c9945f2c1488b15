//! Exact-version routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request (already negotiated, carries RequestVersion)
//!     → router.rs (routes registered for this path, in order)
//!     → matcher.rs (route version == matched version?)
//!         Continue → this route handles the request
//!         Delegate → try the next route
//!     → fallback, or 404 when no route accepts
//! ```
//!
//! # Design Decisions
//! - Route versions validated when routes are registered, not per request
//! - No negotiation here; the negotiation middleware must run first
//! - First accepting route wins (registration order)

pub mod matcher;
pub mod router;

pub use matcher::{RouteDecision, RouteVersion};
pub use router::VersionedRoute;
