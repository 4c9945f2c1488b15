//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (addresses, timeouts, negotiation options)
//!     → ServerConfig (validated, immutable)
//!     → NegotiationConfig built from the [negotiation] table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All server fields have defaults; only `[negotiation] versions` is required
//! - The `[negotiation]` table goes through the same validation as programmatic
//!   options, so file errors read the same

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, LoadError};
pub use schema::{ListenerConfig, ObservabilityConfig, ServerConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
