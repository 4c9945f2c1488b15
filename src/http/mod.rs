//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing, timeout)
//!     → negotiation middleware (RequestVersion attached, or error)
//!     → handlers.rs (echo, versioned greeting)
//!     → API-VERSION header added on the way out
//! ```

pub mod handlers;
pub mod server;

pub use server::HttpServer;
