//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build negotiator → Start listener
//!
//! Shutdown (signals.rs → HttpServer::run):
//!     SIGINT → Stop accepting → Drain in-flight requests → Exit
//! ```

pub mod signals;
