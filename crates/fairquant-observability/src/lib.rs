//! Fairquant Observability
//!
//! Structured logging setup shared by the CLI and embedding services.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};
