//! FairQuant Core
//!
//! Core types, configuration, and traits for the FAIR risk quantification engine.

pub mod config;
pub mod error;
pub mod scenario;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::*;
pub use error::*;
pub use scenario::*;
pub use traits::*;
pub use types::*;
