//! Vigil Observability
//!
//! Process-wide logging setup for binaries embedding the Vigil crates.

pub mod logging;

pub use logging::{LoggingConfig, build_filter, init_tracing};
