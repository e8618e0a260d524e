//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod analyzer_config;
pub mod analyzer_service;
pub mod cache;

pub use analyzer_service::R4rAnalyzerService;
// Re-export scoring functions and policy constants for public API
#[allow(unused_imports)]
pub use analyzer_config::*;
#[allow(unused_imports)]
pub use analyzer_service::{composite_score, connection_score};
