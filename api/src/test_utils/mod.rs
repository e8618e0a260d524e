//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of a mocking crate?
//! - Manual mocks are explicit and easy to debug
//! - Seeding review graphs with builder methods reads better than
//!   expectation chains
//! - The fetch counters make cache assertions trivial

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
