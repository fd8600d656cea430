//! Common traits and helpers used across the devecho library
//!
//! This module contains the server trait and the test-server helper used by
//! the integration tests and benches.

pub mod test_utils;
pub mod traits;

pub use test_utils::spawn_test_server;
pub use traits::EchoServerTrait;
