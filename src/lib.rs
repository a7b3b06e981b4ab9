// Library root, shared by the binary in src/main.rs and the integration tests.

pub mod classifier;
pub mod config;
pub mod error;
pub mod logger;
pub mod server;
