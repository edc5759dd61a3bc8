//! Executor boundary: the process that runs exactly one operation per spawn.

pub mod server;

pub use server::{BoundaryExit, BoundaryServer, install_panic_logger};
