//! RPO binary mesh formats
//!
//! Only the read side is defined here. RPO files are produced by third-party
//! tooling; this workspace never writes them.

pub mod rpo;

pub use rpo::*;
