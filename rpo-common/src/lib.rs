//! Shared types for the RPO mesh format
//!
//! This crate provides the on-disk definitions used by:
//! - `rpo-export` (RPO → OBJ conversion tool)
//!
//! # Modules
//!
//! - [`formats`] - RPO header, type table and vertex record layouts

pub mod formats;

// Re-export commonly used format items
pub use formats::{
    RPO_INDEX_SIZE, RPO_MAGIC, RpoHeader, RpoType, UnknownRpoType, VertexLayout,
};
