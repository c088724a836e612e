//! rpo-export library
//!
//! Decodes RPO binary meshes and writes them as Wavefront OBJ text.

pub mod batch;
pub mod error;
pub mod mesh;

// Re-export the on-disk format definitions
pub use rpo_common::{RpoHeader, RpoType, UnknownRpoType, VertexLayout};

// Re-export key types for mesh conversion
pub use batch::{BatchSummary, ConvertJob, FailurePolicy, FileOutcome, convert_batch, convert_file};
pub use error::{ConvertError, DecodeError};
pub use mesh::{DecodeOutcome, RejectReason, Rejection, RpoMesh, decode_rpo, write_obj};
