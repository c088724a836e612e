//! Mesh converter (.rpo -> .obj)

mod obj;
mod rpo;
mod types;

// Re-export public API
pub use obj::{OBJ_BANNER, save_obj, write_obj};
pub use rpo::{decode_rpo, decode_rpo_file};
pub use types::{DecodeOutcome, RejectReason, Rejection, RpoMesh, mesh_name};
