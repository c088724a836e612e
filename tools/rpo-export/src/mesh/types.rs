//! Types for decoded RPO meshes

use rpo_common::RpoType;
use std::fmt;
use std::path::Path;
use std::slice::Chunks;

/// Number of indices per triangle face
pub(crate) const FACE_SIZE: usize = 3;

/// Geometry decoded from one RPO file
#[derive(Debug, Clone, PartialEq)]
pub struct RpoMesh {
    /// Source file name without its extension
    pub name: String,
    pub rpo_type: RpoType,
    pub vertex_count: u32,
    /// Index buffer size in bytes as recorded in the header (not used for decoding)
    pub index_buffer_size: u32,
    pub index_count: u32,
    /// One entry per vertex
    pub positions: Vec<[f32; 3]>,
    /// RGBA, one entry per vertex, or empty
    pub colors: Vec<[f32; 4]>,
    /// One entry per vertex, or empty
    pub normals: Vec<[f32; 3]>,
    /// Zero-based vertex references
    pub indices: Vec<u16>,
}

impl RpoMesh {
    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Indices grouped into triangles; the last group may hold 1 or 2 indices
    pub fn faces(&self) -> Chunks<'_, u16> {
        self.indices.chunks(FACE_SIZE)
    }

    /// Number of indices that reference a vertex past `vertex_count`
    pub fn out_of_range_indices(&self) -> usize {
        self.indices
            .iter()
            .filter(|&&index| u32::from(index) >= self.vertex_count)
            .count()
    }
}

/// Why a file was not converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Missing "RPO1" signature
    NotRpo,
    /// Known type tag without a vertex layout
    Unsupported(RpoType),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRpo => f.write_str("is not an RPO file"),
            Self::Unsupported(ty) => write!(f, "uses an unsupported format ({ty})"),
        }
    }
}

/// A file that decoded cleanly but cannot be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Original file name, extension included
    pub name: String,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}, it will not be converted", self.name, self.reason)
    }
}

/// Result of decoding one RPO stream
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Mesh(RpoMesh),
    Rejected(Rejection),
}

impl DecodeOutcome {
    pub fn mesh(&self) -> Option<&RpoMesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Mesh(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Mesh name for a source file name ("crate.rpo" -> "crate")
pub fn mesh_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}
