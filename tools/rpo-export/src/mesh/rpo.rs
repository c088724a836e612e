//! RPO mesh decoding

use super::types::{DecodeOutcome, RejectReason, Rejection, RpoMesh, mesh_name};
use crate::error::{ConvertError, DecodeError};
use rpo_common::{RPO_INDEX_SIZE, RPO_MAGIC, RpoHeader, VertexLayout};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// Upper bound on up-front allocation; counts come straight from the file.
const MAX_PREALLOCATED_ELEMENTS: usize = 1 << 16;

/// Decoded vertex attributes, one entry per vertex in each non-empty array
#[derive(Default)]
struct VertexArrays {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    normals: Vec<[f32; 3]>,
}

/// Open and decode an RPO file
///
/// The mesh is named after the file stem; rejections carry the full file name.
pub fn decode_rpo_file(path: &Path) -> Result<DecodeOutcome, ConvertError> {
    let file = File::open(path).map_err(|source| ConvertError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    decode_rpo(BufReader::new(file), &file_name).map_err(|source| ConvertError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode an RPO stream
///
/// `file_name` is the logical source name; the mesh name is derived from it
/// with the extension stripped.
///
/// Returns `Rejected` for streams without the RPO signature and for known but
/// undecodable variants. Unknown type tags and short reads are errors.
pub fn decode_rpo<R: Read + Seek>(
    mut reader: R,
    file_name: &str,
) -> Result<DecodeOutcome, DecodeError> {
    if !read_magic(&mut reader)? {
        return Ok(DecodeOutcome::Rejected(Rejection {
            name: file_name.to_string(),
            reason: RejectReason::NotRpo,
        }));
    }

    let mut header_bytes = [0u8; RpoHeader::SIZE];
    reader
        .read_exact(&mut header_bytes)
        .map_err(|e| DecodeError::read("header", e))?;
    let header = RpoHeader::from_bytes(&header_bytes)
        .ok_or(DecodeError::Truncated { section: "header" })?;
    let rpo_type = header.rpo_type()?;

    tracing::debug!(
        "{}: {}, {} vertices, index buffer {} bytes",
        file_name,
        rpo_type,
        header.vertex_count,
        header.index_buffer_size
    );

    let Some(layout) = rpo_type.vertex_layout() else {
        return Ok(DecodeOutcome::Rejected(Rejection {
            name: file_name.to_string(),
            reason: RejectReason::Unsupported(rpo_type),
        }));
    };

    reader
        .seek(SeekFrom::Start(rpo_type.header_len()))
        .map_err(|e| DecodeError::read("header", e))?;
    let index_count = read_u32(&mut reader, "index count")?;

    let vertices = read_vertices(&mut reader, layout, header.vertex_count)?;
    let indices = read_indices(&mut reader, index_count)?;

    Ok(DecodeOutcome::Mesh(RpoMesh {
        name: mesh_name(file_name),
        rpo_type,
        vertex_count: header.vertex_count,
        index_buffer_size: header.index_buffer_size,
        index_count,
        positions: vertices.positions,
        colors: vertices.colors,
        normals: vertices.normals,
        indices,
    }))
}

/// Read the 4-byte signature. A stream shorter than the signature is not an RPO file.
fn read_magic<R: Read>(reader: &mut R) -> Result<bool, DecodeError> {
    let mut magic = [0u8; 4];
    match reader.read_exact(&mut magic) {
        Ok(()) => Ok(&magic == RPO_MAGIC),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(DecodeError::read("signature", e)),
    }
}

fn read_u32<R: Read>(reader: &mut R, section: &'static str) -> Result<u32, DecodeError> {
    let mut bytes = [0u8; 4];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| DecodeError::read(section, e))?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_vertices<R: Read>(
    reader: &mut R,
    layout: VertexLayout,
    vertex_count: u32,
) -> Result<VertexArrays, DecodeError> {
    let count = preallocation(vertex_count);
    let mut arrays = VertexArrays {
        positions: Vec::with_capacity(count),
        ..Default::default()
    };
    if layout.has_color() {
        arrays.colors.reserve(count);
    }
    if layout.has_normal() {
        arrays.normals.reserve(count);
    }

    let mut record = [0u8; VertexLayout::PositionColorNormal.stride()];
    let record = &mut record[..layout.stride()];

    for _ in 0..vertex_count {
        reader
            .read_exact(record)
            .map_err(|e| DecodeError::read("vertex data", e))?;

        // Record order: position, color, normal
        arrays.positions.push(read_f32s(&record[0..12]));
        if layout.has_color() {
            arrays.colors.push(read_f32s(&record[12..28]));
        }
        if layout.has_normal() {
            arrays.normals.push(read_f32s(&record[28..40]));
        }
    }

    Ok(arrays)
}

fn read_indices<R: Read>(reader: &mut R, index_count: u32) -> Result<Vec<u16>, DecodeError> {
    let mut indices = Vec::with_capacity(preallocation(index_count));
    let mut bytes = [0u8; RPO_INDEX_SIZE];

    for _ in 0..index_count {
        reader
            .read_exact(&mut bytes)
            .map_err(|e| DecodeError::read("index data", e))?;
        indices.push(u16::from_le_bytes(bytes));
    }

    Ok(indices)
}

/// Unpack `N` little-endian f32 values from `bytes` (at least `N * 4` long)
fn read_f32s<const N: usize>(bytes: &[u8]) -> [f32; N] {
    std::array::from_fn(|i| {
        let o = i * 4;
        f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
    })
}

fn preallocation(count: u32) -> usize {
    (count as usize).min(MAX_PREALLOCATED_ELEMENTS)
}
