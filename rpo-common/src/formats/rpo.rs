//! RPO binary mesh format (.rpo)
//!
//! Little-endian container with a fixed prefix and a type-dependent header.
//!
//! # Layout
//! ```text
//! 0x00: magic "RPO1"
//! 0x04: vertex_count u32
//! 0x08: index_buffer_size u32 (bytes, informational)
//! 0x0C: type_tag u32
//! 0x10: type-specific header fields (not interpreted)
//! hdr:  index_count u32, where hdr = RpoType::header_len()
//! +4:   vertex records (vertex_count * VertexLayout::stride())
//! var:  index data (index_count * 2 bytes, u16)
//! ```

use std::fmt;

/// Magic bytes at the start of every RPO file
pub const RPO_MAGIC: &[u8; 4] = b"RPO1";

/// Size of one index in the index section (u16)
pub const RPO_INDEX_SIZE: usize = 2;

/// Fixed header fields that follow the magic (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RpoHeader {
    /// Number of vertex records
    pub vertex_count: u32,
    /// Size of the index buffer in bytes, as recorded by the exporter
    pub index_buffer_size: u32,
    /// Raw type tag, see [`RpoType`]
    pub type_tag: u32,
}

impl RpoHeader {
    pub const SIZE: usize = 12;

    /// Read header from the bytes immediately following the magic
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            vertex_count: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            index_buffer_size: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            type_tag: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }

    /// Resolve the type tag against the known type table
    pub fn rpo_type(&self) -> Result<RpoType, UnknownRpoType> {
        RpoType::try_from(self.type_tag)
    }
}

/// Per-vertex record layout of a decodable RPO variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// position: 3 × f32
    Position,
    /// position: 3 × f32, color: 4 × f32 (RGBA), normal: 3 × f32
    PositionColorNormal,
}

impl VertexLayout {
    /// Bytes per vertex record
    pub const fn stride(self) -> usize {
        match self {
            Self::Position => 12,
            Self::PositionColorNormal => 40,
        }
    }

    pub const fn has_color(self) -> bool {
        matches!(self, Self::PositionColorNormal)
    }

    pub const fn has_normal(self) -> bool {
        matches!(self, Self::PositionColorNormal)
    }
}

/// Every type tag the RPO format is known to use.
///
/// Each variant fixes both the header length (where `index_count` lives) and
/// whether the vertex records can be decoded. Variants without a
/// [`VertexLayout`] are recognized but cannot be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpoType {
    /// 0x0001
    Position,
    /// 0x0011
    Tag17,
    /// 0x0013
    Tag19,
    /// 0x0401
    Tag1025,
    /// 0x0403
    PositionColorNormal,
    /// 0x0C11
    Tag3089,
    /// 0x1001
    Tag4097,
    /// 0x2C11
    Tag11281,
}

impl RpoType {
    pub const ALL: [RpoType; 8] = [
        Self::Position,
        Self::Tag17,
        Self::Tag19,
        Self::Tag1025,
        Self::PositionColorNormal,
        Self::Tag3089,
        Self::Tag4097,
        Self::Tag11281,
    ];

    /// Raw tag value as stored in the header
    pub const fn tag(self) -> u32 {
        match self {
            Self::Position => 1,
            Self::Tag17 => 17,
            Self::Tag19 => 19,
            Self::Tag1025 => 1025,
            Self::PositionColorNormal => 1027,
            Self::Tag3089 => 3089,
            Self::Tag4097 => 4097,
            Self::Tag11281 => 11281,
        }
    }

    /// Absolute offset of the `index_count` field
    pub const fn header_len(self) -> u64 {
        match self {
            Self::Position => 44,
            Self::Tag17 | Self::Tag1025 | Self::Tag4097 => 52,
            Self::Tag19 | Self::PositionColorNormal => 60,
            Self::Tag3089 => 68,
            Self::Tag11281 => 76,
        }
    }

    /// Vertex record layout, or `None` for variants that cannot be decoded
    pub const fn vertex_layout(self) -> Option<VertexLayout> {
        match self {
            Self::Position => Some(VertexLayout::Position),
            Self::PositionColorNormal => Some(VertexLayout::PositionColorNormal),
            Self::Tag17
            | Self::Tag19
            | Self::Tag1025
            | Self::Tag3089
            | Self::Tag4097
            | Self::Tag11281 => None,
        }
    }

    pub const fn is_supported(self) -> bool {
        self.vertex_layout().is_some()
    }
}

impl TryFrom<u32> for RpoType {
    type Error = UnknownRpoType;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.tag() == tag)
            .ok_or(UnknownRpoType(tag))
    }
}

impl fmt::Display for RpoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {}", self.tag())
    }
}

/// A type tag that is absent from the type table
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown RPO type tag {0} (0x{0:04X})")]
pub struct UnknownRpoType(pub u32);
