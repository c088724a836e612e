//! Error types for RPO decoding and batch conversion

use rpo_common::UnknownRpoType;
use std::io;
use std::path::PathBuf;

/// Hard failure while decoding a single RPO stream.
///
/// Files that are simply not convertible (bad magic, unsupported variant) are
/// not errors; they decode to [`crate::mesh::DecodeOutcome::Rejected`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    UnknownType(#[from] UnknownRpoType),

    #[error("file ends inside the {section}")]
    Truncated { section: &'static str },

    #[error("I/O error while reading the {section}")]
    Io {
        section: &'static str,
        #[source]
        source: io::Error,
    },
}

impl DecodeError {
    /// Classify a failed read of `section`
    pub(crate) fn read(section: &'static str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated { section }
        } else {
            Self::Io { section, source }
        }
    }
}

/// Failure converting one file (or resolving the files of a batch)
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("'{}' was not found", .0.display())]
    MissingPath(PathBuf),

    #[error("failed to open '{}'", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode '{}'", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("failed to write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list '{}'", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
