use std::path::{Path, PathBuf};

use enough::StopReason;

use crate::header::Compression;

/// Errors from BMP reading, writing and row conversion.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bitmap: {0}")]
    Format(String),

    #[error("unsupported bitmap: {0}")]
    Unsupported(Unsupported),

    #[error("invalid dimensions: {width}x{height}")]
    Size { width: i64, height: i64 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("{len} bytes at offset {offset} exceed buffer of {buffer_len} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    #[error("expected {expected} pixels, got {actual}")]
    PixelCountMismatch { expected: usize, actual: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

/// Valid BMP features this codec does not implement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Unsupported {
    #[error("compression mode {0}")]
    Compression(Compression),

    #[error("bit depth {0} (only 24-bit RGB is supported)")]
    BitDepth(u16),

    #[error("info header size {0} (at least 40 required)")]
    InfoHeaderSize(u32),
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}

impl From<Unsupported> for BitmapError {
    fn from(u: Unsupported) -> Self {
        BitmapError::Unsupported(u)
    }
}

impl BitmapError {
    /// Attach `path` to a bare stream error.
    pub(crate) fn at_path(self, path: &Path) -> Self {
        match self {
            BitmapError::Io(source) => BitmapError::File {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}
