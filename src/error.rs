//! Structural error type.
//!
//! Expected per-candidate outcomes (check failures, orphan references) are
//! plain data and never surface here; this enum covers the unexpected
//! conditions a detection unit's boundary catches and logs.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("staff #{staff} carries no line")]
    EmptyStaff { staff: u32 },

    #[error("degenerate scale: interline must be positive")]
    BadScale,
}
