//! Runtime configuration for the demo tool.

use crate::ledger::{LedgerParams, Scale, SystemGeometry};
use crate::error::DetectError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the JSON report, if anywhere.
    pub json_out: Option<PathBuf>,
}

/// Full runtime configuration: input image, sheet geometry and tuning.
#[derive(Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Binarized sheet image; also serves as the staff-free source unless
    /// `no_staff_path` points at a dedicated one.
    pub input_path: PathBuf,
    pub no_staff_path: Option<PathBuf>,
    pub scale: Scale,
    pub systems: Vec<SystemGeometry>,
    #[serde(default)]
    pub params: LedgerParams,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, DetectError> {
    let contents = fs::read_to_string(path).map_err(|source| DetectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| DetectError::Config {
        path: path.to_path_buf(),
        source,
    })
}
