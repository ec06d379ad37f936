//! Error types for the chunked exporter

use thiserror::Error;

use crate::math::Region;

/// Main error type for the exporter
#[derive(Debug, Error)]
pub enum Error {
    /// Recursion floor reached with no admissible export
    #[error("Region too small to export: {0}")]
    RegionTooSmall(Region),

    /// The volume codec declined a region
    #[error("Codec declined {region}: {reason}")]
    Codec { region: Region, reason: String },

    /// Region rejected by the size ceilings
    #[error("Region exceeds size ceilings: {0}")]
    SizeInadmissible(Region),

    #[error("No output file specified")]
    BadOutputPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether a strategy can recover from this error by trying something else
    pub fn is_local(&self) -> bool {
        matches!(self, Error::Codec { .. } | Error::SizeInadmissible(_))
    }
}
