//! Error types
//!
//! Every upstream call returns one of these explicitly so callers decide
//! what to ignore. Only a failed progress reset is ever swallowed.

use thiserror::Error;

/// Jellyfin catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("catalog returned HTTP {0}")]
    Rejected(u16),

    #[error("malformed catalog response: {0}")]
    Decode(String),

    #[error("catalog returned no item for id {0}")]
    EmptyResult(String),
}

/// Roku device errors
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("device unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("device rejected launch with HTTP {0}")]
    Rejected(u16),
}

/// Failures of a whole play request
#[derive(Error, Debug)]
pub enum PlayError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("no playable episodes under {0}")]
    NoPlayableDescendants(String),

    #[error("item {id} has unsupported type {kind}")]
    UnsupportedItemKind { id: String, kind: String },

    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl CatalogError {
    /// Short name of the failure, safe to show to callers
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Unreachable(_) => "CatalogUnreachable",
            CatalogError::Rejected(_) => "CatalogRejected",
            CatalogError::Decode(_) => "CatalogDecodeError",
            CatalogError::EmptyResult(_) => "CatalogEmptyResult",
        }
    }
}

impl DeviceError {
    /// Short name of the failure, safe to show to callers
    pub fn kind(&self) -> &'static str {
        match self {
            DeviceError::Unreachable(_) => "DeviceUnreachable",
            DeviceError::Rejected(_) => "DeviceRejected",
        }
    }
}

impl PlayError {
    /// Short name of the failure, safe to show to callers
    pub fn kind(&self) -> &'static str {
        match self {
            PlayError::Catalog(e) => e.kind(),
            PlayError::NoPlayableDescendants(_) => "NoPlayableDescendants",
            PlayError::UnsupportedItemKind { .. } => "UnsupportedItemKind",
            PlayError::Device(e) => e.kind(),
        }
    }

    /// True when the failure happened before any side effect
    ///
    /// A progress reset never produces a `PlayError` (the player logs it and
    /// launches anyway), so every `Catalog` error comes from resolution.
    pub fn is_resolution_failure(&self) -> bool {
        !matches!(self, PlayError::Device(_))
    }
}
