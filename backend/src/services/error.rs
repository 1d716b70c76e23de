//! Errors raised by the dashboard pipeline.

use crate::sources::FetchError;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure of one pipeline pass.
///
/// An all-zero-view collection is not represented here: it yields an empty
/// histogram.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A collaborator failed; the collection is left unchanged.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Histogram or filter requested before any item is known.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Bad slider bounds or bin count.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

impl PipelineError {
    pub fn empty_collection(operation: &str) -> Self {
        PipelineError::InvalidState(format!("{} requires a non-empty collection", operation))
    }
}
