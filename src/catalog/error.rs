use sea_orm::DbErr;
use thiserror::Error;

/// Failures that can escape the catalog query path.
///
/// Malformed query-string input never shows up here: the normalizer degrades
/// it to defaults instead.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The store could not be reached or a statement failed at the driver level.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] DbErr),

    /// An internal contract was broken before any statement was issued.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl CatalogError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
