//! Error types for the authorization layer.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by oracle lookups.
///
/// The gate never converts these into a grant: any oracle failure on the
/// authorization path denies access and surfaces the fault to the caller.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The lookup itself failed (network, ledger, or backend fault).
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// The oracle did not answer within the configured bound.
    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for authorization operations.
pub type Result<T> = std::result::Result<T, OracleError>;
