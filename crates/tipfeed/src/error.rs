//! Error types for the comment service.

use thiserror::Error;

use tipfeed_auth::OracleError;
use tipfeed_store::StoreError;

/// Server faults surfaced by service operations.
///
/// Terminal denials (no address, no tip, bad signature, rate limited) are
/// not errors; they are returned as outcome variants. These errors cover
/// the cases reported to the caller as generic failures, and the core
/// never retries them internally.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An oracle lookup failed or timed out on the authorization path.
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// The comment store failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
