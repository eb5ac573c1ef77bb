//! Error types for the tipfeed core.

use thiserror::Error;

/// Core errors that can occur while parsing identity values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid document id: {0}")]
    InvalidDocumentId(String),

    #[error("unknown network: {0:?}")]
    UnknownNetwork(String),
}
