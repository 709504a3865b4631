use thiserror::Error;

/// Failure reported by an external market collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed oracle response: {0}")]
    Malformed(String),
}
