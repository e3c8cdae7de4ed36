use thiserror::Error;

use crate::types::Representation;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Format error: {0}")]
    FormatError(String),

    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Incompatible vector types: {left} vs {right}")]
    IncompatibleVectorTypes {
        left: Representation,
        right: Representation,
    },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },
}

impl VectorStoreError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::FormatError(msg.into())
    }

    pub fn not_found(token: impl Into<String>) -> Self {
        Self::NotFound(token.into())
    }

    /// True for errors the matcher treats as "skip this comparison".
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::IncompatibleVectorTypes { .. } | Self::InvalidDimension { .. }
        )
    }
}
