use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] w2vgrep_vector_store::VectorStoreError),

    #[error("Empty query")]
    EmptyQuery,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Failed to read input: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write output: {0}")]
    Write(#[source] std::io::Error),
}

impl SearchError {
    /// True when the output sink went away (e.g. `w2vgrep ... | head`).
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Write(err) if err.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
