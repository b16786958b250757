use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Lookup of a domain or shape id failed; the operation was aborted with
    /// no partial mutation committed.
    #[error("no element found for id `{id}`")]
    NotFound { id: String },
    /// An entity is missing an expected attached shape or sub-connection.
    #[error("inconsistent diagram state: {0}")]
    InconsistentState(String),
    /// The external layout engine rejected the request; no positions were
    /// applied.
    #[error("layout engine failed: {0}")]
    EngineFailure(String),
}

impl Error {
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
