use thiserror::Error;

pub type AtlasResult<T> = Result<T, AtlasError>;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("narrative request failed: {0}")]
    Network(String),

    #[error("narrative response is not valid json: {0}")]
    Parse(String),

    #[error("narrative response does not match the report schema: {0}")]
    SchemaMismatch(String),

    #[error("no data received from the narrative backend")]
    EmptyResponse,

    #[error("API key is not configured")]
    MissingCredential,

    #[error("boundary dataset failed to load: {0}")]
    BoundaryDatasetLoad(String),
}

impl AtlasError {
    /// True for failures of the narrative request/response cycle.
    #[must_use]
    pub fn is_narrative_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Parse(_) | Self::SchemaMismatch(_) | Self::EmptyResponse
        )
    }
}
