use thiserror::Error;

/// Errors returned by the external recipe lookup API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure or undecodable response body
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// No credential configured for the API
    #[error("Missing API key: set api.api_key in config.toml or SPOONACULAR_API_KEY")]
    MissingApiKey,
}

/// Errors raised by a persisted key-value store
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted value could not be (de)serialized
    #[error("Storage encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by a search session
///
/// None of these are fatal: each maps to a user-facing notice and leaves the
/// session in an unchanged or partially-updated state.
#[derive(Error, Debug)]
pub enum FinderError {
    /// A required input was empty; no state was changed
    #[error("{0}")]
    Validation(String),

    /// The top-level lookup failed; prior results are left untouched
    #[error("Search failed: {0}")]
    Search(ApiError),

    /// The lookup succeeded but returned nothing
    #[error("No recipes found")]
    EmptyResult,

    /// Persisting favorites, recent searches or preferences failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error, including a missing API key
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<ApiError> for FinderError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::MissingApiKey => {
                FinderError::Config(config::ConfigError::Message(error.to_string()))
            }
            other => FinderError::Search(other),
        }
    }
}

impl FinderError {
    /// Whether the error is the distinct "no results" outcome
    pub fn is_empty_result(&self) -> bool {
        matches!(self, FinderError::EmptyResult)
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
