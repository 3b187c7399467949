#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {collection}/{id}")]
    NotFound { collection: &'static str, id: String },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),
    #[error("Store error: {0}")]
    Store(String),
}

impl ApiError {
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Store(format!("record encoding failed: {}", err))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
