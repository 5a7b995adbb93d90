#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("data source unavailable ({source_name}): {reason}")]
    DataSourceUnavailable { source_name: String, reason: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("wizard step '{actual}' cannot accept {attempted}")]
    OutOfOrderStep {
        actual: &'static str,
        attempted: &'static str,
    },

    #[error("file storage error: {0}")]
    Files(#[from] advisor_files::FilesError),
    #[error("failed to serialize report: {0}")]
    Serialization(serde_json::Error),
}

pub type AdvisorResult<T> = std::result::Result<T, AdvisorError>;

impl From<advisor_types::TextError> for AdvisorError {
    fn from(e: advisor_types::TextError) -> Self {
        AdvisorError::InvalidInput(e.to_string())
    }
}

impl From<advisor_types::SeverityError> for AdvisorError {
    fn from(e: advisor_types::SeverityError) -> Self {
        AdvisorError::InvalidInput(e.to_string())
    }
}
