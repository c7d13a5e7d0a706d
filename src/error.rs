use thiserror::Error;

/// Everything that can go wrong between loading the artifacts and producing a prediction.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// Classifier or column file missing or unreadable. Fatal at startup.
    #[error("failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },

    /// Expected column list is empty or disagrees with what was produced.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A form value outside its declared bounds or choice list.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The classifier failed or answered outside its contract.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictorError {
    pub(crate) fn artifact(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
