use powertone_core::DemodError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Unsupported WAV format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Demod(#[from] DemodError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
