use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemodError {
    #[error("Recording too short: {samples} samples, need at least {min_window} for one window")]
    MalformedInput { samples: usize, min_window: usize },

    #[error("Calibration failed: no estimate classified as {missing}")]
    Calibration { missing: &'static str },

    #[error("Framing failed: {0}")]
    Framing(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("FFT error: {0}")]
    FftError(String),
}

pub type Result<T> = std::result::Result<T, DemodError>;
