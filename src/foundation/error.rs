/// Convenience result type used across flaretime.
pub type FlaretimeResult<T> = Result<T, FlaretimeError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum FlaretimeError {
    /// Invalid user-provided configuration or parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while parsing or sampling the flux curve.
    #[error("curve error: {0}")]
    Curve(String),

    /// Errors while scanning the sampled curve for timing events.
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlaretimeError {
    /// Build a [`FlaretimeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlaretimeError::Curve`] value.
    pub fn curve(msg: impl Into<String>) -> Self {
        Self::Curve(msg.into())
    }

    /// Build a [`FlaretimeError::Analysis`] value.
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// Build a [`FlaretimeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
