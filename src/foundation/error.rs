/// Convenience result type used across stardeck.
pub type StardeckResult<T> = Result<T, StardeckError>;

/// Top-level error taxonomy used by library APIs.
///
/// The decorative paths (mounting a field, resizing a surface) never surface these to callers;
/// they log and degrade instead. Errors are for the explicit constructors and I/O helpers.
#[derive(thiserror::Error, Debug)]
pub enum StardeckError {
    /// Invalid user-provided configuration or data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A drawing surface could not be sized, rasterised or read back.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StardeckError {
    /// Build a [`StardeckError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StardeckError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`StardeckError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for StardeckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
