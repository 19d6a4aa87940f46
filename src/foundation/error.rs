/// Convenience result type used across planepost.
pub type PostproResult<T> = Result<T, PostproError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PostproError {
    /// Invalid user-provided configuration or dataset content.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while parsing or compiling a configuration expression.
    #[error("expression error: {0}")]
    Expression(String),

    /// Errors while evaluating expressions, rendering or encoding output.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Filesystem errors with the offending path already in the message.
    #[error("io error: {0}")]
    Io(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PostproError {
    /// Build a [`PostproError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PostproError::Expression`] value.
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    /// Build a [`PostproError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`PostproError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`PostproError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
