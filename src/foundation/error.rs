/// Convenience result type used across motionframe.
pub type MotionResult<T> = Result<T, MotionError>;

/// Top-level error taxonomy used by animation and timeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum MotionError {
    /// Breakpoint tables that cannot define a piecewise curve.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Spring parameters that would not describe a damped oscillator.
    #[error("invalid spring config: {0}")]
    InvalidSpringConfig(String),

    /// Invalid user-provided scene or track data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while evaluating a scene for a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MotionError {
    /// Build a [`MotionError::InvalidRange`] value.
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Build a [`MotionError::InvalidSpringConfig`] value.
    pub fn invalid_spring(msg: impl Into<String>) -> Self {
        Self::InvalidSpringConfig(msg.into())
    }

    /// Build a [`MotionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MotionError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`MotionError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Prefix the message with `ctx`, keeping the variant.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Self::InvalidRange(m) => Self::InvalidRange(format!("{ctx}: {m}")),
            Self::InvalidSpringConfig(m) => Self::InvalidSpringConfig(format!("{ctx}: {m}")),
            Self::Validation(m) => Self::Validation(format!("{ctx}: {m}")),
            Self::Evaluation(m) => Self::Evaluation(format!("{ctx}: {m}")),
            Self::Serde(m) => Self::Serde(format!("{ctx}: {m}")),
            Self::Other(e) => Self::Other(e.context(ctx.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
