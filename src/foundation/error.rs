/// Convenience result type used across pagegraph.
pub type PageResult<T> = Result<T, PageError>;

/// Top-level error taxonomy used by scene-graph APIs.
#[derive(thiserror::Error, Debug)]
pub enum PageError {
    /// Dependency cycle detected while sorting a graph.
    #[error("graph cycle: {0}")]
    Cycle(String),

    /// Invalid user-provided node parameters or declarations.
    #[error("validation error: {0}")]
    Validation(String),

    /// A resource (image, video) could not be loaded or decoded.
    #[error("resource error: {0}")]
    Resource(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PageError {
    /// Build a [`PageError::Cycle`] value.
    pub fn cycle(msg: impl Into<String>) -> Self {
        Self::Cycle(msg.into())
    }

    /// Build a [`PageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PageError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`PageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for a scheduler cycle abort.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
