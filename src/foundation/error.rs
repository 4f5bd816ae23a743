/// Result alias used across the crate.
pub type VizResult<T> = Result<T, VizError>;

/// Errors raised while loading, compositing or writing a sequence.
///
/// Every variant carries a stable display prefix naming the stage that failed.
#[derive(thiserror::Error, Debug)]
pub enum VizError {
    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Frame and mask sources disagree on frame count or spatial dimensions.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Trajectory or cell-label rows could not be loaded.
    #[error("tabular data error: {0}")]
    Data(String),

    /// A frame or mask page could not be decoded.
    #[error("source error: {0}")]
    Source(String),

    /// A chunk could not be committed to its output file.
    #[error("encode error: {0}")]
    Encode(String),

    /// Context-wrapped failure from a helper.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VizError {
    /// Build a [`VizError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`VizError::ShapeMismatch`].
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Build a [`VizError::Data`].
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Build a [`VizError::Source`].
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Build a [`VizError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
