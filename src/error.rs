pub type AlgomotionResult<T> = Result<T, AlgomotionError>;

/// Errors produced by the visualization pipeline. All variants except `Other`
/// describe configuration or usage mistakes in the visualized algorithm, not
/// system failures.
#[derive(thiserror::Error, Debug)]
pub enum AlgomotionError {
    /// Mutually exclusive stylization arguments were supplied together.
    #[error("conflicting configuration: {0}")]
    ConfigConflict(String),

    /// A supplied style literal failed format validation.
    #[error("invalid style literal: {0}")]
    InvalidStyle(String),

    /// A supplied numeric range is not an ordered pair of finite numbers.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A group configuration supplied fewer styles than distinct observed
    /// values, and the two-style binary fallback did not apply.
    #[error("too few styles: {0}")]
    TooFewStyles(String),

    /// No interpretation could be determined. This indicates an
    /// implementation invariant violation, not a user mistake.
    #[error("unclassifiable interpretation: {0}")]
    Unclassifiable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AlgomotionError {
    pub fn config_conflict(msg: impl Into<String>) -> Self {
        Self::ConfigConflict(msg.into())
    }

    pub fn invalid_style(msg: impl Into<String>) -> Self {
        Self::InvalidStyle(msg.into())
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn too_few_styles(msg: impl Into<String>) -> Self {
        Self::TooFewStyles(msg.into())
    }

    pub fn unclassifiable(msg: impl Into<String>) -> Self {
        Self::Unclassifiable(msg.into())
    }
}
