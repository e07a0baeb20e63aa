use thiserror::Error;

/// A malformed element tree or a port that rejected its input. These are
/// caller mistakes, surfaced unchanged; the layout engine never papers over
/// them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadingError {
    #[error("sequence must have at least one child")]
    EmptySequence,
    #[error("choice must have at least two distinct branches")]
    TooFewChoiceBranches,
    #[error("choice default index {default} out of range for {len} branches")]
    ChoiceDefaultOutOfRange { default: usize, len: usize },
    #[error("{what}")]
    Other { what: String },
}

/// An internal assertion violated during layout or render: a bug in this
/// crate, not in caller input. Never constructed in response to bad input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("layout cache hit claimed against mismatched settings or context")]
    StaleCache,
    #[error("ridge line breakpoints were not in ascending order")]
    UnsortedRidgeLine,
    #[error("render called before calculate_layout")]
    LayoutNotComputed,
    #[error("{what}")]
    Other { what: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error(transparent)]
    Loading(#[from] LoadingError),
    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

pub type Result<T> = std::result::Result<T, DiagramError>;
