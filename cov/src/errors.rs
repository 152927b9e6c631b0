use thiserror::Error;

/// A result type for covariance model operations
pub type Result<T> = std::result::Result<T, CovError>;

/// An error when building or discretizing a [`KroneckerCovarianceModel`](crate::KroneckerCovarianceModel)
#[derive(Error, Debug)]
pub enum CovError {
    /// When a parameter or dimension constraint is violated
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
    #[error(transparent)]
    /// When linear algebra computation fails
    LinalgError(#[from] linfa_linalg::LinalgError),
}
