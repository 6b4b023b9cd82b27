use thiserror::Error;

use tenantry_infra::StoreError;

pub type IsolationResult<T> = Result<T, IsolationError>;

/// Failures added by the isolation layer on top of the store's own contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IsolationError {
    /// The target does not exist, or exists in another tenant.
    ///
    /// The two cases are deliberately indistinguishable.
    #[error("not found")]
    NotFound,

    /// An authenticated login has no user record.
    #[error("data consistency fault: authenticated login '{login}' has no user record")]
    DataConsistency { login: String },

    /// Passed through unchanged from the underlying store.
    #[error(transparent)]
    Store(#[from] StoreError),
}
