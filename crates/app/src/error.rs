use thiserror::Error;

use tenantry_core::DomainError;
use tenantry_infra::StoreError;
use tenantry_isolation::IsolationError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outward error of the service layer.
///
/// A target in another tenant and a target that does not exist both come out
/// as `NotFound`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error("data consistency fault: authenticated login '{login}' has no user record")]
    DataConsistency { login: String },

    #[error("Login name already used!")]
    LoginAlreadyUsed,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    /// Treat a unique-constraint violation on the user table as a taken login.
    pub(crate) fn login_conflict(self) -> Self {
        match self {
            ServiceError::Store(StoreError::Conflict(_)) => ServiceError::LoginAlreadyUsed,
            other => other,
        }
    }
}

impl From<IsolationError> for ServiceError {
    fn from(value: IsolationError) -> Self {
        match value {
            IsolationError::NotFound => ServiceError::NotFound,
            IsolationError::DataConsistency { login } => ServiceError::DataConsistency { login },
            IsolationError::Store(err) => err.into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        ServiceError::Store(value)
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg)
            | DomainError::InvariantViolation(msg)
            | DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            DomainError::NotFound => ServiceError::NotFound,
            DomainError::Conflict(_) => ServiceError::LoginAlreadyUsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolation_failures_fold_into_service_errors() {
        assert_eq!(ServiceError::from(IsolationError::NotFound), ServiceError::NotFound);
        assert_eq!(
            ServiceError::from(IsolationError::Store(StoreError::Unavailable("down".into()))),
            ServiceError::Store(StoreError::Unavailable("down".into()))
        );
    }

    #[test]
    fn only_unique_violations_become_login_conflicts() {
        let conflict = ServiceError::from(StoreError::Conflict("user login 'a' already exists".into()));
        assert_eq!(conflict.login_conflict(), ServiceError::LoginAlreadyUsed);

        let constraint = ServiceError::from(StoreError::Constraint("blog requires a tenant".into()));
        assert!(matches!(constraint.login_conflict(), ServiceError::Store(_)));
    }

    #[test]
    fn login_conflict_message() {
        assert_eq!(ServiceError::LoginAlreadyUsed.to_string(), "Login name already used!");
    }
}
