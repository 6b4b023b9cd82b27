//! Storage boundary.
//!
//! This module defines the contracts the isolation layer wraps: a generic
//! entity store, a user store with login lookups, and a storage session that
//! can carry a row filter for the duration of one call.

pub mod filter;
pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use tenantry_auth::User;
use tenantry_core::TenantScoped;

pub use filter::RowFilter;
pub use in_memory::{InMemoryDatabase, InMemoryTable, Session, TableView};

/// Storage operation error.
///
/// These are **infrastructure errors** as opposed to domain errors; the
/// isolation layer passes them through unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint was violated (e.g. login already taken).
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A record failed a storage-level constraint (e.g. missing tenant).
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// The backend could not serve the request.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Primary-key store for a tenant-scoped entity type.
///
/// `find_all` accepts an optional typed predicate; implementations must also
/// honour whatever row filter their session has installed.
pub trait EntityStore<E: TenantScoped> {
    fn save(&self, entity: E) -> Result<E, StoreError>;
    fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError>;
    /// Deleting an absent id is a no-op.
    fn delete_by_id(&self, id: &E::Id) -> Result<(), StoreError>;
    fn find_all(&self, filter: Option<&RowFilter>) -> Result<Vec<E>, StoreError>;
}

/// User accounts, addressable by id and by login.
pub trait UserStore: EntityStore<User> {
    fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;
}

/// A storage session that can carry a row filter.
///
/// While a filter is installed every query issued through the session is
/// restricted by it. Primary-key loads are not queries and are not filtered.
pub trait FilteredSession {
    fn install_row_filter(&self, filter: RowFilter);
    fn clear_row_filter(&self);
    fn row_filter(&self) -> Option<RowFilter>;
}

impl<E, S> EntityStore<E> for &S
where
    E: TenantScoped,
    S: EntityStore<E> + ?Sized,
{
    fn save(&self, entity: E) -> Result<E, StoreError> {
        (**self).save(entity)
    }

    fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        (**self).find_by_id(id)
    }

    fn delete_by_id(&self, id: &E::Id) -> Result<(), StoreError> {
        (**self).delete_by_id(id)
    }

    fn find_all(&self, filter: Option<&RowFilter>) -> Result<Vec<E>, StoreError> {
        (**self).find_all(filter)
    }
}

impl<E, S> EntityStore<E> for Arc<S>
where
    E: TenantScoped,
    S: EntityStore<E> + ?Sized,
{
    fn save(&self, entity: E) -> Result<E, StoreError> {
        (**self).save(entity)
    }

    fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        (**self).find_by_id(id)
    }

    fn delete_by_id(&self, id: &E::Id) -> Result<(), StoreError> {
        (**self).delete_by_id(id)
    }

    fn find_all(&self, filter: Option<&RowFilter>) -> Result<Vec<E>, StoreError> {
        (**self).find_all(filter)
    }
}

impl<S> UserStore for &S
where
    S: UserStore + ?Sized,
{
    fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        (**self).find_by_login(login)
    }
}

impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        (**self).find_by_login(login)
    }
}
