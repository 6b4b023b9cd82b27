//! `tenantry-isolation` — multi-tenant data isolation around plain CRUD stores.
//!
//! Every authenticated user belongs to at most one tenant. The types here make
//! sure no create, read, list, update or delete leaks or mutates a record of
//! another tenant, without every call site repeating the check:
//!
//! - [`TenantContext`] resolves the caller's tenant (none for anonymous and
//!   tenant-less callers, which bypass isolation).
//! - [`TenantScopedStore`] wraps an entity store: stamps on save, hides foreign
//!   records on read and delete, scopes lists with a typed predicate.
//! - [`RowFilterGate`] installs a storage-level row filter for the duration of
//!   a service call, catching queries nothing else wraps.
//! - [`PendingTenantAssignment`] carries a tenant decision from a workflow down
//!   to the save that persists it, by value, one per call.
//! - [`GuardedUserDirectory`] hides users of other tenants from lookups.
//!
//! Every tenant-boundary violation surfaces as [`IsolationError::NotFound`],
//! indistinguishable from a record that does not exist.

pub mod assignment;
pub mod context;
pub mod directory;
pub mod error;
pub mod gate;
pub mod interceptor;

pub use assignment::{PendingTenantAssignment, TenantAssigningUserStore, assigned_tenant};
pub use context::{ResolvedTenant, TenantContext, TenantSource};
pub use directory::GuardedUserDirectory;
pub use error::{IsolationError, IsolationResult};
pub use gate::{GateGuard, RowFilterGate};
pub use interceptor::TenantScopedStore;
