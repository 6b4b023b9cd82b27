//! Tenant assignment for user creation and update.
//!
//! The create-user workflow decides a tenant before the user record exists and
//! the user store applies it when the record is persisted. The decision
//! travels as an owned [`PendingTenantAssignment`] from one to the other, so
//! two concurrent creations can never observe each other's value.

use tenantry_auth::User;
use tenantry_core::{TenantId, TenantScoped};
use tenantry_infra::UserStore;

use crate::error::IsolationResult;

/// Which tenant a user created or updated by this caller ends up in.
///
/// A tenant caller always assigns its own tenant, whatever was requested.
/// An unscoped caller (anonymous, global admin) assigns what was requested,
/// which may be none.
pub fn assigned_tenant(caller_tenant: Option<TenantId>, requested: Option<TenantId>) -> Option<TenantId> {
    caller_tenant.or(requested)
}

/// A tenant decision waiting for the save that persists the user.
///
/// Not `Clone`: one decision, one save. Dropping it with a value still inside
/// means the decision never reached storage, which is logged.
#[must_use = "the decided tenant is only applied when the assignment is passed to a save"]
#[derive(Debug)]
pub struct PendingTenantAssignment {
    tenant: Option<TenantId>,
}

impl PendingTenantAssignment {
    pub fn decide(caller_tenant: Option<TenantId>, requested: Option<TenantId>) -> Self {
        Self {
            tenant: assigned_tenant(caller_tenant, requested),
        }
    }

    /// An assignment that leaves the user's tenant alone.
    pub fn none() -> Self {
        Self { tenant: None }
    }

    pub fn peek(&self) -> Option<TenantId> {
        self.tenant
    }

    /// Consume the decision. A second `take` yields `None`.
    pub fn take(&mut self) -> Option<TenantId> {
        self.tenant.take()
    }
}

impl Drop for PendingTenantAssignment {
    fn drop(&mut self) {
        if let Some(tenant_id) = self.tenant {
            tracing::warn!(%tenant_id, "tenant assignment dropped without being saved");
        }
    }
}

/// User store whose save applies a pending tenant decision.
#[derive(Debug)]
pub struct TenantAssigningUserStore<S> {
    inner: S,
}

impl<S: UserStore> TenantAssigningUserStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Persist `user`, overwriting its tenant with the pending decision if one
    /// is present. The decision is consumed either way.
    pub fn save(&self, mut user: User, pending: &mut PendingTenantAssignment) -> IsolationResult<User> {
        if let Some(tenant_id) = pending.take() {
            tracing::debug!(login = %user.login, %tenant_id, "assigning tenant on save");
            user.assign_tenant(tenant_id);
        }
        Ok(self.inner.save(user)?)
    }
}
