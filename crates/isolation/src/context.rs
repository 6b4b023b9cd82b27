//! Caller tenant resolution.

use tenantry_auth::{IdentityResolver, User};
use tenantry_core::TenantId;
use tenantry_infra::UserStore;

use crate::error::{IsolationError, IsolationResult};

/// Something that can tell which tenant the current caller acts in.
///
/// `Ok(None)` means the caller is exempt from isolation: anonymous/internal
/// calls and users without a tenant (global administrators).
pub trait TenantSource {
    fn resolve_caller_tenant(&self) -> IsolationResult<Option<TenantId>>;
}

impl<T: TenantSource + ?Sized> TenantSource for &T {
    fn resolve_caller_tenant(&self) -> IsolationResult<Option<TenantId>> {
        (**self).resolve_caller_tenant()
    }
}

/// Resolves the caller's tenant from its identity and its user record.
///
/// Pure lookup: no caching, no side effects. Cheap to build per call.
#[derive(Debug)]
pub struct TenantContext<'a, I: ?Sized, U> {
    identity: &'a I,
    users: U,
}

impl<'a, I, U> TenantContext<'a, I, U>
where
    I: IdentityResolver + ?Sized,
    U: UserStore,
{
    pub fn new(identity: &'a I, users: U) -> Self {
        Self { identity, users }
    }

    /// The caller's own user record, or `None` for anonymous callers.
    ///
    /// An authenticated login without a record is a data-consistency fault.
    pub fn current_user(&self) -> IsolationResult<Option<User>> {
        let Some(login) = self.identity.current_login() else {
            return Ok(None);
        };

        match self.users.find_by_login(&login)? {
            Some(user) => Ok(Some(user)),
            None => {
                tracing::error!(%login, "authenticated login has no user record");
                Err(IsolationError::DataConsistency { login })
            }
        }
    }
}

impl<I, U> TenantSource for TenantContext<'_, I, U>
where
    I: IdentityResolver + ?Sized,
    U: UserStore,
{
    fn resolve_caller_tenant(&self) -> IsolationResult<Option<TenantId>> {
        let tenant = self.current_user()?.and_then(|user| user.tenant_id);
        tracing::trace!(tenant_id = ?tenant, "resolved caller tenant");
        Ok(tenant)
    }
}

/// A tenant decision made up front.
///
/// Useful where the caller's tenant is already known (workers pinned to a
/// tenant, tests).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResolvedTenant(pub Option<TenantId>);

impl ResolvedTenant {
    pub fn tenant(tenant_id: TenantId) -> Self {
        Self(Some(tenant_id))
    }

    pub fn unscoped() -> Self {
        Self(None)
    }
}

impl TenantSource for ResolvedTenant {
    fn resolve_caller_tenant(&self) -> IsolationResult<Option<TenantId>> {
        Ok(self.0)
    }
}
