//! User lookups that hide users of other tenants.

use tenantry_auth::User;
use tenantry_core::{TenantId, TenantScoped, UserId};
use tenantry_infra::{RowFilter, UserStore};

use crate::context::TenantSource;
use crate::error::{IsolationError, IsolationResult};

/// Wraps a [`UserStore`] so a tenant caller only ever sees users of its own
/// tenant. A target in another tenant, or in no tenant at all, is reported as
/// `NotFound`; unscoped callers see everything.
#[derive(Debug)]
pub struct GuardedUserDirectory<S, C> {
    users: S,
    tenants: C,
}

impl<S, C> GuardedUserDirectory<S, C>
where
    S: UserStore,
    C: TenantSource,
{
    pub fn new(users: S, tenants: C) -> Self {
        Self { users, tenants }
    }

    pub fn get_user_with_authorities_by_login(&self, login: &str) -> IsolationResult<Option<User>> {
        let caller_tenant = self.tenants.resolve_caller_tenant()?;
        let user = self.users.find_by_login(login)?;
        Self::visible(user, caller_tenant)
    }

    pub fn get_user_with_authorities(&self, id: &UserId) -> IsolationResult<Option<User>> {
        let caller_tenant = self.tenants.resolve_caller_tenant()?;
        let user = self.users.find_by_id(id)?;
        Self::visible(user, caller_tenant)
    }

    /// Every user the caller may manage.
    pub fn list(&self) -> IsolationResult<Vec<User>> {
        let filter = self
            .tenants
            .resolve_caller_tenant()?
            .map(RowFilter::tenant);
        Ok(self.users.find_all(filter.as_ref())?)
    }

    fn visible(user: Option<User>, caller_tenant: Option<TenantId>) -> IsolationResult<Option<User>> {
        let Some(user) = user else {
            return Ok(None);
        };
        let Some(tenant_id) = caller_tenant else {
            return Ok(Some(user));
        };

        if user.belongs_to(tenant_id) {
            Ok(Some(user))
        } else {
            tracing::warn!(login = %user.login, caller_tenant = %tenant_id, "cross-tenant user lookup refused");
            Err(IsolationError::NotFound)
        }
    }
}
