//! User management.
//!
//! Logins are unique across all tenants. A tenant admin creates, edits and
//! sees only users of its own tenant; global admins (no tenant) manage
//! everyone and choose the tenant explicitly.

use std::sync::Arc;

use tenantry_auth::{IdentityResolver, NewUser, Role, User, UserUpdate};
use tenantry_core::UserId;
use tenantry_infra::{EntityStore, InMemoryDatabase, IsolationSettings};
use tenantry_isolation::{
    GuardedUserDirectory, PendingTenantAssignment, ResolvedTenant, RowFilterGate,
    TenantAssigningUserStore, TenantContext, TenantSource, assigned_tenant,
};

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct UserService {
    db: Arc<InMemoryDatabase>,
    gate: RowFilterGate,
}

impl UserService {
    pub fn new(db: Arc<InMemoryDatabase>, settings: &IsolationSettings) -> Self {
        Self {
            db,
            gate: RowFilterGate::from_settings(settings),
        }
    }

    /// Administrative creation.
    ///
    /// A tenant admin's new user lands in the admin's tenant whatever the
    /// request says; an unscoped caller gets the requested tenant.
    pub fn create_user<I>(&self, caller: &I, request: &NewUser) -> ServiceResult<User>
    where
        I: IdentityResolver + ?Sized,
    {
        self.create(caller, request)
    }

    /// Self-registration. Registered users only ever get `ROLE_USER`.
    pub fn register_user<I>(&self, caller: &I, request: &NewUser) -> ServiceResult<User>
    where
        I: IdentityResolver + ?Sized,
    {
        let request = NewUser {
            authorities: vec![Role::USER],
            ..request.clone()
        };
        self.create(caller, &request)
    }

    fn create<I>(&self, caller: &I, request: &NewUser) -> ServiceResult<User>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;

        let user = User::from_request(request)?;
        let mut pending =
            PendingTenantAssignment::decide(ctx.resolve_caller_tenant()?, request.tenant_id);

        let saved = TenantAssigningUserStore::new(session.users())
            .save(user, &mut pending)
            .map_err(|err| ServiceError::from(err).login_conflict())?;

        tracing::info!(
            login = %saved.login,
            tenant_id = ?saved.tenant_id,
            "user created"
        );
        Ok(saved)
    }

    /// Edit another user's account.
    ///
    /// The target must be visible to the caller. Its tenant is re-decided the
    /// same way as on creation.
    pub fn update_user<I>(&self, caller: &I, update: &UserUpdate) -> ServiceResult<User>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;

        let caller_tenant = ctx.resolve_caller_tenant()?;
        let directory = GuardedUserDirectory::new(session.users(), ResolvedTenant(caller_tenant));

        let mut user = directory
            .get_user_with_authorities(&update.id)?
            .ok_or(ServiceError::NotFound)?;
        user.apply_update(update)?;
        user.tenant_id = assigned_tenant(caller_tenant, update.tenant_id);

        let saved = session
            .users()
            .save(user)
            .map_err(|err| ServiceError::from(err).login_conflict())?;

        tracing::info!(login = %saved.login, tenant_id = ?saved.tenant_id, "user updated");
        Ok(saved)
    }

    /// Delete a user by login. Unknown and foreign logins are both not found.
    pub fn delete_user<I>(&self, caller: &I, login: &str) -> ServiceResult<()>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;

        let directory = GuardedUserDirectory::new(session.users(), &ctx);
        let user = directory
            .get_user_with_authorities_by_login(login)?
            .ok_or(ServiceError::NotFound)?;

        session.users().delete_by_id(&user.id)?;
        tracing::info!(login = %user.login, "user deleted");
        Ok(())
    }

    pub fn get_user_with_authorities_by_login<I>(&self, caller: &I, login: &str) -> ServiceResult<User>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;

        GuardedUserDirectory::new(session.users(), &ctx)
            .get_user_with_authorities_by_login(login)?
            .ok_or(ServiceError::NotFound)
    }

    pub fn get_user_with_authorities<I>(&self, caller: &I, id: UserId) -> ServiceResult<User>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;

        GuardedUserDirectory::new(session.users(), &ctx)
            .get_user_with_authorities(&id)?
            .ok_or(ServiceError::NotFound)
    }

    /// The caller's own account; `None` for anonymous callers.
    pub fn get_current_user<I>(&self, caller: &I) -> ServiceResult<Option<User>>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;

        Ok(ctx.current_user()?)
    }

    /// Every user the caller may manage.
    pub fn get_all_managed_users<I>(&self, caller: &I) -> ServiceResult<Vec<User>>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;

        Ok(GuardedUserDirectory::new(session.users(), &ctx).list()?)
    }
}
