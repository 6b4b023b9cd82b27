//! Blog management.

use std::sync::Arc;

use tenantry_auth::IdentityResolver;
use tenantry_blog::{Blog, BlogDraft};
use tenantry_core::{BlogId, TenantScoped};
use tenantry_infra::{InMemoryDatabase, IsolationSettings};
use tenantry_isolation::{RowFilterGate, TenantContext, TenantScopedStore};

use crate::error::{ServiceError, ServiceResult};

/// Blog CRUD, isolated per tenant.
///
/// Shared across threads; each method call gets its own session, context and
/// gate.
#[derive(Debug, Clone)]
pub struct BlogService {
    db: Arc<InMemoryDatabase>,
    gate: RowFilterGate,
}

impl BlogService {
    pub fn new(db: Arc<InMemoryDatabase>, settings: &IsolationSettings) -> Self {
        Self {
            db,
            gate: RowFilterGate::from_settings(settings),
        }
    }

    /// Create a blog in the caller's tenant.
    ///
    /// The draft's tenant is only used by callers without a tenant.
    pub fn create<I>(&self, caller: &I, draft: &BlogDraft) -> ServiceResult<Blog>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;
        let blogs: TenantScopedStore<Blog, _, _> = TenantScopedStore::new(session.blogs(), &ctx);

        let saved = blogs.save(Blog::from_draft(draft)?)?;
        tracing::info!(
            blog_id = %saved.id_typed(),
            tenant_id = ?saved.tenant_id(),
            "blog created"
        );
        Ok(saved)
    }

    /// Replace name and handle of an existing blog. The tenant never changes.
    pub fn update<I>(&self, caller: &I, id: BlogId, draft: &BlogDraft) -> ServiceResult<Blog>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;
        let blogs: TenantScopedStore<Blog, _, _> = TenantScopedStore::new(session.blogs(), &ctx);

        let mut blog = blogs.find_by_id(&id)?.ok_or(ServiceError::NotFound)?;
        blog.apply_draft(draft)?;
        Ok(blogs.save(blog)?)
    }

    pub fn get<I>(&self, caller: &I, id: BlogId) -> ServiceResult<Blog>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;
        let blogs: TenantScopedStore<Blog, _, _> = TenantScopedStore::new(session.blogs(), &ctx);

        blogs.find_by_id(&id)?.ok_or(ServiceError::NotFound)
    }

    /// Every blog the caller may see: its tenant's, or all for unscoped callers.
    pub fn list_all<I>(&self, caller: &I) -> ServiceResult<Vec<Blog>>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;
        let blogs: TenantScopedStore<Blog, _, _> = TenantScopedStore::new(session.blogs(), &ctx);

        Ok(blogs.find_all()?)
    }

    /// Delete a blog. Deleting an id that does not exist succeeds.
    pub fn delete<I>(&self, caller: &I, id: BlogId) -> ServiceResult<()>
    where
        I: IdentityResolver + ?Sized,
    {
        let session = self.db.session();
        let ctx = TenantContext::new(caller, session.users());
        let _gate = self.gate.enter(&ctx, &session)?;
        let blogs: TenantScopedStore<Blog, _, _> = TenantScopedStore::new(session.blogs(), &ctx);

        blogs.delete_by_id(&id)?;
        tracing::info!(blog_id = %id, "blog deleted");
        Ok(())
    }
}
