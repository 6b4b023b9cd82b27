//! Per-operation isolation rules for tenant-owned entity stores.

use std::marker::PhantomData;

use tenantry_core::{TenantId, TenantScoped};
use tenantry_infra::{EntityStore, RowFilter};

use crate::context::TenantSource;
use crate::error::{IsolationError, IsolationResult};

/// Decorates an [`EntityStore`] with the tenant rules.
///
/// For a caller in tenant `T`:
///
/// | operation      | rule                                                          |
/// |----------------|---------------------------------------------------------------|
/// | `save`         | entity tenant overwritten with `T`; a foreign id is not found |
/// | `find_by_id`   | foreign record → `NotFound`, absent → `Ok(None)`              |
/// | `delete_by_id` | foreign record → `NotFound`, nothing deleted                  |
/// | `find_all`     | only records whose tenant equals `T`                          |
///
/// Callers without a tenant pass straight through to the inner store.
#[derive(Debug)]
pub struct TenantScopedStore<E, S, C> {
    inner: S,
    tenants: C,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S, C> TenantScopedStore<E, S, C>
where
    E: TenantScoped,
    S: EntityStore<E>,
    C: TenantSource,
{
    pub fn new(inner: S, tenants: C) -> Self {
        Self {
            inner,
            tenants,
            _entity: PhantomData,
        }
    }

    /// Stamp the caller's tenant and persist.
    ///
    /// Whatever tenant the payload carried is discarded for tenant callers.
    /// Saving over an id owned by another tenant is refused as not found so
    /// an update can never move a record across tenants.
    pub fn save(&self, mut entity: E) -> IsolationResult<E> {
        if let Some(tenant_id) = self.tenants.resolve_caller_tenant()? {
            if let Some(existing) = self.inner.find_by_id(entity.id())? {
                self.ensure_owned(&existing, tenant_id)?;
            }
            if entity.tenant_id() != Some(tenant_id) {
                tracing::debug!(
                    entity = E::KIND,
                    id = %entity.id(),
                    payload_tenant = ?entity.tenant_id(),
                    %tenant_id,
                    "stamping caller tenant"
                );
            }
            entity.assign_tenant(tenant_id);
        }

        Ok(self.inner.save(entity)?)
    }

    /// Load by id.
    ///
    /// Absent records are `Ok(None)`; a record owned by another tenant is
    /// `Err(NotFound)`. Callers that don't care can treat both the same.
    pub fn find_by_id(&self, id: &E::Id) -> IsolationResult<Option<E>> {
        // The caller is resolved even when the row turns out to be absent.
        let caller_tenant = self.tenants.resolve_caller_tenant()?;
        let Some(entity) = self.inner.find_by_id(id)? else {
            return Ok(None);
        };

        if let Some(tenant_id) = caller_tenant {
            self.ensure_owned(&entity, tenant_id)?;
        }
        Ok(Some(entity))
    }

    /// Delete by id. A record of another tenant is reported as not found and
    /// left untouched; deleting an absent id is a no-op.
    pub fn delete_by_id(&self, id: &E::Id) -> IsolationResult<()> {
        if let Some(tenant_id) = self.tenants.resolve_caller_tenant()? {
            if let Some(existing) = self.inner.find_by_id(id)? {
                self.ensure_owned(&existing, tenant_id)?;
            }
        }

        Ok(self.inner.delete_by_id(id)?)
    }

    /// List every record visible to the caller.
    pub fn find_all(&self) -> IsolationResult<Vec<E>> {
        let filter = self
            .tenants
            .resolve_caller_tenant()?
            .map(RowFilter::tenant);

        Ok(self.inner.find_all(filter.as_ref())?)
    }

    fn ensure_owned(&self, entity: &E, tenant_id: TenantId) -> IsolationResult<()> {
        if entity.belongs_to(tenant_id) {
            return Ok(());
        }

        tracing::warn!(
            entity = E::KIND,
            id = %entity.id(),
            caller_tenant = %tenant_id,
            "cross-tenant access refused"
        );
        Err(IsolationError::NotFound)
    }
}
