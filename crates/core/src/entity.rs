//! Entity traits: identity, plus the tenant reference isolation is keyed on.

use crate::id::TenantId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Short, stable name used in logs (e.g. `"blog"`).
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity that carries a tenant reference.
///
/// `TENANT_REQUIRED` distinguishes tenant-owned records (every persisted row
/// must reference a tenant) from records where the reference is optional
/// (users: a user without a tenant is a global administrator).
pub trait TenantScoped: Entity {
    /// Whether persisted records must reference a tenant.
    const TENANT_REQUIRED: bool;

    /// The tenant this record belongs to, if any.
    fn tenant_id(&self) -> Option<TenantId>;

    /// Overwrite the tenant reference.
    fn assign_tenant(&mut self, tenant_id: TenantId);

    /// True when the record belongs to `tenant_id`.
    ///
    /// A record without a tenant never belongs to a tenant.
    fn belongs_to(&self, tenant_id: TenantId) -> bool {
        self.tenant_id() == Some(tenant_id)
    }
}
