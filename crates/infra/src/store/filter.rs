use tenantry_core::{TenantId, TenantScoped};

/// Typed row predicate for tenant-scoped queries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RowFilter {
    /// `tenant_id = <value>`; rows without a tenant never match.
    Tenant(TenantId),
    /// Matches nothing.
    DenyAll,
}

impl RowFilter {
    pub fn tenant(tenant_id: TenantId) -> Self {
        Self::Tenant(tenant_id)
    }

    pub fn matches<R: TenantScoped>(&self, row: &R) -> bool {
        match self {
            RowFilter::Tenant(tenant_id) => row.belongs_to(*tenant_id),
            RowFilter::DenyAll => false,
        }
    }

    /// Intersection of two filters.
    ///
    /// Two different tenants intersect to `DenyAll`.
    pub fn narrow(self, other: RowFilter) -> RowFilter {
        match (self, other) {
            (RowFilter::Tenant(a), RowFilter::Tenant(b)) if a == b => self,
            _ => RowFilter::DenyAll,
        }
    }

    /// Combine an optional filter with another optional filter.
    pub fn combine(a: Option<RowFilter>, b: Option<RowFilter>) -> Option<RowFilter> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.narrow(b)),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

impl core::fmt::Display for RowFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RowFilter::Tenant(tenant_id) => write!(f, "tenant_id = {tenant_id}"),
            RowFilter::DenyAll => f.write_str("false"),
        }
    }
}
