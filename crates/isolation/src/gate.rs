//! Storage-level row filter, scoped to one service call.
//!
//! The interceptor only sees operations routed through it. The gate is the
//! second line: while a [`GateGuard`] is alive, every query the session issues
//! (including ad-hoc ones such as login lookups) is restricted to the caller's
//! tenant. The previous filter state comes back when the guard drops, on every
//! exit path.
//!
//! ```ignore
//! let session = db.session();
//! let ctx = TenantContext::new(&identity, session.users());
//! let _gate = RowFilterGate::new(true).enter(&ctx, &session)?;
//! // queries through `session` are now tenant-restricted
//! ```

use tenantry_core::TenantId;
use tenantry_infra::{FilteredSession, IsolationSettings, RowFilter};

use crate::context::TenantSource;
use crate::error::IsolationResult;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RowFilterGate {
    enabled: bool,
}

impl RowFilterGate {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn from_settings(settings: &IsolationSettings) -> Self {
        Self::new(settings.row_filter_enabled)
    }

    /// Install the caller's tenant filter on `session` until the guard drops.
    ///
    /// Nothing is installed for unscoped callers or when the gate is disabled.
    /// Entering inside an already gated call keeps the narrower filter.
    pub fn enter<'s, C, F>(&self, tenants: &C, session: &'s F) -> IsolationResult<GateGuard<'s, F>>
    where
        C: TenantSource + ?Sized,
        F: FilteredSession + ?Sized,
    {
        let previous = session.row_filter();

        if !self.enabled {
            return Ok(GateGuard {
                session,
                previous,
                installed: None,
            });
        }

        let installed = match tenants.resolve_caller_tenant()? {
            Some(tenant_id) => Some(Self::activate(session, tenant_id)),
            None => None,
        };

        Ok(GateGuard {
            session,
            previous,
            installed,
        })
    }

    /// Restrict `session` to `tenant_id`, intersected with any filter already
    /// installed. Returns the filter now in force.
    pub fn activate<F>(session: &F, tenant_id: TenantId) -> RowFilter
    where
        F: FilteredSession + ?Sized,
    {
        let filter = RowFilter::combine(session.row_filter(), Some(RowFilter::tenant(tenant_id)))
            .unwrap_or(RowFilter::DenyAll);
        tracing::debug!(%filter, "row filter installed");
        session.install_row_filter(filter);
        filter
    }

    /// Remove any row filter from `session`.
    pub fn deactivate<F>(session: &F)
    where
        F: FilteredSession + ?Sized,
    {
        session.clear_row_filter();
        tracing::debug!("row filter cleared");
    }
}

impl Default for RowFilterGate {
    fn default() -> Self {
        Self::from_settings(&IsolationSettings::default())
    }
}

/// Restores the session's previous row filter when dropped.
#[must_use = "the row filter is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct GateGuard<'s, F: FilteredSession + ?Sized> {
    session: &'s F,
    previous: Option<RowFilter>,
    installed: Option<RowFilter>,
}

impl<F: FilteredSession + ?Sized> GateGuard<'_, F> {
    /// The filter this guard installed, if any.
    pub fn installed(&self) -> Option<RowFilter> {
        self.installed
    }
}

impl<F: FilteredSession + ?Sized> Drop for GateGuard<'_, F> {
    fn drop(&mut self) {
        if self.installed.is_none() {
            return;
        }
        match self.previous {
            Some(filter) => self.session.install_row_filter(filter),
            None => RowFilterGate::deactivate(self.session),
        }
    }
}
