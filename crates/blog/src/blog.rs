use serde::{Deserialize, Serialize};

use tenantry_core::{BlogId, DomainError, DomainResult, Entity, TenantId, TenantScoped};

const NAME_MIN_LEN: usize = 3;
const HANDLE_MIN_LEN: usize = 2;

/// Inbound blog payload (create or update).
///
/// `tenant_id` is whatever the client sent. It is never trusted: saving
/// through the tenant interceptor overwrites it with the caller's tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDraft {
    pub name: String,
    pub handle: String,
    pub tenant_id: Option<TenantId>,
}

impl BlogDraft {
    pub fn new(name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            tenant_id: None,
        }
    }

    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    fn validated(&self) -> DomainResult<(String, String)> {
        let name = self.name.trim();
        if name.chars().count() < NAME_MIN_LEN {
            return Err(DomainError::validation(format!(
                "blog name must be at least {NAME_MIN_LEN} characters"
            )));
        }

        let handle = self.handle.trim();
        if handle.chars().count() < HANDLE_MIN_LEN {
            return Err(DomainError::validation(format!(
                "blog handle must be at least {HANDLE_MIN_LEN} characters"
            )));
        }

        Ok((name.to_string(), handle.to_string()))
    }
}

/// A tenant-owned blog.
///
/// Every persisted blog references exactly one tenant. The reference may be
/// empty only while the record is in flight between the payload and the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    id: BlogId,
    name: String,
    handle: String,
    tenant_id: Option<TenantId>,
}

impl Blog {
    /// Build a new blog from a draft, with a fresh id.
    pub fn from_draft(draft: &BlogDraft) -> DomainResult<Self> {
        Self::with_id(BlogId::new(), draft)
    }

    pub fn with_id(id: BlogId, draft: &BlogDraft) -> DomainResult<Self> {
        let (name, handle) = draft.validated()?;
        Ok(Self {
            id,
            name,
            handle,
            tenant_id: draft.tenant_id,
        })
    }

    /// Replace the editable fields. The tenant reference is left as is.
    pub fn apply_draft(&mut self, draft: &BlogDraft) -> DomainResult<()> {
        let (name, handle) = draft.validated()?;
        self.name = name;
        self.handle = handle;
        Ok(())
    }

    pub fn id_typed(&self) -> BlogId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }
}

impl Entity for Blog {
    type Id = BlogId;

    const KIND: &'static str = "blog";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TenantScoped for Blog {
    const TENANT_REQUIRED: bool = true;

    fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    fn assign_tenant(&mut self, tenant_id: TenantId) {
        self.tenant_id = Some(tenant_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn draft_fields_are_trimmed() {
        let blog = Blog::from_draft(&BlogDraft::new("  Rust Notes ", " rn ")).unwrap();
        assert_eq!(blog.name(), "Rust Notes");
        assert_eq!(blog.handle(), "rn");
    }

    #[test]
    fn short_name_or_handle_is_rejected() {
        let err = Blog::from_draft(&BlogDraft::new("ab", "handle")).unwrap_err();
        assert!(err.to_string().contains("name"));

        let err = Blog::from_draft(&BlogDraft::new("abc", "h")).unwrap_err();
        assert!(err.to_string().contains("handle"));
    }

    #[test]
    fn payload_tenant_is_carried_until_stamped() {
        let payload_tenant = TenantId::new();
        let stamped = TenantId::new();

        let mut blog =
            Blog::from_draft(&BlogDraft::new("Acme news", "acme").with_tenant(payload_tenant))
                .unwrap();
        assert!(blog.belongs_to(payload_tenant));

        blog.assign_tenant(stamped);
        assert!(blog.belongs_to(stamped));
        assert!(!blog.belongs_to(payload_tenant));
    }

    #[test]
    fn apply_draft_keeps_identity_and_tenant() {
        let tenant = TenantId::new();
        let mut blog = Blog::from_draft(&BlogDraft::new("First", "f1")).unwrap();
        blog.assign_tenant(tenant);
        let id = blog.id_typed();

        blog.apply_draft(&BlogDraft::new("Second", "s2").with_tenant(TenantId::new()))
            .unwrap();

        assert_eq!(blog.id_typed(), id);
        assert_eq!(blog.name(), "Second");
        assert_eq!(blog.tenant_id(), Some(tenant));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: validation depends only on the trimmed character counts.
        #[test]
        fn validation_matches_trimmed_lengths(
            name in "[ a-z]{0,8}",
            handle in "[ a-z]{0,6}",
        ) {
            let ok = name.trim().chars().count() >= NAME_MIN_LEN
                && handle.trim().chars().count() >= HANDLE_MIN_LEN;
            prop_assert_eq!(Blog::from_draft(&BlogDraft::new(name, handle)).is_ok(), ok);
        }
    }
}
