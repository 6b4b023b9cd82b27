//! Tenant ("company") record.
//!
//! Tenants are created independently of users and blogs; they are referenced,
//! never owned, by the records that belong to them.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::TenantId;

/// An organizational boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
}

impl Tenant {
    /// Build a tenant with a fresh id.
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        Self::with_id(TenantId::new(), name)
    }

    pub fn with_id(id: TenantId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("tenant name cannot be empty"));
        }
        Ok(Self { id, name })
    }
}

impl Entity for Tenant {
    type Id = TenantId;

    const KIND: &'static str = "tenant";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
