//! `tenantry-core` — domain foundation shared by every tenantry crate.
//!
//! This crate contains **pure domain** primitives (no storage or identity concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod tenant;

pub use entity::{Entity, TenantScoped};
pub use error::{DomainError, DomainResult};
pub use id::{BlogId, TenantId, UserId};
pub use tenant::Tenant;
