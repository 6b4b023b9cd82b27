//! `tenantry-auth` — identity boundary and user accounts.
//!
//! This crate is intentionally decoupled from transport and storage: it only
//! states who the caller is and what a user account looks like.

pub mod identity;
pub mod roles;
pub mod user;

pub use identity::{Anonymous, FixedIdentity, IdentityResolver};
pub use roles::Role;
pub use user::{NewUser, User, UserUpdate, normalize_login};
