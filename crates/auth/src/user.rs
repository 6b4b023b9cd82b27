//! User accounts.
//!
//! A user belongs to zero or one tenant. A user without a tenant is a global
//! account (super-admin, tooling) and is exempt from tenant isolation.

use serde::{Deserialize, Serialize};

use tenantry_core::{DomainError, DomainResult, Entity, TenantId, TenantScoped, UserId};

use crate::Role;

const LOGIN_MAX_LEN: usize = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────────

/// Validate and normalize a login (trimmed, lowercased).
///
/// Logins are 1–50 characters of `[_.@A-Za-z0-9-]`.
pub fn normalize_login(raw: &str) -> DomainResult<String> {
    let login = raw.trim().to_lowercase();

    if login.is_empty() {
        return Err(DomainError::validation("login cannot be empty"));
    }
    if login.chars().count() > LOGIN_MAX_LEN {
        return Err(DomainError::validation(format!(
            "login cannot exceed {LOGIN_MAX_LEN} characters"
        )));
    }
    if let Some(bad) = login
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-')))
    {
        return Err(DomainError::validation(format!(
            "login contains invalid character '{bad}'"
        )));
    }

    Ok(login)
}

fn normalize_email(raw: Option<&str>) -> DomainResult<Option<String>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(email) if email.contains('@') => Ok(Some(email.to_lowercase())),
        Some(_) => Err(DomainError::validation("invalid email format")),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a user (admin-driven creation or self-registration).
///
/// `tenant_id` is only honoured when the creator has no tenant of its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub tenant_id: Option<TenantId>,
    pub authorities: Vec<Role>,
}

/// Request to update an existing user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub id: UserId,
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub activated: bool,
    pub tenant_id: Option<TenantId>,
    pub authorities: Vec<Role>,
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub activated: bool,
    pub tenant_id: Option<TenantId>,
    pub authorities: Vec<Role>,
}

impl User {
    /// Build a new, not yet persisted user from a creation request.
    ///
    /// The tenant is deliberately left unset: it is decided by the creating
    /// workflow and applied when the record is saved.
    pub fn from_request(req: &NewUser) -> DomainResult<Self> {
        let authorities = if req.authorities.is_empty() {
            vec![Role::USER]
        } else {
            req.authorities.clone()
        };

        Ok(Self {
            id: UserId::new(),
            login: normalize_login(&req.login)?,
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            email: normalize_email(req.email.as_deref())?,
            activated: true,
            tenant_id: None,
            authorities,
        })
    }

    /// Apply the editable fields of an update request.
    ///
    /// The tenant reference is not touched here; the update workflow decides it.
    pub fn apply_update(&mut self, update: &UserUpdate) -> DomainResult<()> {
        if update.id != self.id {
            return Err(DomainError::invariant("update targets a different user"));
        }

        self.login = normalize_login(&update.login)?;
        self.email = normalize_email(update.email.as_deref())?;
        self.first_name = update.first_name.clone();
        self.last_name = update.last_name.clone();
        self.activated = update.activated;
        self.authorities = update.authorities.clone();
        Ok(())
    }

    pub fn has_authority(&self, role: &Role) -> bool {
        self.authorities.contains(role)
    }
}

impl Entity for User {
    type Id = UserId;

    const KIND: &'static str = "user";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TenantScoped for User {
    const TENANT_REQUIRED: bool = false;

    fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    fn assign_tenant(&mut self, tenant_id: TenantId) {
        self.tenant_id = Some(tenant_id);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
