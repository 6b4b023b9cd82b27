//! Caller identity boundary.
//!
//! Authentication itself (tokens, sessions, passwords) happens elsewhere; by
//! the time a call reaches the isolation layer, all that is left is "which
//! login is calling, if any".

/// Resolves the login of the current caller.
///
/// `None` means the call is anonymous or internal (system jobs, bootstrap).
pub trait IdentityResolver {
    fn current_login(&self) -> Option<String>;
}

impl<F> IdentityResolver for F
where
    F: Fn() -> Option<String>,
{
    fn current_login(&self) -> Option<String> {
        self()
    }
}

/// An unauthenticated caller.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Anonymous;

impl IdentityResolver for Anonymous {
    fn current_login(&self) -> Option<String> {
        None
    }
}

/// A caller whose login was resolved up front (e.g. from a validated token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedIdentity {
    login: String,
}

impl FixedIdentity {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }
}

impl IdentityResolver for FixedIdentity {
    fn current_login(&self) -> Option<String> {
        Some(self.login.clone())
    }
}
