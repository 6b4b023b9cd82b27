use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Authority granted to a user (e.g. `ROLE_ADMIN`).
///
/// Authorities are opaque strings at this layer; mapping them to permissions is
/// left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("ROLE_ADMIN"));
    pub const USER: Role = Role(Cow::Borrowed("ROLE_USER"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_compare_equal_to_owned_names() {
        assert_eq!(Role::ADMIN, Role::new(String::from("ROLE_ADMIN")));
        assert_ne!(Role::ADMIN, Role::USER);
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Role::USER).unwrap(), "\"ROLE_USER\"");
    }
}
