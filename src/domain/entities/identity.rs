//! Authenticated identity handed to the application layer.

use std::fmt;
use std::str::FromStr;

/// Authorization role attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts `USER`/`ADMIN` in any case, with or without a `ROLE_` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// An already-authenticated caller.
///
/// The allocator trusts this value completely; producing it is the job of
/// [`crate::application::services::IdentityProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub display_name: String,
    pub roles: Vec<Role>,
}

impl Identity {
    pub fn new(id: i64, display_name: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            roles,
        }
    }

    /// Builds an identity from stored role names, skipping unknown ones.
    pub fn from_role_names(id: i64, display_name: impl Into<String>, names: &[String]) -> Self {
        let roles = names
            .iter()
            .filter_map(|name| name.parse::<Role>().ok())
            .collect();
        Self::new(id, display_name, roles)
    }

    /// Returns true if the identity holds `role`. Admins hold every role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&Role::Admin) || self.roles.contains(&role)
    }
}
