// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Global user roles.

use serde::{Deserialize, Deserializer, Serialize};

/// Global role carried by the session user.
///
/// ## Role Hierarchy
///
/// - `Master` - Platform owner, may modify any resource
/// - `Admin` - Administrator, treated the same as `Master` for gating
/// - `Servant` - Serving member; gains rights only through ownership
/// - `User` - Regular member; gains rights only through ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Servant,
    Admin,
    Master,
}

impl Role {
    /// Admin and master override every ownership check.
    pub fn is_superuser(&self) -> bool {
        matches!(self, Role::Admin | Role::Master)
    }

    /// Parse role from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Role::User),
            "servant" => Some(Role::Servant),
            "admin" => Some(Role::Admin),
            "master" => Some(Role::Master),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Servant => "servant",
            Role::Admin => "admin",
            Role::Master => "master",
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    /// Unknown or missing role names degrade to `User`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Role::from_str).unwrap_or_default())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_master_are_superusers() {
        assert!(Role::Master.is_superuser());
        assert!(Role::Admin.is_superuser());
        assert!(!Role::Servant.is_superuser());
        assert!(!Role::User.is_superuser());
    }

    #[test]
    fn from_str_parses_correctly() {
        assert_eq!(Role::from_str("master"), Some(Role::Master));
        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("Servant"), Some(Role::Servant));
        assert_eq!(Role::from_str("pastor"), None);
    }

    #[test]
    fn unknown_role_deserializes_as_user() {
        let role: Role = serde_json::from_str(r#""superhero""#).unwrap();
        assert_eq!(role, Role::User);
        let role: Role = serde_json::from_str("null").unwrap();
        assert_eq!(role, Role::User);
        let role: Role = serde_json::from_str(r#""Admin""#).unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }
}
