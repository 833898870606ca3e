// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed-in user representation.

use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::models::{deserialize_optional_id, UserId};

/// The authenticated user as returned by the login endpoint.
///
/// This is the identity every authorization decision is made against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Canonical user id. `None` when the backend sent no usable id, in which
    /// case the gate denies everything.
    #[serde(
        default,
        alias = "_id",
        alias = "userId",
        deserialize_with = "deserialize_optional_id"
    )]
    pub id: Option<UserId>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    /// Global role (unknown names degrade to `user`)
    #[serde(default, rename = "roleName", alias = "role_name", alias = "role")]
    pub role_name: Role,
}

impl SessionUser {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, role_name: Role) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            email: String::new(),
            role_name,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn is_superuser(&self) -> bool {
        self.role_name.is_superuser()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_login_user() {
        let user: SessionUser = serde_json::from_value(json!({
            "id": 42,
            "name": "Miriam",
            "email": "miriam@example.org",
            "roleName": "servant"
        }))
        .unwrap();

        assert_eq!(user.id, Some(UserId::new("42")));
        assert_eq!(user.role_name, Role::Servant);
    }

    #[test]
    fn accepts_snake_case_role_and_defaults() {
        let user: SessionUser =
            serde_json::from_value(json!({ "_id": "abc", "role_name": "ADMIN" })).unwrap();
        assert_eq!(user.id, Some(UserId::new("abc")));
        assert_eq!(user.role_name, Role::Admin);
        assert!(user.is_superuser());

        let user: SessionUser = serde_json::from_value(json!({ "name": "Nobody" })).unwrap();
        assert_eq!(user.id, None);
        assert_eq!(user.role_name, Role::User);
    }

    #[test]
    fn round_trips_through_storage_form() {
        let user = SessionUser::new("u-1", "Ruth", Role::Master).with_email("ruth@example.org");
        let stored = serde_json::to_string(&user).unwrap();
        assert!(stored.contains(r#""roleName":"master""#));
        let restored: SessionUser = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, user);
    }
}
