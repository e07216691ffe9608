//! Dashboard users.

use serde::{Deserialize, Serialize};

use super::{KeySpellings, lenient};
use crate::types::{UserId, UserRole};

/// A user account managed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "Id", alias = "uid")]
    pub id: UserId,
    #[serde(alias = "userName", alias = "user_name", alias = "login")]
    pub username: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(
        default,
        alias = "fullName",
        alias = "name",
        deserialize_with = "lenient::optional_text"
    )]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(
        default = "lenient::default_true",
        alias = "isActive",
        alias = "active"
    )]
    pub is_active: bool,
    #[serde(
        default,
        alias = "createdAt",
        deserialize_with = "lenient::optional_text"
    )]
    pub created_at: Option<String>,
}

impl KeySpellings for User {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id", "uid"],
        &["username", "userName", "user_name", "login"],
        &["email", "Email"],
        &["full_name", "fullName", "name"],
        &["is_active", "isActive", "active"],
        &["created_at", "createdAt"],
    ];
}

impl User {
    /// Full name when known, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

/// Payload for creating a user.
///
/// `Debug` is implemented manually to keep the password out of logs.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub password: String,
    pub is_active: bool,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("password", &"[REDACTED]")
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// Payload for updating a user. The password is only sent when changed.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub is_active: bool,
}

impl std::fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("is_active", &self.is_active)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_sparse_user() {
        let user: User = serde_json::from_str(r#"{"Id": 5, "userName": "kim"}"#).unwrap();
        assert_eq!(user.id, UserId::new(5));
        assert_eq!(user.username, "kim");
        assert!(user.is_active);
        assert_eq!(user.role, UserRole::Staff);
        assert_eq!(user.display_name(), "kim");
    }

    #[test]
    fn test_decodes_role_in_any_case() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "username": "ana", "role": "ADMIN", "isActive": false, "fullName": "Ana M"}"#,
        )
        .unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert!(!user.is_active);
        assert_eq!(user.display_name(), "Ana M");
    }

    #[test]
    fn test_debug_redacts_password() {
        let user = NewUser {
            username: "kim".into(),
            email: "kim@depot.example".into(),
            full_name: None,
            role: UserRole::Manager,
            password: "hunter22hunter".into(),
            is_active: true,
        };
        let debug = format!("{user:?}");
        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_update_omits_unchanged_password() {
        let update = UserUpdate {
            username: "kim".into(),
            email: "kim@depot.example".into(),
            full_name: None,
            role: UserRole::Staff,
            password: None,
            is_active: true,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["role"], "staff");
    }

    #[test]
    fn test_user_with_repeated_spellings_decodes() {
        let user: User = crate::models::decode(
            br#"{"id": 1, "uid": 1, "username": "ops", "login": "ops",
                "name": "Ops Desk", "full_name": "Ops Desk", "active": false, "is_active": false}"#,
        )
        .unwrap();
        assert_eq!(user.username, "ops");
        assert_eq!(user.display_name(), "Ops Desk");
        assert!(!user.is_active);
    }
}
