//! Client-side session user and roles.

use serde::{Deserialize, Serialize};

/// Role attached to a session. Decides which pages are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Guest,
    Student,
    Business,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Guest => "GUEST",
            UserRole::Student => "STUDENT",
            UserRole::Business => "BUSINESS",
            UserRole::Admin => "ADMIN",
        };
        write!(f, "{}", s)
    }
}

/// Session object persisted in local storage.
///
/// Nothing here is verified by a server: whoever can edit the stored value
/// can become any role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub role: UserRole,
    pub is_authenticated: bool,
}

impl User {
    /// An authenticated session for the given role
    pub fn authenticated(username: impl Into<String>, role: UserRole) -> Self {
        Self {
            username: username.into(),
            role,
            is_authenticated: true,
        }
    }
}
