//! Session holder backed by local storage.

use std::sync::Arc;

use crate::domain::{User, UserRole};
use crate::storage::{get_json, set_json, LocalStorage};

use super::AuthError;

/// Storage key of the serialized session user
pub const SESSION_KEY: &str = "yanns_user";

/// Flag written by older admin logins; cleared on logout
pub const LEGACY_AUTH_KEY: &str = "isAuthenticated";

/// Current session, mirrored in local storage
pub struct AuthContext {
    storage: Arc<dyn LocalStorage>,
    user: Option<User>,
}

impl AuthContext {
    /// Restore the session saved in `storage`, if any.
    ///
    /// A stored value that does not decode is removed and the context
    /// starts logged out.
    pub fn restore(storage: Arc<dyn LocalStorage>) -> Result<Self, AuthError> {
        let user: Option<User> = get_json(storage.as_ref(), SESSION_KEY)?;
        if let Some(ref u) = user {
            tracing::debug!(username = %u.username, role = %u.role, "Session restored");
        }
        Ok(Self { storage, user })
    }

    /// Start a session for `username` with `role`.
    ///
    /// No credential is checked here; the returned user always carries the
    /// requested role and is authenticated.
    pub fn login(&mut self, username: &str, role: UserRole) -> Result<User, AuthError> {
        let user = User::authenticated(username, role);
        self.user = Some(user.clone());
        set_json(self.storage.as_ref(), SESSION_KEY, &user)?;

        tracing::info!(username, role = %role, "Logged in");
        Ok(user)
    }

    /// Drop the session and its stored copies
    pub fn logout(&mut self) -> Result<(), AuthError> {
        if let Some(user) = self.user.take() {
            tracing::info!(username = %user.username, "Logged out");
        }
        self.storage.remove_item(SESSION_KEY)?;
        self.storage.remove_item(LEGACY_AUTH_KEY)?;
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_authenticated)
    }

    /// Role of the session, `Guest` when logged out
    pub fn role(&self) -> UserRole {
        self.user
            .as_ref()
            .filter(|u| u.is_authenticated)
            .map(|u| u.role)
            .unwrap_or(UserRole::Guest)
    }
}
