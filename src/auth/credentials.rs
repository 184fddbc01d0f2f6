//! Demo credential check of the admin login form.

use crate::config::AdminSettings;

use super::AuthError;

/// Fixed admin username/password pair
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self::from_settings(&AdminSettings::default())
    }
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_settings(settings: &AdminSettings) -> Self {
        Self::new(settings.username.clone(), settings.password.clone())
    }

    /// Plain comparison against the configured pair
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username == self.username && password == self.password {
            Ok(())
        } else {
            tracing::warn!(username, "Rejected admin login");
            Err(AuthError::InvalidCredentials)
        }
    }
}
