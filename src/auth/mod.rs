//! Client-side authentication.
//!
//! A session is a [`User`](crate::domain::User) persisted in local storage.
//! There is no token, no expiry and no server check: this is a capability
//! demo, and anyone who can edit the stored value can pick their role.

pub mod credentials;
pub mod guard;
pub mod session;

use thiserror::Error;

use crate::storage::StorageError;

pub use credentials::AdminCredentials;
pub use guard::{Access, AccessGuard, Page};
pub use session::{AuthContext, LEGACY_AUTH_KEY, SESSION_KEY};

/// Message shown when the admin form is filled in wrongly
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Identifiants incorrects. Essayez admin/admin";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}
