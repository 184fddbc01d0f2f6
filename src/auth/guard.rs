//! Role-based page access.

use serde::Serialize;

use crate::domain::{User, UserRole};

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Granted,
    /// No authenticated session: send to the login page
    RedirectToLogin,
    /// Logged in with a role that may not see the page: send home
    RedirectToHome,
}

/// Pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Students,
    Business,
    Admin,
    Login,
    Brain,
    Studio,
    Privacy,
    Faq,
}

impl Page {
    pub const ALL: [Page; 9] = [
        Page::Home,
        Page::Students,
        Page::Business,
        Page::Admin,
        Page::Login,
        Page::Brain,
        Page::Studio,
        Page::Privacy,
        Page::Faq,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Students => "/students",
            Page::Business => "/business",
            Page::Admin => "/admin",
            Page::Login => "/login",
            Page::Brain => "/brain",
            Page::Studio => "/studio",
            Page::Privacy => "/privacy",
            Page::Faq => "/faq",
        }
    }

    /// Roles allowed on the page; `None` means the page is public
    pub fn allowed_roles(&self) -> Option<&'static [UserRole]> {
        match self {
            Page::Students => Some(&[UserRole::Student, UserRole::Admin]),
            Page::Business => Some(&[UserRole::Business, UserRole::Admin]),
            Page::Admin => Some(&[UserRole::Admin]),
            _ => None,
        }
    }
}

impl std::str::FromStr for Page {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let trimmed = s.trim().trim_start_matches('#');
        let key = trimmed.trim_matches('/').to_lowercase();
        Page::ALL
            .into_iter()
            .find(|p| p.path().trim_matches('/') == key)
            .ok_or_else(|| anyhow::anyhow!("Unknown page: {}", s))
    }
}

/// Decides whether a session may open a page
pub struct AccessGuard;

impl AccessGuard {
    /// Check `user` against an optional role allow-list.
    ///
    /// Without an allow-list only authentication is required.
    pub fn check(user: Option<&User>, allowed_roles: Option<&[UserRole]>) -> Access {
        let Some(user) = user.filter(|u| u.is_authenticated) else {
            return Access::RedirectToLogin;
        };

        match allowed_roles {
            Some(roles) if !roles.contains(&user.role) => Access::RedirectToHome,
            _ => Access::Granted,
        }
    }

    /// Check access to a page; public pages are always granted
    pub fn check_page(user: Option<&User>, page: Page) -> Access {
        match page.allowed_roles() {
            None => Access::Granted,
            Some(roles) => Self::check(user, Some(roles)),
        }
    }
}
