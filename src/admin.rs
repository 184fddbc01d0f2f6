//! Admin dashboard: publish, browse and delete catalog content.
//!
//! Every action goes through the [`Database`] facade: catalog changes hit
//! `sql`, and an entry is appended to the `nosql` activity log.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use thiserror::Error;

use crate::auth::{AuthContext, AuthError};
use crate::domain::content::{format_day, DEFAULT_DESCRIPTION};
use crate::domain::{actions, ContentCategory, ContentItem, UserRole};
use crate::db::Database;
use crate::storage::StorageError;

/// Shown when a publish is attempted without files or title
pub const INVALID_UPLOAD_MESSAGE: &str = "Veuillez ajouter un fichier et un titre.";

/// Default processing delay of a publish
pub const DEFAULT_PUBLISH_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Accès réservé à l'administrateur")]
    AccessDenied,

    #[error("{}", INVALID_UPLOAD_MESSAGE)]
    InvalidUpload,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Metadata of a publish batch
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Names of the uploaded files, one item per file
    pub files: Vec<String>,
    pub title: String,
    /// Blank falls back to [`DEFAULT_DESCRIPTION`]
    pub description: String,
    pub category: ContentCategory,
    pub is_zero_data: bool,
}

impl PublishRequest {
    pub fn new(title: impl Into<String>, category: ContentCategory) -> Self {
        Self {
            files: Vec::new(),
            title: title.into(),
            description: String::new(),
            category,
            is_zero_data: true,
        }
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn zero_data(mut self, is_zero_data: bool) -> Self {
        self.is_zero_data = is_zero_data;
        self
    }

    /// Build the catalog items of this batch, stamped with `millis`
    fn items(&self, millis: i64, date: &str) -> Vec<ContentItem> {
        let many = self.files.len() > 1;
        let description = if self.description.trim().is_empty() {
            DEFAULT_DESCRIPTION
        } else {
            self.description.as_str()
        };

        (0..self.files.len())
            .map(|index| {
                let title = if many {
                    format!("{} ({})", self.title, index + 1)
                } else {
                    self.title.clone()
                };
                ContentItem::new(
                    format!("{}{}", millis, index),
                    title,
                    description,
                    self.category,
                    self.is_zero_data,
                )
                .with_date(date)
            })
            .collect()
    }
}

/// Admin session over the shared database
pub struct AdminDashboard {
    db: Arc<Database>,
    auth: AuthContext,
    publish_delay: Duration,
}

impl AdminDashboard {
    pub fn new(db: Arc<Database>, auth: AuthContext) -> Self {
        Self {
            db,
            auth,
            publish_delay: DEFAULT_PUBLISH_DELAY,
        }
    }

    pub fn with_publish_delay(mut self, delay: Duration) -> Self {
        self.publish_delay = delay;
        self
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn admin_name(&self) -> Result<String, AdminError> {
        match self.auth.user() {
            Some(user) if user.is_authenticated && user.role == UserRole::Admin => {
                Ok(user.username.clone())
            }
            _ => Err(AdminError::AccessDenied),
        }
    }

    /// Enter the dashboard; returns the whole catalog
    pub async fn open(&self) -> Result<Vec<ContentItem>, AdminError> {
        let user = self.admin_name()?;
        let items = self.db.sql.get_all_content().await;
        self.db
            .nosql
            .insert_log(actions::ADMIN_ACCESS_DASHBOARD, json!({ "user": user }))?;

        tracing::info!(user = %user, items = items.len(), "Admin dashboard opened");
        Ok(items)
    }

    /// Items shown under one category tab
    pub async fn tab(&self, category: ContentCategory) -> Result<Vec<ContentItem>, AdminError> {
        self.admin_name()?;
        Ok(self.db.sql.get_by_category(category).await)
    }

    /// Publish one item per file; returns the new items in file order
    pub async fn publish(&self, request: &PublishRequest) -> Result<Vec<ContentItem>, AdminError> {
        self.admin_name()?;
        if request.files.is_empty() || request.title.trim().is_empty() {
            return Err(AdminError::InvalidUpload);
        }

        if !self.publish_delay.is_zero() {
            tokio::time::sleep(self.publish_delay).await;
        }

        let now = Utc::now();
        let items = request.items(now.timestamp_millis(), &format_day(now));
        for item in &items {
            self.db.sql.insert_content(item.clone()).await;
        }

        self.db.nosql.insert_log(
            actions::UPLOAD_BATCH,
            json!({ "count": items.len(), "category": request.category }),
        )?;

        tracing::info!(
            count = items.len(),
            category = %request.category,
            "Published content batch"
        );
        Ok(items)
    }

    /// Remove a catalog item; returns whether it existed
    pub async fn delete(&self, id: &str) -> Result<bool, AdminError> {
        self.admin_name()?;
        let removed = self.db.sql.delete_content(id).await;
        self.db
            .nosql
            .insert_log(actions::DELETE_CONTENT, json!({ "contentId": id }))?;

        tracing::info!(id, removed, "Deleted content");
        Ok(removed)
    }

    /// Log the logout, then end the session
    pub fn logout(&mut self) -> Result<(), AdminError> {
        self.db.nosql.insert_log(actions::ADMIN_LOGOUT, json!({}))?;
        self.auth.logout()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseOptions;
    use crate::storage::MemoryStorage;

    fn dashboard(role: Option<UserRole>) -> AdminDashboard {
        let storage = Arc::new(MemoryStorage::new());
        let db = Arc::new(Database::new(storage.clone(), &DatabaseOptions::instant()));
        let mut auth = AuthContext::restore(storage).unwrap();
        if let Some(role) = role {
            auth.login("admin", role).unwrap();
        }
        AdminDashboard::new(db, auth).with_publish_delay(Duration::ZERO)
    }

    #[test]
    fn test_batch_items() {
        let request = PublishRequest::new("Cours OHADA", ContentCategory::Video)
            .with_files(["a.mp4", "b.mp4"])
            .zero_data(false);
        let items = request.items(1700000000000, "2024-01-02");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "17000000000000");
        assert_eq!(items[1].id, "17000000000001");
        assert_eq!(items[0].title, "Cours OHADA (1)");
        assert_eq!(items[1].title, "Cours OHADA (2)");
        assert_eq!(items[0].description, DEFAULT_DESCRIPTION);
        assert_eq!(items[0].url, "#");
        assert_eq!(items[0].date, "2024-01-02");
        assert!(!items[1].is_zero_data);
    }

    #[test]
    fn test_single_file_keeps_title() {
        let request = PublishRequest::new("Résumé", ContentCategory::Audio)
            .with_files(["a.mp3"])
            .with_description("Chapitre 1");
        let items = request.items(5, "2024-01-02");
        assert_eq!(items[0].title, "Résumé");
        assert_eq!(items[0].description, "Chapitre 1");
    }

    #[tokio::test]
    async fn test_non_admin_is_denied() {
        for role in [None, Some(UserRole::Student), Some(UserRole::Business)] {
            let dash = dashboard(role);
            assert!(matches!(dash.open().await, Err(AdminError::AccessDenied)));
            assert!(matches!(dash.delete("1").await, Err(AdminError::AccessDenied)));
        }
    }

    #[tokio::test]
    async fn test_open_logs_access() {
        let dash = dashboard(Some(UserRole::Admin));
        let items = dash.open().await.unwrap();
        assert_eq!(items.len(), 2);

        let logs = dash.database().nosql.get_logs().unwrap();
        assert_eq!(logs[0].action, actions::ADMIN_ACCESS_DASHBOARD);
        assert_eq!(logs[0].metadata["user"], "admin");
    }

    #[tokio::test]
    async fn test_publish_rejects_missing_input() {
        let dash = dashboard(Some(UserRole::Admin));

        let no_files = PublishRequest::new("Titre", ContentCategory::Audio);
        let err = dash.publish(&no_files).await.unwrap_err();
        assert_eq!(err.to_string(), INVALID_UPLOAD_MESSAGE);

        let no_title = PublishRequest::new("  ", ContentCategory::Audio).with_files(["a"]);
        assert!(matches!(dash.publish(&no_title).await, Err(AdminError::InvalidUpload)));

        assert!(dash.database().nosql.get_logs().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_inserts_and_logs_batch() {
        let dash = dashboard(Some(UserRole::Admin));
        let request = PublishRequest::new("Infographie", ContentCategory::Infographic)
            .with_files(["a.png", "b.png", "c.png"]);

        let items = dash.publish(&request).await.unwrap();
        assert_eq!(items.len(), 3);

        let all = dash.database().sql.get_all_content().await;
        assert_eq!(all.len(), 5);
        assert_eq!(dash.tab(ContentCategory::Infographic).await.unwrap().len(), 3);

        let logs = dash.database().nosql.get_logs().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, actions::UPLOAD_BATCH);
        assert_eq!(logs[0].metadata["count"], 3);
        assert_eq!(logs[0].metadata["category"], "INFOGRAPHIC");
    }

    #[tokio::test]
    async fn test_delete_and_logout() {
        let mut dash = dashboard(Some(UserRole::Admin));

        assert!(dash.delete("1").await.unwrap());
        assert!(!dash.delete("1").await.unwrap());

        dash.logout().unwrap();
        assert!(dash.auth().user().is_none());

        let recorded: Vec<_> = dash
            .database()
            .nosql
            .get_logs()
            .unwrap()
            .into_iter()
            .map(|l| l.action)
            .collect();
        assert_eq!(
            recorded,
            vec![
                actions::ADMIN_LOGOUT,
                actions::DELETE_CONTENT,
                actions::DELETE_CONTENT
            ]
        );
    }
}
