//! Admin Dashboard Integration Tests
//!
//! Tests for the publish/delete flow and the activity it records.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use yannsnote::domain::actions;
use yannsnote::storage::FileStorage;
use yannsnote::{
    AdminDashboard, AdminError, AuthContext, ContentCategory, Database, DatabaseOptions,
    PublishRequest, UserRole,
};

fn admin_dashboard(temp: &TempDir) -> AdminDashboard {
    let storage = Arc::new(FileStorage::in_dir(temp.path()));
    let db = Arc::new(Database::new(storage.clone(), &DatabaseOptions::instant()));
    let mut auth = AuthContext::restore(storage).unwrap();
    auth.login("admin", UserRole::Admin).unwrap();
    AdminDashboard::new(db, auth).with_publish_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_publish_then_delete_one() {
    let temp = TempDir::new().unwrap();
    let dash = admin_dashboard(&temp);
    dash.open().await.unwrap();

    let request = PublishRequest::new("Fiche Droit", ContentCategory::Audio)
        .with_files(["a.mp3", "b.mp3"]);
    let published = dash.publish(&request).await.unwrap();
    assert_eq!(published[0].title, "Fiche Droit (1)");
    assert_eq!(published[1].title, "Fiche Droit (2)");
    assert!(published[0].id.ends_with('0'));
    assert!(published[1].id.ends_with('1'));

    assert!(dash.delete(&published[0].id).await.unwrap());

    let ids: Vec<String> = dash
        .database()
        .sql
        .get_all_content()
        .await
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert!(!ids.contains(&published[0].id));
    assert!(ids.contains(&published[1].id));
    assert_eq!(ids.len(), 3);

    let logs = dash.database().nosql.get_logs().unwrap();
    let recorded: Vec<&str> = logs.iter().map(|l| l.action.as_str()).collect();
    assert_eq!(
        recorded,
        vec![
            actions::DELETE_CONTENT,
            actions::UPLOAD_BATCH,
            actions::ADMIN_ACCESS_DASHBOARD
        ]
    );
    assert_eq!(logs[0].metadata["contentId"], published[0].id.as_str());
    assert_eq!(logs[1].metadata["count"], 2);
    assert_eq!(logs[1].metadata["category"], "AUDIO");
}

#[tokio::test]
async fn test_logout_records_then_clears_session() {
    let temp = TempDir::new().unwrap();
    let mut dash = admin_dashboard(&temp);

    dash.logout().unwrap();
    assert!(matches!(dash.open().await, Err(AdminError::AccessDenied)));

    // Log persisted in the same home
    let storage = Arc::new(FileStorage::in_dir(temp.path()));
    let db = Database::new(storage.clone(), &DatabaseOptions::instant());
    let logs = db.nosql.get_logs().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, actions::ADMIN_LOGOUT);

    assert!(AuthContext::restore(storage).unwrap().user().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_publish_waits_processing_delay() {
    let temp = TempDir::new().unwrap();
    let dash = admin_dashboard(&temp).with_publish_delay(Duration::from_secs(1));

    let started = tokio::time::Instant::now();
    dash.publish(&PublishRequest::new("Pitch", ContentCategory::Slide).with_files(["deck.pdf"]))
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_secs(1));
}
