//! Relational-style content store.
//!
//! Holds the content catalog in memory, seeded on construction. Every
//! operation waits the configured latency before touching the list and
//! traces the statement a real SQL backend would have run. Operations never
//! fail; nothing survives a restart.

use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::{seed_content, ContentCategory, ContentItem};

/// In-memory content table behind simulated network latency
#[derive(Debug)]
pub struct ContentStore {
    items: RwLock<Vec<ContentItem>>,
    latency: Duration,
}

impl ContentStore {
    /// Store seeded with the default catalog
    pub fn new(latency: Duration) -> Self {
        Self::with_items(seed_content(), latency)
    }

    /// Store starting from the given items (first item is the newest)
    pub fn with_items(items: Vec<ContentItem>, latency: Duration) -> Self {
        Self {
            items: RwLock::new(items),
            latency,
        }
    }

    /// Simulate the round trip to the database
    async fn query(&self, statement: &str) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        tracing::debug!("[SQL EXECUTION]: {}", statement);
    }

    /// All items, most recently inserted first
    pub async fn get_all_content(&self) -> Vec<ContentItem> {
        self.query("SELECT * FROM content_items WHERE active = true")
            .await;
        self.items.read().await.clone()
    }

    /// Items of a single category, in list order
    pub async fn get_by_category(&self, category: ContentCategory) -> Vec<ContentItem> {
        self.query(&format!(
            "SELECT * FROM content_items WHERE active = true AND category = '{}'",
            category
        ))
        .await;

        self.items
            .read()
            .await
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect()
    }

    /// Put `item` at the head of the list and hand it back
    pub async fn insert_content(&self, item: ContentItem) -> ContentItem {
        self.query(&format!(
            "INSERT INTO content_items VALUES ('{}', '{}', '{}')",
            item.id, item.title, item.category
        ))
        .await;

        self.items.write().await.insert(0, item.clone());
        item
    }

    /// Remove every item whose id is exactly `id`.
    ///
    /// Returns whether anything was removed; an unknown id is not an error.
    pub async fn delete_content(&self, id: &str) -> bool {
        self.query(&format!("DELETE FROM content_items WHERE id = '{}'", id))
            .await;

        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        items.len() != before
    }

    /// Number of items currently held (no simulated latency)
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: ContentCategory) -> ContentItem {
        ContentItem::new(id, format!("Item {}", id), "desc", category, true)
    }

    #[tokio::test]
    async fn test_seeded_on_construction() {
        let store = ContentStore::new(Duration::ZERO);
        let items = store.get_all_content().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "1");
    }

    #[tokio::test]
    async fn test_insert_prepends() {
        let store = ContentStore::new(Duration::ZERO);
        let inserted = store.insert_content(item("99", ContentCategory::Video)).await;
        assert_eq!(inserted.id, "99");

        let items = store.get_all_content().await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "99");
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_id() {
        let store = ContentStore::with_items(
            vec![
                item("a", ContentCategory::Audio),
                item("b", ContentCategory::Audio),
                item("c", ContentCategory::Slide),
            ],
            Duration::ZERO,
        );

        assert!(store.delete_content("b").await);

        let ids: Vec<String> = store
            .get_all_content()
            .await
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let store = ContentStore::new(Duration::ZERO);
        assert!(!store.delete_content("nope").await);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_delete_does_not_match_prefix() {
        let store = ContentStore::with_items(
            vec![item("1", ContentCategory::Audio), item("10", ContentCategory::Audio)],
            Duration::ZERO,
        );
        store.delete_content("1").await;

        let items = store.get_all_content().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "10");
    }

    #[tokio::test]
    async fn test_get_by_category() {
        let store = ContentStore::new(Duration::ZERO);
        let slides = store.get_by_category(ContentCategory::Slide).await;
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].id, "2");
        assert!(store.get_by_category(ContentCategory::Video).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_operations_wait_for_latency() {
        let store = ContentStore::new(Duration::from_millis(800));
        let started = tokio::time::Instant::now();
        store.get_all_content().await;
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
