//! Published content items (audio summaries, slides, infographics...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Description used when the admin publishes without one.
pub const DEFAULT_DESCRIPTION: &str = "Contenu ajouté par l'admin";

/// Placeholder URL given to every published item.
pub const PLACEHOLDER_URL: &str = "#";

/// A single item of the content catalog.
///
/// There is no update operation: items are created on publish and removed
/// on delete. Ids are timestamp-derived and assumed unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ContentCategory,
    pub url: String,
    /// Compressed format suitable for low mobile data usage
    pub is_zero_data: bool,
    /// Publication day (`YYYY-MM-DD`)
    pub date: String,
}

impl ContentItem {
    /// Create an item dated today with the placeholder URL.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: ContentCategory,
        is_zero_data: bool,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            category,
            url: PLACEHOLDER_URL.to_string(),
            is_zero_data,
            date: format_day(Utc::now()),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }
}

/// Kind of published content. One admin tab per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentCategory {
    Audio,
    Video,
    Slide,
    Infographic,
}

impl ContentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Audio => "AUDIO",
            ContentCategory::Video => "VIDEO",
            ContentCategory::Slide => "SLIDE",
            ContentCategory::Infographic => "INFOGRAPHIC",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format a timestamp as the `YYYY-MM-DD` day used by content items.
pub fn format_day(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// The catalog every fresh content store starts from.
pub fn seed_content() -> Vec<ContentItem> {
    vec![
        ContentItem::new(
            "1",
            "Résumé Droit Civil L2",
            "Audio de révision rapide pour les partiels.",
            ContentCategory::Audio,
            true,
        )
        .with_date("2023-10-25"),
        ContentItem::new(
            "2",
            "Structure Pitch Deck Investisseurs",
            "Template PDF pour lever des fonds.",
            ContentCategory::Slide,
            false,
        )
        .with_date("2023-10-26"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_content_item_wire_format() {
        let item = ContentItem::new("42", "Titre", "Desc", ContentCategory::Infographic, true)
            .with_date("2024-01-02");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["isZeroData"], true);
        assert_eq!(json["category"], "INFOGRAPHIC");
        assert_eq!(json["date"], "2024-01-02");
        assert_eq!(json["url"], "#");
    }

    #[test]
    fn test_format_day() {
        let at = Utc.with_ymd_and_hms(2023, 10, 25, 18, 30, 0).unwrap();
        assert_eq!(format_day(at), "2023-10-25");
    }

    #[test]
    fn test_seed_content() {
        let seed = seed_content();
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].id, "1");
        assert!(seed[0].is_zero_data);
        assert_eq!(seed[1].category, ContentCategory::Slide);
        assert!(!seed[1].is_zero_data);
    }
}
