use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Identifier of a collectable item on the remote service.
pub type ItemId = i64;

/// The kind of collectable item being viewed.
///
/// The type decides which auxiliary collections the remote service offers:
/// every type has reviews, but only screen media and games have photo albums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Book,
    Game,
    Movie,
    Music,
    Tv,
}

impl ItemType {
    /// Path segment used by the remote API for this type.
    pub fn api_path(&self) -> &'static str {
        match self {
            ItemType::Book => "book",
            ItemType::Game => "game",
            ItemType::Movie => "movie",
            ItemType::Music => "music",
            ItemType::Tv => "tv",
        }
    }

    /// Whether the remote service exposes a photo album for this type.
    pub fn supports_photos(&self) -> bool {
        matches!(self, ItemType::Game | ItemType::Movie | ItemType::Tv)
    }

    /// Whether the remote service exposes reviews for this type.
    pub fn supports_reviews(&self) -> bool {
        true
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_path())
    }
}

/// The summary form of an item, as embedded in lists and search results.
///
/// Often available before the detail screen opens, so it is accepted as a
/// warm start for the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleItem {
    pub id: ItemId,
    pub item_type: ItemType,
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    /// Denormalized average rating.
    #[serde(default)]
    pub rating: Option<f64>,
}

impl SimpleItem {
    /// Creates a new SimpleItem without cover or rating.
    pub fn new(id: ItemId, item_type: ItemType, title: impl Into<String>) -> Self {
        Self {
            id,
            item_type,
            title: title.into(),
            cover_url: None,
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// The full detail form of an item.
///
/// Carries every field of [`SimpleItem`] and dereferences to it, so an `Item`
/// can be used anywhere a `SimpleItem` is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(flatten)]
    pub simple: SimpleItem,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub photo_count: u32,
    #[serde(default)]
    pub review_count: u32,
}

impl Item {
    /// Creates a new Item with empty detail fields.
    ///
    /// # Arguments
    /// * `id` - Remote identifier
    /// * `item_type` - Kind of item
    /// * `title` - Display title
    pub fn new(id: ItemId, item_type: ItemType, title: impl Into<String>) -> Self {
        Self {
            simple: SimpleItem::new(id, item_type, title),
            intro: String::new(),
            genres: Vec::new(),
            photo_count: 0,
            review_count: 0,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.simple.rating = Some(rating);
        self
    }

    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = intro.into();
        self
    }

    /// The summary projection of this item.
    pub fn to_simple(&self) -> SimpleItem {
        self.simple.clone()
    }
}

impl Deref for Item {
    type Target = SimpleItem;

    fn deref(&self) -> &SimpleItem {
        &self.simple
    }
}

impl AsRef<SimpleItem> for Item {
    fn as_ref(&self) -> &SimpleItem {
        &self.simple
    }
}

impl From<Item> for SimpleItem {
    fn from(item: Item) -> Self {
        item.simple
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_substitutes_for_simple_item() {
        let item = Item::new(7, ItemType::Movie, "Stalker").with_rating(4.5);

        fn title_of(simple: &SimpleItem) -> &str {
            &simple.title
        }

        assert_eq!(title_of(&item), "Stalker");
        assert_eq!(item.id, 7);
        assert_eq!(SimpleItem::from(item.clone()).rating, Some(4.5));
    }

    #[test]
    fn item_serializes_flat() {
        let item = Item::new(3, ItemType::Book, "Solaris").with_intro("Ocean");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["item_type"], "book");
        assert_eq!(json["intro"], "Ocean");

        // A serialized Item can be read back as its summary.
        let simple: SimpleItem = serde_json::from_value(json).unwrap();
        assert_eq!(simple.title, "Solaris");
    }

    #[test]
    fn photo_support_by_type() {
        assert!(ItemType::Movie.supports_photos());
        assert!(!ItemType::Book.supports_photos());
        assert!(ItemType::Music.supports_reviews());
    }
}
