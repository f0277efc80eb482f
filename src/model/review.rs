use serde::{Deserialize, Serialize};

/// A user review of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub summary: String,
}

impl Review {
    /// Creates a new Review.
    ///
    /// # Arguments
    /// * `id` - Remote identifier
    /// * `title` - Review headline
    /// * `author` - Display name of the reviewer
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            rating: None,
            summary: String::new(),
        }
    }
}
