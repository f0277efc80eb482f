use serde::{Deserialize, Serialize};

/// A still from an item's photo album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl Photo {
    pub fn new(id: i64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            description: String::new(),
        }
    }
}
