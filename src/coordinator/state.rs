//! Construction parameters, persisted state and capability flags.

use crate::framework::CoordinatorError;
use crate::model::{Item, ItemId, ItemType, SimpleItem};
use serde::{Deserialize, Serialize};

/// An optional collection a coordinator may be required to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    PhotoList,
    ReviewList,
}

/// The set of optional collections that must load before the aggregate is
/// considered complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    photo_list: bool,
    #[serde(default)]
    review_list: bool,
}

impl Capabilities {
    /// Only the item and its rating are required.
    pub const NONE: Capabilities = Capabilities {
        photo_list: false,
        review_list: false,
    };

    pub const ALL: Capabilities = Capabilities {
        photo_list: true,
        review_list: true,
    };

    pub fn with(mut self, capability: Capability) -> Self {
        match capability {
            Capability::PhotoList => self.photo_list = true,
            Capability::ReviewList => self.review_list = true,
        }
        self
    }

    pub fn requires(&self, capability: Capability) -> bool {
        match capability {
            Capability::PhotoList => self.photo_list,
            Capability::ReviewList => self.review_list,
        }
    }

    /// Everything the remote service offers for `item_type`.
    pub fn for_item_type(item_type: ItemType) -> Self {
        let mut capabilities = Self::NONE;
        if item_type.supports_photos() {
            capabilities = capabilities.with(Capability::PhotoList);
        }
        if item_type.supports_reviews() {
            capabilities = capabilities.with(Capability::ReviewList);
        }
        capabilities
    }

    /// Every possible combination, for exhaustive tests and validation.
    pub fn combinations() -> [Capabilities; 4] {
        [
            Self::NONE,
            Self::NONE.with(Capability::PhotoList),
            Self::NONE.with(Capability::ReviewList),
            Self::ALL,
        ]
    }
}

/// What is being viewed: the item type plus the collections it requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityKind {
    pub item_type: ItemType,
    pub capabilities: Capabilities,
}

impl EntityKind {
    /// Requires every collection the type supports.
    pub fn new(item_type: ItemType) -> Self {
        Self {
            item_type,
            capabilities: Capabilities::for_item_type(item_type),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// Construction arguments of a coordinator, and the state it persists on
/// teardown so a later coordinator can resume without refetching the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemArguments {
    pub item_id: ItemId,
    #[serde(default)]
    pub simple_item: Option<SimpleItem>,
    #[serde(default)]
    pub item: Option<Item>,
}

impl ItemArguments {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            simple_item: None,
            item: None,
        }
    }

    pub fn from_simple_item(simple_item: SimpleItem) -> Self {
        Self {
            item_id: simple_item.id,
            simple_item: Some(simple_item),
            item: None,
        }
    }

    pub fn from_item(item: Item) -> Self {
        Self {
            item_id: item.id,
            simple_item: Some(item.to_simple()),
            item: Some(item),
        }
    }

    /// Settles the id: a full item wins over a simple item, which wins over
    /// the explicit id. The simple item is projected from the full item.
    pub fn resolve(self) -> Self {
        match (self.item, self.simple_item) {
            (Some(item), _) => Self::from_item(item),
            (None, Some(simple_item)) => Self::from_simple_item(simple_item),
            (None, None) => Self::new(self.item_id),
        }
    }

    /// Serializes into an opaque bundle string.
    pub fn to_bundle(&self) -> Result<String, CoordinatorError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_bundle(bundle: &str) -> Result<Self, CoordinatorError> {
        Ok(serde_json::from_str(bundle)?)
    }
}
