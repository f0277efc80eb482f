//! # Item API
//!
//! The remote service is an external collaborator. Sub-resources only see it
//! through [`ItemApi`], so the transport, authentication and retry policy stay
//! outside this crate. Tests use [`MockApi`](crate::framework::mock::MockApi).

use crate::framework::ApiError;
use crate::model::{Item, ItemId, ItemType, Photo, Rating, Review};
use async_trait::async_trait;

/// Asynchronous access to the item endpoints of the remote service.
#[async_trait]
pub trait ItemApi: Send + Sync + 'static {
    /// Fetch the full detail of an item.
    async fn fetch_item(&self, item_type: ItemType, item_id: ItemId) -> Result<Item, ApiError>;

    /// Fetch the rating statistics of an item.
    async fn fetch_rating(&self, item_type: ItemType, item_id: ItemId) -> Result<Rating, ApiError>;

    /// Fetch one page of the item's photo album.
    async fn fetch_photos(
        &self,
        item_type: ItemType,
        item_id: ItemId,
        start: usize,
        count: usize,
    ) -> Result<Vec<Photo>, ApiError>;

    /// Fetch one page of the item's reviews.
    async fn fetch_reviews(
        &self,
        item_type: ItemType,
        item_id: ItemId,
        start: usize,
        count: usize,
    ) -> Result<Vec<Review>, ApiError>;
}
