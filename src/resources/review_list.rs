use crate::framework::{ApiError, ItemApi, ListDelta, ResourceEvent, ResourceSlot};
use crate::model::{ItemId, ItemType, Review};
use crate::resources::{ListEntry, ListResource};
use async_trait::async_trait;

/// The item's user reviews.
pub type ReviewListResource = ListResource<Review>;

#[async_trait]
impl ListEntry for Review {
    const SLOT: ResourceSlot = ResourceSlot::ReviewList;

    fn key(&self) -> i64 {
        self.id
    }

    fn supported_by(item_type: ItemType) -> bool {
        item_type.supports_reviews()
    }

    fn into_event(delta: ListDelta<Self>) -> ResourceEvent {
        ResourceEvent::ReviewList(delta)
    }

    async fn fetch_page(
        api: &dyn ItemApi,
        item_type: ItemType,
        item_id: ItemId,
        start: usize,
        count: usize,
    ) -> Result<Vec<Self>, ApiError> {
        api.fetch_reviews(item_type, item_id, start, count).await
    }
}
