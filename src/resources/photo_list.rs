use crate::framework::{ApiError, ItemApi, ListDelta, ResourceEvent, ResourceSlot};
use crate::model::{ItemId, ItemType, Photo};
use crate::resources::{ListEntry, ListResource};
use async_trait::async_trait;

/// The item's photo album.
pub type PhotoListResource = ListResource<Photo>;

#[async_trait]
impl ListEntry for Photo {
    const SLOT: ResourceSlot = ResourceSlot::PhotoList;

    fn key(&self) -> i64 {
        self.id
    }

    fn supported_by(item_type: ItemType) -> bool {
        item_type.supports_photos()
    }

    fn into_event(delta: ListDelta<Self>) -> ResourceEvent {
        ResourceEvent::PhotoList(delta)
    }

    async fn fetch_page(
        api: &dyn ItemApi,
        item_type: ItemType,
        item_id: ItemId,
        start: usize,
        count: usize,
    ) -> Result<Vec<Self>, ApiError> {
        api.fetch_photos(item_type, item_id, start, count).await
    }
}
