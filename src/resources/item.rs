use crate::framework::{ApiError, Attachment, ItemApi, Mailbox, ResourceEvent, ResourceSlot, SubResource};
use crate::model::{Item, ItemId, ItemType, SimpleItem};
use std::sync::Arc;

/// Loads the item detail.
///
/// A full [`Item`] passed at attach time counts as loaded and no request is
/// made. A [`SimpleItem`] is kept for display while the detail loads.
pub struct ItemResource {
    attachment: Attachment,
    simple_item: Option<SimpleItem>,
    item: Option<Item>,
}

impl ItemResource {
    pub fn attach_to(
        item_type: ItemType,
        item_id: ItemId,
        simple_item: Option<SimpleItem>,
        item: Option<Item>,
        api: Arc<dyn ItemApi>,
        mailbox: Mailbox,
    ) -> Result<Self, ApiError> {
        let attachment = Attachment::new(ResourceSlot::Item, item_type, item_id, api, mailbox)?;

        let cached_ids = item
            .as_ref()
            .map(|item| item.id)
            .into_iter()
            .chain(simple_item.as_ref().map(|simple| simple.id));
        for cached_id in cached_ids {
            if cached_id != item_id {
                return Err(ApiError::Configuration(format!(
                    "cached item {cached_id} does not match item id {item_id}"
                )));
            }
        }

        let simple_item = item.as_ref().map(Item::to_simple).or(simple_item);
        let mut resource = Self {
            attachment,
            simple_item,
            item,
        };
        if resource.item.is_none() {
            resource.reload();
        }
        Ok(resource)
    }

    /// Fetches the item again. Returns `false` if a fetch is already running.
    pub fn reload(&mut self) -> bool {
        let api = self.attachment.api();
        let item_type = self.attachment.item_type();
        let item_id = self.attachment.item_id();
        self.attachment.spawn_load(async move {
            let item = api.fetch_item(item_type, item_id).await?;
            Ok(ResourceEvent::ItemChanged(item))
        })
    }

    /// The summary form, available as soon as either form is known.
    pub fn simple_item(&self) -> Option<&SimpleItem> {
        self.simple_item.as_ref()
    }
}

impl SubResource for ItemResource {
    type Value = Item;
    type Change = Item;

    fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    fn attachment_mut(&mut self) -> &mut Attachment {
        &mut self.attachment
    }

    fn get(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    fn apply_change(&mut self, item: Item) {
        self.attachment.settle();
        self.simple_item = Some(item.to_simple());
        self.item = Some(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockApi;

    fn mailbox() -> Mailbox {
        Mailbox::channel(8).0
    }

    #[tokio::test]
    async fn test_warm_start_skips_fetch() {
        let mock = Arc::new(MockApi::new());
        let item = Item::new(42, ItemType::Movie, "Mirror");

        let resource =
            ItemResource::attach_to(ItemType::Movie, 42, None, Some(item), mock.clone(), mailbox())
                .unwrap();

        assert!(resource.has());
        assert_eq!(resource.simple_item().map(|s| s.id), Some(42));
        tokio::task::yield_now().await;
        assert_eq!(mock.call_count(ResourceSlot::Item), 0);
    }

    #[tokio::test]
    async fn test_simple_item_still_fetches() {
        let mock = Arc::new(MockApi::new());
        let simple = SimpleItem::new(5, ItemType::Book, "Roadside Picnic");
        let (mailbox, mut events) = Mailbox::channel(8);

        let resource =
            ItemResource::attach_to(ItemType::Book, 5, Some(simple), None, mock.clone(), mailbox).unwrap();

        assert!(!resource.has());
        assert_eq!(resource.simple_item().map(|s| s.title.as_str()), Some("Roadside Picnic"));
        let started = events.recv().await.unwrap();
        assert_eq!(started.event, ResourceEvent::LoadStarted);
        tokio::task::yield_now().await;
        assert_eq!(mock.call_count(ResourceSlot::Item), 1);
    }

    #[test]
    fn test_mismatched_cache_is_a_configuration_error() {
        let mock = Arc::new(MockApi::new());
        let item = Item::new(8, ItemType::Movie, "Other");

        let result = ItemResource::attach_to(ItemType::Movie, 9, None, Some(item), mock, mailbox());
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn test_invalid_id_is_a_configuration_error() {
        let mock = Arc::new(MockApi::new());
        let result = ItemResource::attach_to(ItemType::Movie, -1, None, None, mock, mailbox());
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_change_ignored_after_detach() {
        let mock = Arc::new(MockApi::new());
        let mut resource =
            ItemResource::attach_to(ItemType::Movie, 3, None, None, mock, mailbox()).unwrap();

        resource.detach();
        resource.detach();

        assert!(!resource.apply(Item::new(3, ItemType::Movie, "Late")));
        assert!(!resource.has());
    }
}
