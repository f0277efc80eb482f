use crate::framework::{ApiError, Attachment, ItemApi, Mailbox, ResourceEvent, ResourceSlot, SubResource};
use crate::model::{ItemId, ItemType, Rating};
use std::sync::Arc;

/// Loads the rating statistics of an item.
pub struct RatingResource {
    attachment: Attachment,
    rating: Option<Rating>,
}

impl RatingResource {
    pub fn attach_to(
        item_type: ItemType,
        item_id: ItemId,
        api: Arc<dyn ItemApi>,
        mailbox: Mailbox,
    ) -> Result<Self, ApiError> {
        let attachment = Attachment::new(ResourceSlot::Rating, item_type, item_id, api, mailbox)?;
        let mut resource = Self {
            attachment,
            rating: None,
        };
        resource.reload();
        Ok(resource)
    }

    pub fn reload(&mut self) -> bool {
        let api = self.attachment.api();
        let item_type = self.attachment.item_type();
        let item_id = self.attachment.item_id();
        self.attachment.spawn_load(async move {
            let rating = api.fetch_rating(item_type, item_id).await?;
            Ok(ResourceEvent::RatingChanged(rating))
        })
    }
}

impl SubResource for RatingResource {
    type Value = Rating;
    type Change = Rating;

    fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    fn attachment_mut(&mut self) -> &mut Attachment {
        &mut self.attachment
    }

    fn get(&self) -> Option<&Rating> {
        self.rating.as_ref()
    }

    fn apply_change(&mut self, rating: Rating) {
        self.attachment.settle();
        self.rating = Some(rating);
    }
}
