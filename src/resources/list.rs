//! # Paginated List Resources
//!
//! Photos and reviews behave identically: the first page replaces the list,
//! further pages are appended, and single entries can be replaced or removed
//! when another part of the application edits them. [`ListResource`] holds that
//! behaviour once; [`ListEntry`] supplies the per-type glue.

use crate::framework::{
    ApiError, Attachment, ItemApi, ListDelta, Mailbox, ResourceEvent, ResourceSlot, SubResource,
};
use crate::model::{ItemId, ItemType};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// An entry type that can be loaded by a [`ListResource`].
#[async_trait]
pub trait ListEntry: Clone + Debug + Send + Sync + 'static {
    /// The slot this list occupies in a coordinator.
    const SLOT: ResourceSlot;

    /// Stable identifier used to locate an entry for update or removal.
    fn key(&self) -> i64;

    /// Whether the remote service offers this list for `item_type`.
    fn supported_by(item_type: ItemType) -> bool;

    /// Wraps a delta in the event variant of this list.
    fn into_event(delta: ListDelta<Self>) -> ResourceEvent;

    /// Fetches one page.
    async fn fetch_page(
        api: &dyn ItemApi,
        item_type: ItemType,
        item_id: ItemId,
        start: usize,
        count: usize,
    ) -> Result<Vec<Self>, ApiError>;
}

/// A paginated list sub-resource.
pub struct ListResource<T: ListEntry> {
    attachment: Attachment,
    list: Option<Vec<T>>,
    page_size: usize,
    can_load_more: bool,
}

impl<T: ListEntry> ListResource<T> {
    /// Attaches and requests the first page.
    ///
    /// Fails with [`ApiError::Configuration`] when the item type has no such
    /// list or the page size is zero.
    pub fn attach_to(
        item_type: ItemType,
        item_id: ItemId,
        page_size: usize,
        api: Arc<dyn ItemApi>,
        mailbox: Mailbox,
    ) -> Result<Self, ApiError> {
        if !T::supported_by(item_type) {
            return Err(ApiError::Configuration(format!(
                "{} is not available for {item_type} items",
                T::SLOT
            )));
        }
        if page_size == 0 {
            return Err(ApiError::Configuration(format!("{} needs a page size", T::SLOT)));
        }
        let attachment = Attachment::new(T::SLOT, item_type, item_id, api, mailbox)?;
        let mut resource = Self {
            attachment,
            list: None,
            page_size,
            can_load_more: true,
        };
        resource.load(false);
        Ok(resource)
    }

    /// Requests the first page again (`more == false`) or the next page.
    ///
    /// Returns `false` when nothing was requested: detached, a request is
    /// already running, or the last page has been reached.
    pub fn load(&mut self, more: bool) -> bool {
        if more && !self.can_load_more {
            debug!(slot = %T::SLOT, "No more pages");
            return false;
        }
        let start = if more { self.len() } else { 0 };
        let count = self.page_size;
        let api = self.attachment.api();
        let item_type = self.attachment.item_type();
        let item_id = self.attachment.item_id();
        self.attachment.spawn_load(async move {
            let page = T::fetch_page(api.as_ref(), item_type, item_id, start, count).await?;
            let delta = if more {
                ListDelta::Appended(page)
            } else {
                ListDelta::Changed(page)
            };
            Ok(T::into_event(delta))
        })
    }

    pub fn load_more(&mut self) -> bool {
        self.load(true)
    }

    /// False once a page shorter than the page size has arrived.
    pub fn can_load_more(&self) -> bool {
        self.can_load_more
    }

    /// Number of loaded entries.
    pub fn len(&self) -> usize {
        self.list.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the loaded entry with the same key. Returns whether one matched.
    pub fn update(&mut self, value: T) -> bool {
        match self.position_of(value.key()) {
            Some(position) => self.apply(ListDelta::Updated { position, value }),
            None => false,
        }
    }

    /// Removes the loaded entry with `key`. Returns whether one matched.
    pub fn remove(&mut self, key: i64) -> bool {
        match self.position_of(key) {
            Some(position) => self.apply(ListDelta::Removed { position }),
            None => false,
        }
    }

    fn position_of(&self, key: i64) -> Option<usize> {
        self.list
            .as_ref()?
            .iter()
            .position(|entry| entry.key() == key)
    }

    fn accept_page(&mut self, page_len: usize) {
        self.attachment.settle();
        self.can_load_more = page_len >= self.page_size;
    }
}

impl<T: ListEntry> SubResource for ListResource<T> {
    type Value = Vec<T>;
    type Change = ListDelta<T>;

    fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    fn attachment_mut(&mut self) -> &mut Attachment {
        &mut self.attachment
    }

    fn get(&self) -> Option<&Vec<T>> {
        self.list.as_ref()
    }

    fn apply_change(&mut self, delta: ListDelta<T>) {
        match delta {
            ListDelta::Changed(page) => {
                self.accept_page(page.len());
                self.list = Some(page);
            }
            ListDelta::Appended(page) => {
                self.accept_page(page.len());
                self.list.get_or_insert_with(Vec::new).extend(page);
            }
            ListDelta::Updated { position, value } => {
                if let Some(entry) = self.list.as_mut().and_then(|list| list.get_mut(position)) {
                    *entry = value;
                }
            }
            ListDelta::Removed { position } => {
                if let Some(list) = self.list.as_mut().filter(|list| position < list.len()) {
                    list.remove(position);
                }
            }
        }
    }
}
