//! # Item Coordinator
//!
//! [`ItemCoordinator`] is the state machine behind one detail screen. It owns
//! the sub-resources for a single item, applies the events their fetch tasks
//! post, and decides when the listener hears about it.
//!
//! The coordinator is synchronous and single-owner: it never awaits and holds
//! no locks of its own. [`CoordinatorActor`](crate::coordinator::CoordinatorActor)
//! drives it from one Tokio task, and tests drive it by calling
//! [`ItemCoordinator::handle`] with hand-built envelopes.
//!
//! ## Notification rules
//!
//! - A `LoadError` reaches the listener at most once per coordinator.
//! - Every accepted item is forwarded through `on_item_changed`.
//! - Once the item, its rating and every required collection have data, each
//!   further change produces a fresh [`AggregateSnapshot`].

use crate::coordinator::{
    AggregateSnapshot, Capability, CoordinatorConfig, EntityKind, ItemArguments, ListenerSlot,
};
use crate::framework::{
    ApiError, Attachment, CoordinatorError, Envelope, ItemApi, Mailbox, ResourceEvent,
    ResourceSlot, SubResource,
};
use crate::model::{Item, ItemId, Photo, Rating, Review, SimpleItem};
use crate::resources::{ItemResource, PhotoListResource, RatingResource, ReviewListResource};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Lifecycle phase of a coordinator.
///
/// `has_error` is tracked separately and never blocks progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Attaching,
    /// Attached, nothing loaded yet.
    Loading,
    /// Some components have data, the aggregate is not complete.
    PartiallyLoaded,
    Loaded,
    /// Terminal.
    Detached,
}

/// Point-in-time view of a coordinator, returned to clients.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorStatus {
    pub item_id: ItemId,
    pub phase: Phase,
    pub has_item: bool,
    pub has_rating: bool,
    pub has_photos: bool,
    pub has_reviews: bool,
    pub has_error: bool,
    /// Whether any sub-resource is between `LoadStarted` and `LoadFinished`.
    pub loading: bool,
}

pub struct ItemCoordinator {
    item_id: ItemId,
    kind: EntityKind,
    item: ItemResource,
    rating: RatingResource,
    photos: Option<PhotoListResource>,
    reviews: Option<ReviewListResource>,
    has_error: bool,
    listener: ListenerSlot,
    phase: Phase,
}

impl ItemCoordinator {
    /// Resolves `args` and attaches every sub-resource `kind` requires.
    ///
    /// Fails if any sub-resource rejects its parameters; resources attached
    /// before the failure are dropped, which detaches them.
    pub fn attach(
        kind: EntityKind,
        args: ItemArguments,
        api: Arc<dyn ItemApi>,
        listener: ListenerSlot,
        config: &CoordinatorConfig,
        mailbox: Mailbox,
    ) -> Result<Self, CoordinatorError> {
        let args = args.resolve();
        let item_id = args.item_id;
        let item_type = kind.item_type;
        debug!(item_id, %item_type, phase = ?Phase::Initializing, "Coordinator created");
        debug!(item_id, phase = ?Phase::Attaching, capabilities = ?kind.capabilities, "Attaching");

        let item = ItemResource::attach_to(
            item_type,
            item_id,
            args.simple_item,
            args.item,
            api.clone(),
            mailbox.clone(),
        )?;
        let rating = RatingResource::attach_to(item_type, item_id, api.clone(), mailbox.clone())?;

        let photos = if kind.capabilities.requires(Capability::PhotoList) {
            Some(PhotoListResource::attach_to(
                item_type,
                item_id,
                config.page_size,
                api.clone(),
                mailbox.clone(),
            )?)
        } else {
            None
        };
        let reviews = if kind.capabilities.requires(Capability::ReviewList) {
            Some(ReviewListResource::attach_to(
                item_type,
                item_id,
                config.page_size,
                api,
                mailbox,
            )?)
        } else {
            None
        };

        let mut coordinator = Self {
            item_id,
            kind,
            item,
            rating,
            photos,
            reviews,
            has_error: false,
            listener,
            phase: Phase::Attaching,
        };
        coordinator.refresh_phase();
        info!(item_id, %item_type, phase = ?coordinator.phase, "Coordinator attached");
        Ok(coordinator)
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn listener(&self) -> &ListenerSlot {
        &self.listener
    }

    pub fn is_detached(&self) -> bool {
        self.phase == Phase::Detached
    }

    /// Applies one event posted by a sub-resource.
    pub fn handle(&mut self, envelope: Envelope) {
        let Envelope {
            slot,
            request_code,
            event,
        } = envelope;
        if self.is_detached() {
            trace!(item_id = self.item_id, %slot, "Event ignored after detach");
            return;
        }
        let Some(attachment) = self.attachment_mut(slot) else {
            trace!(item_id = self.item_id, %slot, "Event for unattached slot");
            return;
        };
        if !attachment.track(&event) {
            trace!(item_id = self.item_id, %slot, "Event for detached slot");
            return;
        }
        trace!(item_id = self.item_id, %slot, %request_code, "Event");

        match event {
            ResourceEvent::LoadStarted | ResourceEvent::LoadFinished => {}
            ResourceEvent::LoadError(error) => self.notify_error(slot, error),
            ResourceEvent::ItemChanged(item) => self.accept_item(item),
            ResourceEvent::RatingChanged(rating) => {
                if self.rating.apply(rating) {
                    self.notify_changed_if_loaded();
                }
            }
            ResourceEvent::PhotoList(delta) => {
                if self.photos.as_mut().is_some_and(|photos| photos.apply(delta)) {
                    self.notify_changed_if_loaded();
                }
            }
            ResourceEvent::ReviewList(delta) => {
                if self.reviews.as_mut().is_some_and(|reviews| reviews.apply(delta)) {
                    self.notify_changed_if_loaded();
                }
            }
        }
        self.refresh_phase();
    }

    fn attachment_mut(&mut self, slot: ResourceSlot) -> Option<&mut Attachment> {
        match slot {
            ResourceSlot::Item => Some(self.item.attachment_mut()),
            ResourceSlot::Rating => Some(self.rating.attachment_mut()),
            ResourceSlot::PhotoList => self.photos.as_mut().map(|photos| photos.attachment_mut()),
            ResourceSlot::ReviewList => self.reviews.as_mut().map(|reviews| reviews.attachment_mut()),
        }
    }

    fn accept_item(&mut self, item: Item) {
        if item.id != self.item_id {
            let error = ApiError::ApiProtocol(format!(
                "received item {} for item {}",
                item.id, self.item_id
            ));
            self.item.attachment_mut().settle();
            self.notify_error(ResourceSlot::Item, error);
            return;
        }
        if !self.item.apply(item) {
            return;
        }
        if let Some(item) = self.item.get() {
            debug!(item_id = self.item_id, "Item changed");
            self.listener
                .notify(|listener, request_code| listener.on_item_changed(request_code, item));
        }
        self.notify_changed_if_loaded();
    }

    /// Forwards the first error of this coordinator's lifetime.
    fn notify_error(&mut self, slot: ResourceSlot, error: ApiError) {
        if self.has_error {
            debug!(item_id = self.item_id, %slot, %error, "Load error suppressed");
            return;
        }
        self.has_error = true;
        warn!(item_id = self.item_id, %slot, %error, "Load error");
        self.listener
            .notify(|listener, request_code| listener.on_load_error(request_code, &error));
    }

    fn notify_changed_if_loaded(&self) {
        let Some(snapshot) = self.snapshot() else {
            return;
        };
        let delivered = self.listener.notify(|listener, request_code| {
            listener.on_aggregate_changed(request_code, &snapshot)
        });
        debug!(item_id = self.item_id, delivered, "Aggregate changed");
    }

    /// Whether the item, its rating and every required collection have data.
    pub fn is_loaded(&self) -> bool {
        self.item.has()
            && self.rating.has()
            && self.photos.as_ref().map_or(true, |photos| photos.has())
            && self.reviews.as_ref().map_or(true, |reviews| reviews.has())
    }

    /// The merged view, or `None` until [`is_loaded`](Self::is_loaded).
    pub fn snapshot(&self) -> Option<AggregateSnapshot> {
        if !self.is_loaded() {
            return None;
        }
        let item = self.item.get()?.clone();
        let rating = self.rating.get()?.clone().with_score(item.rating);
        Some(AggregateSnapshot {
            photos: self.photos().cloned(),
            reviews: self.reviews().cloned(),
            rating,
            item,
        })
    }

    fn refresh_phase(&mut self) {
        if self.is_detached() {
            return;
        }
        let phase = if self.is_loaded() {
            Phase::Loaded
        } else if self.item.has()
            || self.rating.has()
            || self.photos().is_some()
            || self.reviews().is_some()
        {
            Phase::PartiallyLoaded
        } else {
            Phase::Loading
        };
        if phase != self.phase {
            debug!(item_id = self.item_id, from = ?self.phase, to = ?phase, "Phase changed");
            self.phase = phase;
        }
    }

    pub fn status(&self) -> CoordinatorStatus {
        let loading = self.item.is_loading()
            || self.rating.is_loading()
            || self.photos.as_ref().is_some_and(|photos| photos.is_loading())
            || self.reviews.as_ref().is_some_and(|reviews| reviews.is_loading());
        CoordinatorStatus {
            item_id: self.item_id,
            phase: self.phase,
            has_item: self.item.has(),
            has_rating: self.rating.has(),
            has_photos: self.photos().is_some(),
            has_reviews: self.reviews().is_some(),
            has_error: self.has_error,
            loading,
        }
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.get()
    }

    pub fn simple_item(&self) -> Option<&SimpleItem> {
        self.item.simple_item()
    }

    pub fn rating(&self) -> Option<&Rating> {
        self.rating.get()
    }

    pub fn photos(&self) -> Option<&Vec<Photo>> {
        self.photos.as_ref().and_then(|photos| photos.get())
    }

    pub fn reviews(&self) -> Option<&Vec<Review>> {
        self.reviews.as_ref().and_then(|reviews| reviews.get())
    }

    /// Requests the next page of a list. Returns `false` if nothing was started.
    pub fn load_more(&mut self, slot: ResourceSlot) -> bool {
        let started = match slot {
            ResourceSlot::PhotoList => self.photos.as_mut().is_some_and(|photos| photos.load_more()),
            ResourceSlot::ReviewList => self.reviews.as_mut().is_some_and(|reviews| reviews.load_more()),
            ResourceSlot::Item | ResourceSlot::Rating => false,
        };
        debug!(item_id = self.item_id, %slot, started, "Load more");
        started
    }

    /// Refetches the item.
    pub fn reload_item(&mut self) -> bool {
        self.item.reload()
    }

    /// Replaces a loaded review with an edited copy.
    pub fn update_review(&mut self, review: Review) -> bool {
        let review_id = review.id;
        let updated = self.reviews.as_mut().is_some_and(|reviews| reviews.update(review));
        debug!(item_id = self.item_id, review_id, updated, "Update review");
        self.after_mutation(updated)
    }

    pub fn remove_review(&mut self, review_id: i64) -> bool {
        let removed = self.reviews.as_mut().is_some_and(|reviews| reviews.remove(review_id));
        debug!(item_id = self.item_id, review_id, removed, "Remove review");
        self.after_mutation(removed)
    }

    pub fn remove_photo(&mut self, photo_id: i64) -> bool {
        let removed = self.photos.as_mut().is_some_and(|photos| photos.remove(photo_id));
        debug!(item_id = self.item_id, photo_id, removed, "Remove photo");
        self.after_mutation(removed)
    }

    fn after_mutation(&mut self, changed: bool) -> bool {
        if changed {
            self.notify_changed_if_loaded();
            self.refresh_phase();
        }
        changed
    }

    /// Detaches every sub-resource and returns the state to persist.
    ///
    /// Idempotent: later calls only return the saved state again.
    pub fn detach(&mut self) -> ItemArguments {
        if !self.is_detached() {
            self.item.detach();
            self.rating.detach();
            if let Some(photos) = self.photos.as_mut() {
                photos.detach();
            }
            if let Some(reviews) = self.reviews.as_mut() {
                reviews.detach();
            }
            self.phase = Phase::Detached;
            info!(item_id = self.item_id, has_item = self.item.has(), "Coordinator detached");
        }
        self.saved_state()
    }

    /// The state a later coordinator needs to resume without refetching the item.
    pub fn saved_state(&self) -> ItemArguments {
        ItemArguments {
            item_id: self.item_id,
            simple_item: self.item.simple_item().cloned(),
            item: self.item.get().cloned(),
        }
    }
}
