//! # Resource Events
//!
//! Sub-resources never call into the coordinator directly. Their fetch tasks
//! post [`Envelope`]s into the coordinator's [`Mailbox`], and the coordinator
//! applies them one at a time on its own task.

use crate::framework::ApiError;
use crate::model::{Item, Photo, Rating, Review};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tracing::trace;

/// Caller-supplied correlation token, echoed on every listener callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RequestCode(pub u32);

impl fmt::Display for RequestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies which sub-resource of a coordinator an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceSlot {
    Item,
    Rating,
    PhotoList,
    ReviewList,
}

impl ResourceSlot {
    pub const ALL: [ResourceSlot; 4] = [
        ResourceSlot::Item,
        ResourceSlot::Rating,
        ResourceSlot::PhotoList,
        ResourceSlot::ReviewList,
    ];

    /// Request code the coordinator uses when attaching this slot.
    pub fn request_code(&self) -> RequestCode {
        match self {
            ResourceSlot::Item => RequestCode(1),
            ResourceSlot::Rating => RequestCode(2),
            ResourceSlot::PhotoList => RequestCode(3),
            ResourceSlot::ReviewList => RequestCode(4),
        }
    }
}

impl fmt::Display for ResourceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceSlot::Item => "item",
            ResourceSlot::Rating => "rating",
            ResourceSlot::PhotoList => "photo_list",
            ResourceSlot::ReviewList => "review_list",
        })
    }
}

/// A mutation of a list resource. Each kind of change is its own variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ListDelta<T> {
    /// The whole list was replaced (first page loaded).
    Changed(Vec<T>),
    /// A further page was appended.
    Appended(Vec<T>),
    /// The entry at `position` was replaced.
    Updated { position: usize, value: T },
    /// The entry at `position` was removed.
    Removed { position: usize },
}

/// Lifecycle and data events emitted by sub-resources.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    LoadStarted,
    LoadFinished,
    LoadError(ApiError),
    ItemChanged(Item),
    RatingChanged(Rating),
    PhotoList(ListDelta<Photo>),
    ReviewList(ListDelta<Review>),
}

/// A [`ResourceEvent`] tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub slot: ResourceSlot,
    pub request_code: RequestCode,
    pub event: ResourceEvent,
}

impl Envelope {
    pub fn new(slot: ResourceSlot, event: ResourceEvent) -> Self {
        Self {
            slot,
            request_code: slot.request_code(),
            event,
        }
    }
}

/// Sending half of a coordinator's event queue, shared by its sub-resources.
#[derive(Debug, Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Envelope>,
}

impl Mailbox {
    /// Creates a mailbox and the receiver the coordinator drains.
    pub fn channel(buffer_size: usize) -> (Self, mpsc::Receiver<Envelope>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { sender }, receiver)
    }

    /// Posts an event. Returns `false` once the coordinator is gone.
    pub async fn post(&self, slot: ResourceSlot, request_code: RequestCode, event: ResourceEvent) -> bool {
        let envelope = Envelope {
            slot,
            request_code,
            event,
        };
        match self.sender.send(envelope).await {
            Ok(()) => true,
            Err(_) => {
                trace!(%slot, %request_code, "Mailbox closed, event dropped");
                false
            }
        }
    }
}
