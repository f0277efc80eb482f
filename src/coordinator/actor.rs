//! The Tokio task that owns an [`ItemCoordinator`].
//!
//! Events posted by sub-resources and requests sent by clients are served by a
//! single `select!` loop, so the coordinator state is only ever touched from
//! one task and needs no locks.

use crate::coordinator::{
    AggregateSnapshot, CoordinatorClient, CoordinatorConfig, CoordinatorStatus, EntityKind,
    ItemArguments, ItemCoordinator, ListenerSlot,
};
use crate::framework::{CoordinatorError, Envelope, ItemApi, Mailbox, ResourceSlot};
use crate::model::{Item, Review, SimpleItem};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// One-shot reply channel for a [`CoordinatorRequest`].
pub type Response<T> = oneshot::Sender<T>;

/// Requests a [`CoordinatorClient`] sends to its actor.
#[derive(Debug)]
pub enum CoordinatorRequest {
    Status {
        respond_to: Response<CoordinatorStatus>,
    },
    Item {
        respond_to: Response<Option<Item>>,
    },
    SimpleItem {
        respond_to: Response<Option<SimpleItem>>,
    },
    Snapshot {
        respond_to: Response<Option<AggregateSnapshot>>,
    },
    LoadMore {
        slot: ResourceSlot,
        respond_to: Response<bool>,
    },
    ReloadItem {
        respond_to: Response<bool>,
    },
    UpdateReview {
        review: Review,
        respond_to: Response<bool>,
    },
    RemoveReview {
        review_id: i64,
        respond_to: Response<bool>,
    },
    RemovePhoto {
        photo_id: i64,
        respond_to: Response<bool>,
    },
    /// Detaches everything, replies with the state to persist and stops the actor.
    Teardown {
        respond_to: Response<ItemArguments>,
    },
}

pub struct CoordinatorActor {
    coordinator: ItemCoordinator,
    events: mpsc::Receiver<Envelope>,
    receiver: mpsc::Receiver<CoordinatorRequest>,
}

impl CoordinatorActor {
    /// Attaches a coordinator and returns the actor with its client.
    ///
    /// Sub-resources start loading immediately, so this must be called from
    /// within a Tokio runtime.
    pub fn new(
        kind: EntityKind,
        args: ItemArguments,
        api: Arc<dyn ItemApi>,
        listener: ListenerSlot,
        config: &CoordinatorConfig,
    ) -> Result<(Self, CoordinatorClient), CoordinatorError> {
        let (mailbox, events) = Mailbox::channel(config.mailbox_size.max(1));
        let coordinator = ItemCoordinator::attach(kind, args, api, listener, config, mailbox)?;
        let (sender, receiver) = mpsc::channel(config.request_buffer.max(1));
        let client = CoordinatorClient::new(coordinator.item_id(), sender);
        let actor = Self {
            coordinator,
            events,
            receiver,
        };
        Ok((actor, client))
    }

    /// Serves events and requests until torn down or every client is dropped.
    ///
    /// Returns the state to persist.
    pub async fn run(mut self) -> ItemArguments {
        let item_id = self.coordinator.item_id();
        info!(item_id, "Coordinator started");

        loop {
            tokio::select! {
                Some(envelope) = self.events.recv() => self.coordinator.handle(envelope),
                request = self.receiver.recv() => match request {
                    Some(request) => {
                        if self.handle_request(request).is_break() {
                            break;
                        }
                    }
                    None => {
                        debug!(item_id, "All clients dropped");
                        self.coordinator.detach();
                        break;
                    }
                },
            }
        }

        let saved = self.coordinator.saved_state();
        info!(item_id, has_item = saved.item.is_some(), "Coordinator stopped");
        saved
    }

    /// Serves one request. Breaks once the coordinator is torn down.
    fn handle_request(&mut self, request: CoordinatorRequest) -> ControlFlow<()> {
        let coordinator = &mut self.coordinator;
        match request {
            CoordinatorRequest::Status { respond_to } => {
                let _ = respond_to.send(coordinator.status());
            }
            CoordinatorRequest::Item { respond_to } => {
                let _ = respond_to.send(coordinator.item().cloned());
            }
            CoordinatorRequest::SimpleItem { respond_to } => {
                let _ = respond_to.send(coordinator.simple_item().cloned());
            }
            CoordinatorRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(coordinator.snapshot());
            }
            CoordinatorRequest::LoadMore { slot, respond_to } => {
                let _ = respond_to.send(coordinator.load_more(slot));
            }
            CoordinatorRequest::ReloadItem { respond_to } => {
                let _ = respond_to.send(coordinator.reload_item());
            }
            CoordinatorRequest::UpdateReview { review, respond_to } => {
                let _ = respond_to.send(coordinator.update_review(review));
            }
            CoordinatorRequest::RemoveReview {
                review_id,
                respond_to,
            } => {
                let _ = respond_to.send(coordinator.remove_review(review_id));
            }
            CoordinatorRequest::RemovePhoto {
                photo_id,
                respond_to,
            } => {
                let _ = respond_to.send(coordinator.remove_photo(photo_id));
            }
            CoordinatorRequest::Teardown { respond_to } => {
                debug!(item_id = coordinator.item_id(), "Teardown");
                let _ = respond_to.send(coordinator.detach());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}
