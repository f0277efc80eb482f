use crate::coordinator::{AggregateSnapshot, CoordinatorRequest, CoordinatorStatus, ItemArguments, Response};
use crate::framework::{CoordinatorError, ResourceSlot};
use crate::model::{Item, ItemId, Review, SimpleItem};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Handle to a running [`CoordinatorActor`](crate::coordinator::CoordinatorActor).
///
/// Cheap to clone. The actor tears itself down once every clone is dropped.
#[derive(Debug, Clone)]
pub struct CoordinatorClient {
    item_id: ItemId,
    sender: mpsc::Sender<CoordinatorRequest>,
}

impl CoordinatorClient {
    pub(crate) fn new(item_id: ItemId, sender: mpsc::Sender<CoordinatorRequest>) -> Self {
        Self { item_id, sender }
    }

    /// The id is write-once, so it is answered without a round trip.
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Whether the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> CoordinatorRequest,
    ) -> Result<T, CoordinatorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| CoordinatorError::CoordinatorClosed)?;
        response.await.map_err(|_| CoordinatorError::CoordinatorDropped)
    }

    #[instrument(skip(self), fields(item_id = self.item_id))]
    pub async fn status(&self) -> Result<CoordinatorStatus, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::Status { respond_to })
            .await
    }

    #[instrument(skip(self), fields(item_id = self.item_id))]
    pub async fn item(&self) -> Result<Option<Item>, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::Item { respond_to })
            .await
    }

    #[instrument(skip(self), fields(item_id = self.item_id))]
    pub async fn simple_item(&self) -> Result<Option<SimpleItem>, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::SimpleItem { respond_to })
            .await
    }

    pub async fn has_item(&self) -> Result<bool, CoordinatorError> {
        Ok(self.status().await?.has_item)
    }

    pub async fn is_loaded(&self) -> Result<bool, CoordinatorError> {
        Ok(self.snapshot().await?.is_some())
    }

    /// The merged view, if every required component has loaded.
    #[instrument(skip(self), fields(item_id = self.item_id))]
    pub async fn snapshot(&self) -> Result<Option<AggregateSnapshot>, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::Snapshot { respond_to })
            .await
    }

    /// Requests the next page of the photo or review list.
    ///
    /// `Ok(false)` if the slot is not a required list, a load is already in
    /// flight, or the last page has been reached.
    #[instrument(skip(self), fields(item_id = self.item_id))]
    pub async fn load_more(&self, slot: ResourceSlot) -> Result<bool, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::LoadMore { slot, respond_to })
            .await
    }

    #[instrument(skip(self), fields(item_id = self.item_id))]
    pub async fn reload_item(&self) -> Result<bool, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::ReloadItem { respond_to })
            .await
    }

    /// Replaces a loaded review after it was edited elsewhere.
    #[instrument(skip(self, review), fields(item_id = self.item_id, review_id = review.id))]
    pub async fn update_review(&self, review: Review) -> Result<bool, CoordinatorError> {
        debug!(?review, "Sending request");
        self.request(|respond_to| CoordinatorRequest::UpdateReview { review, respond_to })
            .await
    }

    #[instrument(skip(self), fields(item_id = self.item_id))]
    pub async fn remove_review(&self, review_id: i64) -> Result<bool, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::RemoveReview {
            review_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self), fields(item_id = self.item_id))]
    pub async fn remove_photo(&self, photo_id: i64) -> Result<bool, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::RemovePhoto {
            photo_id,
            respond_to,
        })
        .await
    }

    /// Detaches every sub-resource and stops the actor.
    ///
    /// Returns the state to persist. Fails with
    /// [`CoordinatorError::CoordinatorClosed`] if the actor already stopped.
    #[instrument(skip(self), fields(item_id = self.item_id))]
    pub async fn teardown(&self) -> Result<ItemArguments, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::Teardown { respond_to })
            .await
    }
}
