//! # Mock API & Testing Guide
//!
//! [`MockApi`] implements [`ItemApi`] entirely in memory. Replies are scripted
//! per endpoint and item id, and every request is recorded, so tests can assert
//! both what the coordinator received and what it asked for.
//!
//! ## Unscripted Requests Stay Pending
//!
//! A request with no scripted reply never completes. This is what makes the
//! coordinator testable without timing games: attach with an empty mock, then
//! feed [`Envelope`](crate::framework::Envelope)s by hand in whatever order the
//! test needs.
//!
//! ## Example
//!
//! ```rust
//! use item_resource::framework::{ApiError, ItemApi, ResourceSlot, mock::MockApi};
//! use item_resource::model::{Item, ItemType, Rating};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockApi::new();
//!     mock.expect_item(7).return_ok(Item::new(7, ItemType::Movie, "Stalker"));
//!     mock.expect_rating(7).return_err(ApiError::NotFound("rating".into()));
//!
//!     let item = mock.fetch_item(ItemType::Movie, 7).await.unwrap();
//!     assert_eq!(item.title, "Stalker");
//!     assert!(mock.fetch_rating(ItemType::Movie, 7).await.is_err());
//!
//!     assert_eq!(mock.call_count(ResourceSlot::Item), 1);
//!     mock.verify(); // Every scripted reply was consumed
//! }
//! ```

use crate::framework::{ApiError, ItemApi, ResourceSlot};
use crate::model::{Item, ItemId, ItemType, Photo, Rating, Review};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::marker::PhantomData;
use tracing::debug;

/// A scripted reply, stored until the matching request arrives.
#[doc(hidden)]
#[derive(Debug)]
pub enum Reply {
    Item(Result<Item, ApiError>),
    Rating(Result<Rating, ApiError>),
    Photos(Result<Vec<Photo>, ApiError>),
    Reviews(Result<Vec<Review>, ApiError>),
}

/// Payload types a [`MockApi`] can be scripted with.
pub trait Scripted: Sized + Send + 'static {
    /// The endpoint that returns this payload.
    const SLOT: ResourceSlot;

    #[doc(hidden)]
    fn wrap(result: Result<Self, ApiError>) -> Reply;

    #[doc(hidden)]
    fn unwrap(reply: Reply) -> Option<Result<Self, ApiError>>;
}

impl Scripted for Item {
    const SLOT: ResourceSlot = ResourceSlot::Item;

    fn wrap(result: Result<Self, ApiError>) -> Reply {
        Reply::Item(result)
    }

    fn unwrap(reply: Reply) -> Option<Result<Self, ApiError>> {
        match reply {
            Reply::Item(result) => Some(result),
            _ => None,
        }
    }
}

impl Scripted for Rating {
    const SLOT: ResourceSlot = ResourceSlot::Rating;

    fn wrap(result: Result<Self, ApiError>) -> Reply {
        Reply::Rating(result)
    }

    fn unwrap(reply: Reply) -> Option<Result<Self, ApiError>> {
        match reply {
            Reply::Rating(result) => Some(result),
            _ => None,
        }
    }
}

impl Scripted for Vec<Photo> {
    const SLOT: ResourceSlot = ResourceSlot::PhotoList;

    fn wrap(result: Result<Self, ApiError>) -> Reply {
        Reply::Photos(result)
    }

    fn unwrap(reply: Reply) -> Option<Result<Self, ApiError>> {
        match reply {
            Reply::Photos(result) => Some(result),
            _ => None,
        }
    }
}

impl Scripted for Vec<Review> {
    const SLOT: ResourceSlot = ResourceSlot::ReviewList;

    fn wrap(result: Result<Self, ApiError>) -> Reply {
        Reply::Reviews(result)
    }

    fn unwrap(reply: Reply) -> Option<Result<Self, ApiError>> {
        match reply {
            Reply::Reviews(result) => Some(result),
            _ => None,
        }
    }
}

/// A request received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub slot: ResourceSlot,
    pub item_type: ItemType,
    pub item_id: ItemId,
    /// Page offset for list endpoints, `0` otherwise.
    pub start: usize,
}

/// An in-memory [`ItemApi`] with expectation tracking.
///
/// # Example
/// ```ignore
/// let mock = Arc::new(MockApi::new());
/// mock.expect_item(7).return_ok(item);
/// mock.expect_reviews(7).return_ok(vec![]);
///
/// let api: Arc<dyn ItemApi> = mock.clone();
/// // Attach resources with `api`...
/// mock.verify(); // Ensures all scripted replies were consumed
/// ```
#[derive(Default)]
pub struct MockApi {
    replies: Mutex<HashMap<(ResourceSlot, ItemId), VecDeque<Reply>>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockApi {
    /// Creates a mock with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next `fetch_item` for `item_id`.
    pub fn expect_item(&self, item_id: ItemId) -> ExpectationBuilder<'_, Item> {
        ExpectationBuilder::new(self, item_id)
    }

    /// Scripts the next `fetch_rating` for `item_id`.
    pub fn expect_rating(&self, item_id: ItemId) -> ExpectationBuilder<'_, Rating> {
        ExpectationBuilder::new(self, item_id)
    }

    /// Scripts the next `fetch_photos` page for `item_id`.
    pub fn expect_photos(&self, item_id: ItemId) -> ExpectationBuilder<'_, Vec<Photo>> {
        ExpectationBuilder::new(self, item_id)
    }

    /// Scripts the next `fetch_reviews` page for `item_id`.
    pub fn expect_reviews(&self, item_id: ItemId) -> ExpectationBuilder<'_, Vec<Review>> {
        ExpectationBuilder::new(self, item_id)
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    /// Number of requests received for one endpoint.
    pub fn call_count(&self, slot: ResourceSlot) -> usize {
        self.calls.lock().iter().filter(|call| call.slot == slot).count()
    }

    /// Verifies that all scripted replies were consumed.
    pub fn verify(&self) {
        let replies = self.replies.lock();
        let remaining: usize = replies.values().map(VecDeque::len).sum();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn push(&self, slot: ResourceSlot, item_id: ItemId, reply: Reply) {
        self.replies
            .lock()
            .entry((slot, item_id))
            .or_default()
            .push_back(reply);
    }

    async fn reply<T: Scripted>(&self, item_type: ItemType, item_id: ItemId, start: usize) -> Result<T, ApiError> {
        self.calls.lock().push(ApiCall {
            slot: T::SLOT,
            item_type,
            item_id,
            start,
        });

        let reply = self
            .replies
            .lock()
            .get_mut(&(T::SLOT, item_id))
            .and_then(VecDeque::pop_front);

        match reply {
            Some(reply) => T::unwrap(reply).unwrap_or_else(|| {
                Err(ApiError::ApiProtocol(format!("mock reply for {} has the wrong kind", T::SLOT)))
            }),
            None => {
                debug!(slot = %T::SLOT, item_id, "No reply scripted, request stays pending");
                std::future::pending().await
            }
        }
    }
}

#[async_trait]
impl ItemApi for MockApi {
    async fn fetch_item(&self, item_type: ItemType, item_id: ItemId) -> Result<Item, ApiError> {
        self.reply(item_type, item_id, 0).await
    }

    async fn fetch_rating(&self, item_type: ItemType, item_id: ItemId) -> Result<Rating, ApiError> {
        self.reply(item_type, item_id, 0).await
    }

    async fn fetch_photos(
        &self,
        item_type: ItemType,
        item_id: ItemId,
        start: usize,
        _count: usize,
    ) -> Result<Vec<Photo>, ApiError> {
        self.reply(item_type, item_id, start).await
    }

    async fn fetch_reviews(
        &self,
        item_type: ItemType,
        item_id: ItemId,
        start: usize,
        _count: usize,
    ) -> Result<Vec<Review>, ApiError> {
        self.reply(item_type, item_id, start).await
    }
}

/// Builder for a single scripted reply.
pub struct ExpectationBuilder<'a, T: Scripted> {
    mock: &'a MockApi,
    item_id: ItemId,
    _payload: PhantomData<T>,
}

impl<'a, T: Scripted> ExpectationBuilder<'a, T> {
    fn new(mock: &'a MockApi, item_id: ItemId) -> Self {
        Self {
            mock,
            item_id,
            _payload: PhantomData,
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.mock.push(T::SLOT, self.item_id, T::wrap(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        self.mock.push(T::SLOT, self.item_id, T::wrap(Err(error)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_replies_are_consumed_in_order() {
        let mock = MockApi::new();
        mock.expect_reviews(3).return_ok(vec![Review::new(1, "First", "ann")]);
        mock.expect_reviews(3).return_ok(vec![]);

        let first = mock.fetch_reviews(ItemType::Book, 3, 0, 20).await.unwrap();
        assert_eq!(first.len(), 1);
        let second = mock.fetch_reviews(ItemType::Book, 3, 1, 20).await.unwrap();
        assert!(second.is_empty());

        let starts: Vec<usize> = mock.calls().iter().map(|call| call.start).collect();
        assert_eq!(starts, vec![0, 1]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_unscripted_request_stays_pending() {
        let mock = MockApi::new();
        let result = tokio::time::timeout(
            Duration::from_millis(20),
            mock.fetch_rating(ItemType::Movie, 9),
        )
        .await;

        assert!(result.is_err(), "unscripted request should never complete");
        assert_eq!(mock.call_count(ResourceSlot::Rating), 1);
    }

    #[tokio::test]
    async fn test_replies_are_keyed_by_item() {
        let mock = MockApi::new();
        mock.expect_rating(1).return_err(ApiError::NotFound("rating".into()));

        let pending = tokio::time::timeout(
            Duration::from_millis(20),
            mock.fetch_rating(ItemType::Movie, 2),
        )
        .await;
        assert!(pending.is_err());

        let result = mock.fetch_rating(ItemType::Movie, 1).await;
        assert_eq!(result, Err(ApiError::NotFound("rating".into())));
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met")]
    fn test_verify_reports_leftovers() {
        let mock = MockApi::new();
        mock.expect_item(1).return_ok(Item::new(1, ItemType::Game, "Portal"));
        mock.verify();
    }
}
