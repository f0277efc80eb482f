#![allow(dead_code)]

use item_resource::coordinator::{AggregateSnapshot, ItemListener};
use item_resource::framework::mock::MockApi;
use item_resource::framework::{ApiError, RequestCode};
use item_resource::model::{Item, ItemId, ItemType, Photo, Rating, Review};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Callback {
    Error(RequestCode, ApiError),
    Item(RequestCode, Item),
    Aggregate(RequestCode, AggregateSnapshot),
}

/// Forwards every callback into a channel the test can await.
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<Callback>,
}

impl ChannelListener {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Callback>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }
}

impl ItemListener for ChannelListener {
    fn on_load_error(&self, request_code: RequestCode, error: &ApiError) {
        let _ = self.sender.send(Callback::Error(request_code, error.clone()));
    }

    fn on_item_changed(&self, request_code: RequestCode, item: &Item) {
        let _ = self.sender.send(Callback::Item(request_code, item.clone()));
    }

    fn on_aggregate_changed(&self, request_code: RequestCode, snapshot: &AggregateSnapshot) {
        let _ = self
            .sender
            .send(Callback::Aggregate(request_code, snapshot.clone()));
    }
}

pub async fn next(receiver: &mut mpsc::UnboundedReceiver<Callback>) -> Callback {
    tokio::time::timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("Timed out waiting for a callback")
        .expect("Listener channel closed")
}

pub async fn next_aggregate(receiver: &mut mpsc::UnboundedReceiver<Callback>) -> AggregateSnapshot {
    loop {
        if let Callback::Aggregate(_, snapshot) = next(receiver).await {
            return snapshot;
        }
    }
}

/// Asserts nothing else arrives within a short grace period.
pub async fn assert_quiet(receiver: &mut mpsc::UnboundedReceiver<Callback>) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(receiver.try_recv().ok(), None);
}

pub fn movie(id: ItemId) -> Item {
    Item::new(id, ItemType::Movie, "Stalker").with_rating(4.5)
}

pub fn reviews(ids: std::ops::Range<i64>) -> Vec<Review> {
    ids.map(|id| Review::new(id, format!("Review {id}"), "reader"))
        .collect()
}

/// Scripts one successful reply for each of the four endpoints.
pub fn script_movie(mock: &MockApi, id: ItemId) {
    mock.expect_item(id).return_ok(movie(id));
    mock.expect_rating(id).return_ok(Rating::new(120));
    mock.expect_photos(id)
        .return_ok(vec![Photo::new(1, "https://img.example/1.jpg")]);
    mock.expect_reviews(id).return_ok(reviews(1..3));
}
