mod common;

use common::{assert_quiet, next, next_aggregate, script_movie, Callback, ChannelListener};
use item_resource::coordinator::{
    CoordinatorActor, CoordinatorConfig, EntityKind, ItemArguments, ListenerSlot, Phase,
};
use item_resource::framework::mock::MockApi;
use item_resource::framework::{ApiError, CoordinatorError, RequestCode, ResourceSlot};
use item_resource::model::{Item, ItemType, Review};
use std::sync::Arc;

/// Item, rating, photos and reviews load concurrently and merge into one snapshot.
#[tokio::test]
async fn test_full_coordinator_flow() {
    let mock = Arc::new(MockApi::new());
    script_movie(&mock, 7);
    let (listener, mut callbacks) = ChannelListener::new();
    let slot = ListenerSlot::new();
    slot.bind(&listener, RequestCode(9));

    let (actor, client) = CoordinatorActor::new(
        EntityKind::new(ItemType::Movie),
        ItemArguments::new(7),
        mock.clone(),
        slot,
        &CoordinatorConfig::default(),
    )
    .expect("Failed to attach coordinator");
    let handle = tokio::spawn(actor.run());
    assert_eq!(client.item_id(), 7);

    let mut saw_item = false;
    let snapshot = loop {
        match next(&mut callbacks).await {
            Callback::Item(code, item) => {
                assert_eq!(code, RequestCode(9));
                assert_eq!(item.id, 7);
                saw_item = true;
            }
            Callback::Aggregate(code, snapshot) => {
                assert_eq!(code, RequestCode(9));
                break snapshot;
            }
            Callback::Error(_, error) => panic!("Unexpected error: {error}"),
        }
    };
    assert!(saw_item, "on_item_changed precedes the first aggregate");
    assert_eq!(snapshot.rating.rating, Some(4.5));
    assert_eq!(snapshot.rating.count, 120);
    assert_eq!(snapshot.photos.as_ref().map(Vec::len), Some(1));
    assert_eq!(snapshot.reviews.as_ref().map(Vec::len), Some(2));
    assert_quiet(&mut callbacks).await;

    let status = client.status().await.expect("Failed to get status");
    assert_eq!(status.phase, Phase::Loaded);
    assert!(!status.loading);
    assert!(client.is_loaded().await.expect("Failed to query"));
    assert_eq!(client.snapshot().await.expect("Failed to query"), Some(snapshot));
    mock.verify();

    let saved = client.teardown().await.expect("Failed to tear down");
    assert_eq!(saved.item.map(|item| item.id), Some(7));
    handle.await.expect("Coordinator task panicked");

    assert!(client.is_closed());
    assert!(matches!(
        client.status().await,
        Err(CoordinatorError::CoordinatorClosed)
    ));
}

#[tokio::test]
async fn test_pagination_and_mutations_refire_aggregate() {
    let mock = Arc::new(MockApi::new());
    mock.expect_item(7).return_ok(common::movie(7));
    mock.expect_rating(7)
        .return_ok(item_resource::model::Rating::new(3));
    mock.expect_reviews(7).return_ok(common::reviews(1..3));
    mock.expect_reviews(7).return_ok(common::reviews(3..4));
    let (listener, mut callbacks) = ChannelListener::new();
    let slot = ListenerSlot::new();
    slot.bind(&listener, RequestCode(1));

    let (actor, client) = CoordinatorActor::new(
        EntityKind::new(ItemType::Book),
        ItemArguments::new(7),
        mock.clone(),
        slot,
        &CoordinatorConfig::default().with_page_size(2),
    )
    .expect("Failed to attach coordinator");
    tokio::spawn(actor.run());

    let first = next_aggregate(&mut callbacks).await;
    assert_eq!(first.photos, None);
    assert_eq!(first.reviews.as_ref().map(Vec::len), Some(2));

    assert!(client.load_more(ResourceSlot::ReviewList).await.unwrap());
    let second = next_aggregate(&mut callbacks).await;
    assert_eq!(second.reviews.as_ref().map(Vec::len), Some(3));
    assert!(
        !client.load_more(ResourceSlot::ReviewList).await.unwrap(),
        "short page ends pagination"
    );
    assert!(!client.load_more(ResourceSlot::PhotoList).await.unwrap());

    let starts: Vec<usize> = mock
        .calls()
        .into_iter()
        .filter(|call| call.slot == ResourceSlot::ReviewList)
        .map(|call| call.start)
        .collect();
    assert_eq!(starts, vec![0, 2]);

    let edited = Review::new(2, "Changed my mind", "reader");
    assert!(client.update_review(edited.clone()).await.unwrap());
    let third = next_aggregate(&mut callbacks).await;
    assert_eq!(third.reviews.as_ref().map(|r| r[1].clone()), Some(edited));

    assert!(client.remove_review(1).await.unwrap());
    let fourth = next_aggregate(&mut callbacks).await;
    let ids: Vec<i64> = fourth.reviews.iter().flatten().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 3]);

    assert!(!client.remove_review(1).await.unwrap());
    assert_quiet(&mut callbacks).await;
}

#[tokio::test]
async fn test_only_first_error_reaches_listener() {
    let mock = Arc::new(MockApi::new());
    mock.expect_item(7)
        .return_err(ApiError::NotFound("item 7".into()));
    mock.expect_rating(7)
        .return_err(ApiError::TransientNetwork("timeout".into()));
    let (listener, mut callbacks) = ChannelListener::new();
    let slot = ListenerSlot::new();
    slot.bind(&listener, RequestCode(3));

    let (actor, client) = CoordinatorActor::new(
        EntityKind::new(ItemType::Music),
        ItemArguments::new(7),
        mock,
        slot,
        &CoordinatorConfig::default(),
    )
    .expect("Failed to attach coordinator");
    tokio::spawn(actor.run());

    let Callback::Error(code, _) = next(&mut callbacks).await else {
        panic!("Expected an error callback");
    };
    assert_eq!(code, RequestCode(3));
    assert_quiet(&mut callbacks).await;

    let status = client.status().await.unwrap();
    assert!(status.has_error);
    assert!(!status.has_item);
}

#[tokio::test]
async fn test_item_for_another_id_is_rejected() {
    let mock = Arc::new(MockApi::new());
    mock.expect_item(7).return_ok(common::movie(8));
    let (listener, mut callbacks) = ChannelListener::new();
    let slot = ListenerSlot::new();
    slot.bind(&listener, RequestCode(1));

    let (actor, client) = CoordinatorActor::new(
        EntityKind::new(ItemType::Movie),
        ItemArguments::new(7),
        mock,
        slot,
        &CoordinatorConfig::default(),
    )
    .unwrap();
    tokio::spawn(actor.run());

    match next(&mut callbacks).await {
        Callback::Error(_, ApiError::ApiProtocol(_)) => {}
        other => panic!("Expected a protocol error, got {other:?}"),
    }
    assert!(!client.has_item().await.unwrap());
}

#[tokio::test]
async fn test_dropping_every_client_detaches() {
    let mock = Arc::new(MockApi::new());
    let item = Item::new(5, ItemType::Tv, "Twin Peaks");

    let (actor, client) = CoordinatorActor::new(
        EntityKind::new(ItemType::Tv),
        ItemArguments::from_item(item.clone()),
        mock,
        ListenerSlot::new(),
        &CoordinatorConfig::default(),
    )
    .unwrap();
    let handle = tokio::spawn(actor.run());

    assert!(client.has_item().await.unwrap());
    drop(client);

    let saved = handle.await.expect("Coordinator task panicked");
    assert_eq!(saved, ItemArguments::from_item(item));
}

#[tokio::test]
async fn test_invalid_arguments_fail_construction() {
    let mock = Arc::new(MockApi::new());

    let result = CoordinatorActor::new(
        EntityKind::new(ItemType::Movie),
        ItemArguments::new(0),
        mock,
        ListenerSlot::new(),
        &CoordinatorConfig::default(),
    );

    assert!(matches!(
        result,
        Err(CoordinatorError::Attach(ApiError::Configuration(_)))
    ));
}

#[tokio::test]
async fn test_teardown_stops_actor_while_clients_remain() {
    let mock = Arc::new(MockApi::new());
    let (actor, client) = CoordinatorActor::new(
        EntityKind::new(ItemType::Book),
        ItemArguments::new(4),
        mock,
        ListenerSlot::new(),
        &CoordinatorConfig::default(),
    )
    .unwrap();
    let handle = tokio::spawn(actor.run());
    let other = client.clone();

    let saved = client.teardown().await.expect("Failed to tear down");
    assert_eq!(saved, ItemArguments::new(4));

    let stopped = tokio::time::timeout(std::time::Duration::from_secs(2), handle)
        .await
        .expect("Actor kept running after teardown")
        .expect("Coordinator task panicked");
    assert_eq!(stopped, saved);
    assert!(other.is_closed());
    assert!(matches!(
        other.status().await,
        Err(CoordinatorError::CoordinatorClosed)
    ));
}
