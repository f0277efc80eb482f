use item_resource::coordinator::{
    AggregateSnapshot, CoordinatorConfig, EntityKind, ItemArguments, ItemListener,
};
use item_resource::framework::mock::MockApi;
use item_resource::framework::{ApiError, RequestCode};
use item_resource::lifecycle::{setup_tracing, RetainedHolder};
use item_resource::model::{Item, ItemType, Photo, Rating, Review};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const SESSION: &str = "detail-7";

/// Stand-in for the screen controller.
struct Screen {
    name: &'static str,
}

impl ItemListener for Screen {
    fn on_load_error(&self, request_code: RequestCode, error: &ApiError) {
        warn!(screen = self.name, %request_code, %error, retryable = error.is_retryable(), "Load error");
    }

    fn on_item_changed(&self, request_code: RequestCode, item: &Item) {
        info!(screen = self.name, %request_code, title = %item.title, "Item changed");
    }

    fn on_aggregate_changed(&self, request_code: RequestCode, snapshot: &AggregateSnapshot) {
        info!(
            screen = self.name,
            %request_code,
            rating = ?snapshot.rating.rating,
            votes = snapshot.rating.count,
            photos = snapshot.photos.as_ref().map_or(0, Vec::len),
            reviews = snapshot.reviews.as_ref().map_or(0, Vec::len),
            "Aggregate changed"
        );
    }
}

fn scripted_api() -> Arc<MockApi> {
    let api = MockApi::new();
    api.expect_item(7).return_ok(
        Item::new(7, ItemType::Movie, "Stalker")
            .with_rating(4.5)
            .with_intro("A guide leads two men through the Zone."),
    );
    api.expect_rating(7)
        .return_ok(Rating::new(120).with_distribution(vec![2, 3, 10, 45, 60]));
    api.expect_photos(7)
        .return_ok(vec![Photo::new(1, "https://img.example/stalker/1.jpg")]);
    api.expect_reviews(7).return_ok(vec![
        Review::new(10, "Slow and strange", "zone"),
        Review::new(11, "A masterpiece", "writer"),
    ]);
    Arc::new(api)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    info!("Starting item detail demo");

    let mut holder = RetainedHolder::new(scripted_api(), CoordinatorConfig::default());
    let client = holder.get(
        SESSION,
        EntityKind::new(ItemType::Movie),
        ItemArguments::new(7),
    )?;

    let first = Arc::new(Screen { name: "first" });
    holder.register(SESSION, &first, RequestCode(1))?;

    // Controller rebuilt while the requests are in flight
    holder.unregister(SESSION);
    drop(first);
    let second = Arc::new(Screen { name: "second" });
    holder.register(SESSION, &second, RequestCode(1))?;

    while !client.is_loaded().await? {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let status = client.status().await?;
    info!(phase = ?status.phase, has_error = status.has_error, "Loaded");

    client.remove_review(10).await?;

    if let Some(saved) = holder.finish(SESSION).await? {
        info!(item_id = saved.item_id, bundle = ?holder.bundle(SESSION), "Session saved");
    }
    holder.shutdown().await?;
    Ok(())
}
