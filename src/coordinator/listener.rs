//! # Listener Contract
//!
//! The controller that displays the item is short-lived: it is torn down and
//! rebuilt while the coordinator keeps running. The coordinator therefore never
//! holds the controller itself. It holds a [`ListenerSlot`], a shared,
//! re-bindable reference that the retained holder points at whichever
//! controller is current. The slot keeps only a `Weak` reference, so a dropped
//! controller silently stops receiving callbacks.

use crate::framework::{ApiError, RequestCode};
use crate::model::{Item, Photo, Rating, Review};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// The fully loaded view of an item.
///
/// Only built once every required component has data. Collections the entity
/// kind does not require are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSnapshot {
    pub item: Item,
    /// Rating statistics with the item's score promoted into `rating.rating`.
    pub rating: Rating,
    pub photos: Option<Vec<Photo>>,
    pub reviews: Option<Vec<Review>>,
}

/// Callbacks delivered to the controller.
///
/// Called on the coordinator task; implementations should hand work off
/// rather than block.
pub trait ItemListener: Send + Sync {
    /// At most once per coordinator lifetime.
    fn on_load_error(&self, request_code: RequestCode, error: &ApiError);

    /// Every time a new item arrives.
    fn on_item_changed(&self, request_code: RequestCode, item: &Item);

    /// Every qualifying change once all required components have loaded.
    fn on_aggregate_changed(&self, request_code: RequestCode, snapshot: &AggregateSnapshot);
}

struct Binding {
    request_code: RequestCode,
    listener: Weak<dyn ItemListener>,
}

/// A re-bindable, revocable reference to the current listener.
#[derive(Clone, Default)]
pub struct ListenerSlot {
    binding: Arc<RwLock<Option<Binding>>>,
}

impl ListenerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the slot at `listener`, replacing any previous binding.
    pub fn bind<L: ItemListener + 'static>(&self, listener: &Arc<L>, request_code: RequestCode) {
        let listener = Arc::downgrade(listener);
        let listener: Weak<dyn ItemListener> = listener;
        *self.binding.write() = Some(Binding {
            request_code,
            listener,
        });
    }

    pub fn unbind(&self) {
        self.binding.write().take();
    }

    /// Whether a live listener is bound.
    pub fn is_bound(&self) -> bool {
        self.binding
            .read()
            .as_ref()
            .is_some_and(|binding| binding.listener.strong_count() > 0)
    }

    pub fn request_code(&self) -> Option<RequestCode> {
        self.binding.read().as_ref().map(|binding| binding.request_code)
    }

    /// Invokes `f` with the current listener and its request code.
    ///
    /// The lock is released before `f` runs. Returns `false` when nothing
    /// live is bound.
    pub fn notify(&self, f: impl FnOnce(&dyn ItemListener, RequestCode)) -> bool {
        let target = self.binding.read().as_ref().and_then(|binding| {
            binding
                .listener
                .upgrade()
                .map(|listener| (listener, binding.request_code))
        });
        match target {
            Some((listener, request_code)) => {
                f(listener.as_ref(), request_code);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Counter {
        items: Mutex<Vec<(RequestCode, i64)>>,
    }

    impl ItemListener for Counter {
        fn on_load_error(&self, _request_code: RequestCode, _error: &ApiError) {}

        fn on_item_changed(&self, request_code: RequestCode, item: &Item) {
            self.items.lock().push((request_code, item.id));
        }

        fn on_aggregate_changed(&self, _request_code: RequestCode, _snapshot: &AggregateSnapshot) {}
    }

    fn ping(slot: &ListenerSlot) -> bool {
        let item = Item::new(1, crate::model::ItemType::Movie, "Ping");
        slot.notify(|listener, code| listener.on_item_changed(code, &item))
    }

    #[test]
    fn test_rebind_redirects_callbacks() {
        let slot = ListenerSlot::new();
        let first = Arc::new(Counter::default());
        let second = Arc::new(Counter::default());

        slot.bind(&first, RequestCode(1));
        assert!(ping(&slot));
        slot.bind(&second, RequestCode(2));
        assert!(ping(&slot));

        assert_eq!(*first.items.lock(), vec![(RequestCode(1), 1)]);
        assert_eq!(*second.items.lock(), vec![(RequestCode(2), 1)]);
    }

    #[test]
    fn test_dropped_listener_is_not_called() {
        let slot = ListenerSlot::new();
        let listener = Arc::new(Counter::default());
        slot.bind(&listener, RequestCode(1));
        drop(listener);

        assert!(!slot.is_bound());
        assert!(!ping(&slot));
    }

    #[test]
    fn test_unbind() {
        let slot = ListenerSlot::new();
        let listener = Arc::new(Counter::default());
        slot.bind(&listener, RequestCode(5));
        assert_eq!(slot.request_code(), Some(RequestCode(5)));

        slot.unbind();
        assert!(!ping(&slot));
        assert!(listener.items.lock().is_empty());
    }
}
