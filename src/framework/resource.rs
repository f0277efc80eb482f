//! # SubResource Contract
//!
//! Every piece of data on the detail screen is loaded by its own sub-resource.
//! They all share the same lifecycle:
//!
//! 1. **Attach**: a constructor named `attach_to` validates its parameters
//!    (failing with [`ApiError::Configuration`]) and usually starts a load.
//! 2. **Load**: the fetch runs on its own Tokio task and posts
//!    `LoadStarted`, `LoadFinished` and then the payload or a `LoadError`
//!    into the coordinator's [`Mailbox`].
//! 3. **Apply**: the coordinator hands each payload back to the resource on the
//!    coordinator task. State is owned by the resource and only mutated there.
//! 4. **Detach**: aborts the in-flight fetch. Anything still queued is ignored.
//!
//! [`Attachment`] is the scaffolding the four variants share; [`SubResource`]
//! is the trait the coordinator programs against.

use crate::framework::{ApiError, ItemApi, Mailbox, RequestCode, ResourceEvent, ResourceSlot};
use crate::model::{ItemId, ItemType};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Attachment state shared by every sub-resource variant.
pub struct Attachment {
    slot: ResourceSlot,
    item_type: ItemType,
    item_id: ItemId,
    request_code: RequestCode,
    api: Arc<dyn ItemApi>,
    mailbox: Mailbox,
    in_flight: Option<JoinHandle<()>>,
    attached: bool,
    loading: bool,
    pending: bool,
}

impl Attachment {
    /// Validates the target and creates an attached, idle attachment.
    pub fn new(
        slot: ResourceSlot,
        item_type: ItemType,
        item_id: ItemId,
        api: Arc<dyn ItemApi>,
        mailbox: Mailbox,
    ) -> Result<Self, ApiError> {
        if item_id <= 0 {
            return Err(ApiError::Configuration(format!(
                "{slot} cannot attach to item id {item_id}"
            )));
        }
        debug!(%slot, %item_type, item_id, "Attached");
        Ok(Self {
            slot,
            item_type,
            item_id,
            request_code: slot.request_code(),
            api,
            mailbox,
            in_flight: None,
            attached: true,
            loading: false,
            pending: false,
        })
    }

    pub fn slot(&self) -> ResourceSlot {
        self.slot
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn api(&self) -> Arc<dyn ItemApi> {
        self.api.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a `LoadStarted` has been applied without its `LoadFinished`.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a requested load has not yet been settled.
    ///
    /// Stays set after the fetch task ends, until the resource applies the
    /// payload ([`settle`](Self::settle)) or a `LoadError` is tracked.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Marks the pending load as applied.
    pub fn settle(&mut self) {
        self.pending = false;
    }

    /// Runs `fetch` on its own task and posts its events to the mailbox.
    ///
    /// Returns `false` without spawning when detached or when an earlier load
    /// is still pending.
    pub fn spawn_load<F>(&mut self, fetch: F) -> bool
    where
        F: Future<Output = Result<ResourceEvent, ApiError>> + Send + 'static,
    {
        if !self.attached || self.pending {
            trace!(slot = %self.slot, attached = self.attached, pending = self.pending, "Load skipped");
            return false;
        }

        let mailbox = self.mailbox.clone();
        let slot = self.slot;
        let request_code = self.request_code;
        let item_id = self.item_id;
        debug!(%slot, item_id, "Load requested");

        let handle = tokio::spawn(async move {
            if !mailbox.post(slot, request_code, ResourceEvent::LoadStarted).await {
                return;
            }
            let result = fetch.await;
            if !mailbox.post(slot, request_code, ResourceEvent::LoadFinished).await {
                return;
            }
            let event = match result {
                Ok(event) => event,
                Err(error) => {
                    debug!(%slot, item_id, %error, "Load failed");
                    ResourceEvent::LoadError(error)
                }
            };
            mailbox.post(slot, request_code, event).await;
        });
        self.in_flight = Some(handle);
        self.pending = true;
        true
    }

    /// Records a lifecycle event. Returns `false` if the attachment is detached.
    pub fn track(&mut self, event: &ResourceEvent) -> bool {
        if !self.attached {
            return false;
        }
        match event {
            ResourceEvent::LoadStarted => self.loading = true,
            ResourceEvent::LoadFinished => self.loading = false,
            ResourceEvent::LoadError(_) => {
                self.loading = false;
                self.pending = false;
            }
            _ => {}
        }
        true
    }

    /// Stops tracking and aborts any in-flight fetch. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.loading = false;
        self.pending = false;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        debug!(slot = %self.slot, item_id = self.item_id, "Detached");
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.detach();
    }
}

/// The contract every sub-resource variant implements.
///
/// Only `get`, `apply_change` and the attachment accessors are required; the
/// rest is provided on top of [`Attachment`].
pub trait SubResource {
    /// The value exposed through [`SubResource::get`].
    type Value;
    /// The payload carried by this resource's change events.
    type Change;

    fn attachment(&self) -> &Attachment;

    fn attachment_mut(&mut self) -> &mut Attachment;

    /// Last known value, `None` until the first successful load.
    fn get(&self) -> Option<&Self::Value>;

    /// Mutates the resource state. Called only while attached.
    fn apply_change(&mut self, change: Self::Change);

    /// True once at least one load succeeded. Never reverts while attached.
    fn has(&self) -> bool {
        self.get().is_some()
    }

    fn is_attached(&self) -> bool {
        self.attachment().is_attached()
    }

    fn is_loading(&self) -> bool {
        self.attachment().is_loading()
    }

    /// Applies a change delivered through the mailbox.
    ///
    /// Returns `false`, leaving state untouched, once detached.
    fn apply(&mut self, change: Self::Change) -> bool {
        if !self.is_attached() {
            trace!(slot = %self.attachment().slot(), "Change ignored after detach");
            return false;
        }
        self.apply_change(change);
        true
    }

    /// Releases the resource. Idempotent.
    fn detach(&mut self) {
        self.attachment_mut().detach();
    }
}
