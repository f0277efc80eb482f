use crate::coordinator::{
    CoordinatorActor, CoordinatorClient, CoordinatorConfig, EntityKind, ItemArguments,
    ItemListener, ListenerSlot,
};
use crate::framework::{CoordinatorError, ItemApi, RequestCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Identifies one viewing session, e.g. one entry in a navigation back stack.
pub type SessionKey = String;

struct Session {
    client: CoordinatorClient,
    listener: ListenerSlot,
    handle: JoinHandle<ItemArguments>,
}

/// Keeps coordinators alive while their controllers are rebuilt.
///
/// A controller asks the holder for its session's coordinator with
/// [`get`](Self::get) and then [`register`](Self::register)s itself as the
/// listener. When the controller is torn down for reconstruction it calls
/// [`unregister`](Self::unregister); the coordinator keeps running and its
/// in-flight requests are not re-issued. [`finish`](Self::finish) ends the
/// session for good and keeps the coordinator's saved state as a bundle, which
/// the next [`get`](Self::get) for the same key restores from.
///
/// # Example
///
/// ```ignore
/// let mut holder = RetainedHolder::new(api, CoordinatorConfig::default());
/// let client = holder.get("detail-7", EntityKind::new(ItemType::Movie), ItemArguments::new(7))?;
/// holder.register("detail-7", &controller, RequestCode(1))?;
///
/// // Controller rebuilt
/// holder.unregister("detail-7");
/// holder.register("detail-7", &new_controller, RequestCode(1))?;
///
/// // Controller closed for good
/// holder.finish("detail-7").await?;
/// let bundle = holder.bundle("detail-7");
/// ```
pub struct RetainedHolder {
    api: Arc<dyn ItemApi>,
    config: CoordinatorConfig,
    sessions: HashMap<SessionKey, Session>,
    bundles: HashMap<SessionKey, String>,
}

impl RetainedHolder {
    pub fn new(api: Arc<dyn ItemApi>, config: CoordinatorConfig) -> Self {
        Self {
            api,
            config,
            sessions: HashMap::new(),
            bundles: HashMap::new(),
        }
    }

    /// Returns the running coordinator for `key`, starting one if needed.
    ///
    /// A new coordinator is built from the key's saved bundle when there is
    /// one, and from `args` otherwise. The bundle is consumed only once the
    /// coordinator attached successfully.
    pub fn get(
        &mut self,
        key: &str,
        kind: EntityKind,
        args: ItemArguments,
    ) -> Result<CoordinatorClient, CoordinatorError> {
        if let Some(session) = self.sessions.get(key) {
            if !session.client.is_closed() {
                debug!(key, item_id = session.client.item_id(), "Session reused");
                return Ok(session.client.clone());
            }
            warn!(key, "Session coordinator stopped, starting a new one");
            self.sessions.remove(key);
        }

        let restored = self.bundles.contains_key(key);
        let args = match self.bundles.get(key) {
            Some(bundle) => ItemArguments::from_bundle(bundle)?,
            None => args,
        };
        let listener = ListenerSlot::new();
        let (actor, client) =
            CoordinatorActor::new(kind, args, self.api.clone(), listener.clone(), &self.config)?;
        self.bundles.remove(key);

        let handle = tokio::spawn(actor.run());
        info!(key, item_id = client.item_id(), restored, "Session started");
        self.sessions.insert(
            key.to_string(),
            Session {
                client: client.clone(),
                listener,
                handle,
            },
        );
        Ok(client)
    }

    /// Points the session's callbacks at `listener`.
    ///
    /// Only a weak reference is kept: dropping the listener unregisters it.
    pub fn register<L: ItemListener + 'static>(
        &self,
        key: &str,
        listener: &Arc<L>,
        request_code: RequestCode,
    ) -> Result<(), CoordinatorError> {
        let session = self
            .sessions
            .get(key)
            .ok_or_else(|| CoordinatorError::SessionNotFound(key.to_string()))?;
        session.listener.bind(listener, request_code);
        debug!(key, %request_code, "Listener registered");
        Ok(())
    }

    /// Stops callbacks until the next [`register`](Self::register).
    pub fn unregister(&self, key: &str) -> bool {
        match self.sessions.get(key) {
            Some(session) => {
                session.listener.unbind();
                debug!(key, "Listener unregistered");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn client(&self, key: &str) -> Option<CoordinatorClient> {
        self.sessions.get(key).map(|session| session.client.clone())
    }

    /// Tears the session's coordinator down and keeps its state as a bundle.
    ///
    /// `Ok(None)` if there is no running session for `key`.
    pub async fn finish(&mut self, key: &str) -> Result<Option<ItemArguments>, CoordinatorError> {
        let Some(session) = self.sessions.remove(key) else {
            debug!(key, "No session to finish");
            return Ok(None);
        };
        session.listener.unbind();
        if let Err(error) = session.client.teardown().await {
            debug!(key, %error, "Coordinator already stopped");
        }
        drop(session.client);

        let saved = session
            .handle
            .await
            .map_err(|error| CoordinatorError::TaskFailed(error.to_string()))?;
        self.bundles.insert(key.to_string(), saved.to_bundle()?);
        info!(key, item_id = saved.item_id, "Session finished");
        Ok(Some(saved))
    }

    /// The saved bundle for `key`, for the host to write to durable storage.
    pub fn bundle(&self, key: &str) -> Option<&str> {
        self.bundles.get(key).map(String::as_str)
    }

    /// Loads a bundle the host read back from durable storage.
    pub fn restore_bundle(&mut self, key: &str, bundle: String) -> Result<(), CoordinatorError> {
        ItemArguments::from_bundle(&bundle)?;
        self.bundles.insert(key.to_string(), bundle);
        Ok(())
    }

    /// Finishes every session. Bundles are kept.
    pub async fn shutdown(&mut self) -> Result<(), CoordinatorError> {
        info!(sessions = self.sessions.len(), "Shutting down holder...");
        let keys: Vec<SessionKey> = self.sessions.keys().cloned().collect();
        for key in keys {
            self.finish(&key).await?;
        }
        info!("Holder shut down");
        Ok(())
    }
}
