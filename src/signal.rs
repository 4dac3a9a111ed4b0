//! Signal / Slot Event Bus
//!
//! A [`Signal`] is a named publish/subscribe channel. Listeners are
//! registered as [`Action`]s and receive every value passed to
//! [`Signal::emit`].
//!
//! # Registration model
//!
//! Every action carries a source text and an origin, and the pair identifies
//! the registration: connecting a second action with the same source and
//! origin overwrites the first and hands back the same [`ListenerId`].
//! Distinct registrations always get distinct handles. The
//! [`fingerprint`](crate::hash::fingerprint) is only reported in logs.
//!
//! Disconnecting clears a slot to an empty marker without removing its key;
//! `emit` skips empty slots, including ones cleared while the emit is running.
//!
//! # Failure policy
//!
//! Listeners are awaited one after another. The first listener that fails
//! aborts the emit and its error is returned to the caller; listeners that
//! have not run yet are skipped. Invocation order is unspecified.
//!
//! # Example
//!
//! ```rust
//! use folio::signal::{Action, Signal};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let navigated: Signal<String> = Signal::new("navigated");
//!
//! let id = navigated
//!     .connect(Action::new("log_path", "docs", |path: String| async move {
//!         println!("navigated to {}", path);
//!         Ok(())
//!     }))
//!     .await;
//!
//! navigated.emit("/projects".to_string()).await?;
//! navigated.disconnect(id).await;
//! # Ok(())
//! # }
//! ```

use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::hash;

/// Error type returned by listener callbacks
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by listener callbacks
pub type ListenerResult = Result<(), ListenerError>;

type Callback<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ListenerResult> + Send + Sync>;

/// Opaque handle for a connected listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A callback paired with the source text and origin that identify it
pub struct Action<T> {
    source: String,
    origin: String,
    callback: Callback<T>,
}

impl<T> Action<T> {
    /// Create an action from an async callback
    pub fn new<F, Fut>(source: impl Into<String>, origin: impl Into<String>, callback: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ListenerResult> + Send + 'static,
    {
        let callback: Callback<T> = Arc::new(move |data| Box::pin(callback(data)));
        Self {
            source: source.into(),
            origin: origin.into(),
            callback,
        }
    }

    /// Source text of the callback
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Origin that registered the callback
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Content fingerprint of this registration
    pub fn fingerprint(&self) -> String {
        hash::fingerprint(&self.source, &self.origin)
    }
}

impl<T> Clone for Action<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            origin: self.origin.clone(),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("source", &self.source)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Errors raised while emitting a signal
#[derive(Error, Debug)]
pub enum SignalError {
    /// A listener callback failed; remaining listeners were not invoked
    #[error("Listener {listener} on signal '{signal}' failed: {source}")]
    Listener {
        signal: String,
        listener: ListenerId,
        #[source]
        source: ListenerError,
    },
}

/// Result type alias for signal operations
pub type SignalResult<T> = Result<T, SignalError>;

struct Slot<T> {
    origin: String,
    callback: Callback<T>,
}

struct SignalState<T> {
    /// ListenerId → registration, `None` once disconnected
    slots: HashMap<ListenerId, Option<Slot<T>>>,
    /// (source, origin) → ListenerId
    registrations: HashMap<(String, String), ListenerId>,
    next_id: u64,
}

/// Named publish/subscribe channel
pub struct Signal<T> {
    id: String,
    state: RwLock<SignalState<T>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + 'static,
{
    /// Create an empty signal
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: RwLock::new(SignalState {
                slots: HashMap::new(),
                registrations: HashMap::new(),
                next_id: 0,
            }),
        }
    }

    /// Signal identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Register an action
    ///
    /// Re-connecting an action with the same source and origin replaces the
    /// earlier registration and returns its handle.
    pub async fn connect(&self, action: Action<T>) -> ListenerId {
        let fingerprint = action.fingerprint();
        let key = (action.source, action.origin.clone());
        let mut state = self.state.write().await;

        let id = match state.registrations.get(&key) {
            Some(id) => *id,
            None => {
                let id = ListenerId(state.next_id);
                state.next_id += 1;
                state.registrations.insert(key, id);
                id
            }
        };

        let replaced = state
            .slots
            .insert(
                id,
                Some(Slot {
                    origin: action.origin,
                    callback: action.callback,
                }),
            )
            .flatten()
            .is_some();

        tracing::debug!(
            signal = %self.id,
            listener = %id,
            fingerprint = %fingerprint,
            replaced,
            "Listener connected"
        );

        id
    }

    /// Clear a listener's slot
    ///
    /// Returns `false` if the handle is unknown or already disconnected.
    pub async fn disconnect(&self, id: ListenerId) -> bool {
        let mut state = self.state.write().await;
        let cleared = match state.slots.get_mut(&id) {
            Some(slot) => slot.take().is_some(),
            None => false,
        };

        if cleared {
            tracing::debug!(signal = %self.id, listener = %id, "Listener disconnected");
        }
        cleared
    }

    /// Clear the slot registered for an action's source and origin
    pub async fn disconnect_action(&self, action: &Action<T>) -> bool {
        let id = {
            let state = self.state.read().await;
            state
                .registrations
                .get(&(action.source.clone(), action.origin.clone()))
                .copied()
        };

        match id {
            Some(id) => self.disconnect(id).await,
            None => false,
        }
    }

    /// Check whether a handle currently has an active listener
    pub async fn is_connected(&self, id: ListenerId) -> bool {
        let state = self.state.read().await;
        matches!(state.slots.get(&id), Some(Some(_)))
    }

    /// Number of active listeners
    pub async fn listener_count(&self) -> usize {
        let state = self.state.read().await;
        state.slots.values().filter(|slot| slot.is_some()).count()
    }

    /// Number of slots, including cleared ones
    pub async fn slot_count(&self) -> usize {
        self.state.read().await.slots.len()
    }

    /// Invoke every active listener with `data`, one at a time
    ///
    /// Returns the number of listeners invoked. The first failure aborts the
    /// emit and is returned.
    pub async fn emit(&self, data: T) -> SignalResult<usize> {
        // Snapshot so listeners may connect/disconnect while we await them
        let listeners: Vec<(ListenerId, String, Callback<T>)> = {
            let state = self.state.read().await;
            state
                .slots
                .iter()
                .filter_map(|(id, slot)| {
                    slot.as_ref()
                        .map(|s| (*id, s.origin.clone(), Arc::clone(&s.callback)))
                })
                .collect()
        };

        let mut invoked = 0;
        for (id, origin, callback) in listeners {
            // An earlier listener may have disconnected this one
            if !self.is_connected(id).await {
                continue;
            }
            if let Err(source) = callback(data.clone()).await {
                tracing::warn!(
                    signal = %self.id,
                    listener = %id,
                    origin = %origin,
                    error = %source,
                    "Listener failed, aborting emit"
                );
                return Err(SignalError::Listener {
                    signal: self.id.clone(),
                    listener: id,
                    source,
                });
            }
            invoked += 1;
        }

        tracing::trace!(signal = %self.id, invoked, "Signal emitted");
        Ok(invoked)
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("id", &self.id).finish_non_exhaustive()
    }
}
