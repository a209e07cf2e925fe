//! Change notification shared by all stores.
//!
//! A [`ChangeNotifier`] fans every [`KvChange`] out to synchronous
//! subscribers (called inline, in registration order) and to async
//! [`ChangeReceiver`]s over a broadcast channel.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Default capacity of the async watcher channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A single key write or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvChange {
    /// The key that changed.
    pub key: String,
    /// The new value, or `None` if the key was removed.
    pub new_value: Option<String>,
}

impl KvChange {
    /// A change recording a new value for `key`.
    #[must_use]
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: Some(value.into()),
        }
    }

    /// A change recording the removal of `key`.
    #[must_use]
    pub fn removed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: None,
        }
    }
}

/// Identifier handed out by [`ChangeNotifier::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Synchronous change observer.
///
/// Implementations must not block; they run on the writer's thread while the
/// store's write lock is held, so they must not write to the same store.
pub trait KvSubscriber: Send + Sync {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Called after a key has been written or removed.
    fn on_change(&self, change: &KvChange);
}

/// Closure-backed [`KvSubscriber`].
pub struct FnSubscriber<F>
where
    F: Fn(&KvChange) + Send + Sync,
{
    name: String,
    callback: F,
}

impl<F> FnSubscriber<F>
where
    F: Fn(&KvChange) + Send + Sync,
{
    /// Wrap `callback` as a named subscriber.
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> KvSubscriber for FnSubscriber<F>
where
    F: Fn(&KvChange) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_change(&self, change: &KvChange) {
        (self.callback)(change);
    }
}

type Registered = (SubscriberId, Arc<dyn KvSubscriber>);

/// Fan-out point for store changes.
pub struct ChangeNotifier {
    sender: broadcast::Sender<Arc<KvChange>>,
    subscribers: RwLock<Vec<Registered>>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    /// Create a notifier with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a notifier with the given async channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a synchronous subscriber.
    pub fn register(&self, subscriber: Arc<dyn KvSubscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        trace!(%id, name = subscriber.name(), "registering store subscriber");
        match self.subscribers.write() {
            Ok(mut subs) => subs.push((id, subscriber)),
            Err(poisoned) => poisoned.into_inner().push((id, subscriber)),
        }
        id
    }

    /// Remove a synchronous subscriber. Returns `true` if it was registered.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut subs = match self.subscribers.write() {
            Ok(subs) => subs,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    /// Number of synchronous subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.read().map_or(0, |subs| subs.len())
    }

    /// Whether there are no synchronous subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open an async receiver for all future changes.
    #[must_use]
    pub fn watch(&self) -> ChangeReceiver {
        ChangeReceiver::new(self.sender.subscribe(), None)
    }

    /// Open an async receiver that only yields changes to `key`.
    #[must_use]
    pub fn watch_key(&self, key: impl Into<String>) -> ChangeReceiver {
        ChangeReceiver::new(self.sender.subscribe(), Some(key.into()))
    }

    /// Deliver a change to every watcher and subscriber.
    ///
    /// The subscriber list is snapshotted before any callback runs, so a
    /// callback may register or unregister without deadlocking.
    pub fn notify(&self, change: KvChange) {
        let change = Arc::new(change);
        if self.sender.send(Arc::clone(&change)).is_err() {
            trace!(key = %change.key, "no async watchers for change");
        }

        let snapshot: Vec<Arc<dyn KvSubscriber>> = match self.subscribers.read() {
            Ok(subs) => subs.iter().map(|(_, s)| Arc::clone(s)).collect(),
            Err(_) => {
                warn!(key = %change.key, "subscriber registry poisoned; skipping callbacks");
                return;
            },
        };

        for subscriber in snapshot {
            trace!(key = %change.key, subscriber = subscriber.name(), "notifying subscriber");
            subscriber.on_change(&change);
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.len())
            .field("watchers", &self.sender.receiver_count())
            .finish()
    }
}

/// Async receiver for store changes.
pub struct ChangeReceiver {
    receiver: broadcast::Receiver<Arc<KvChange>>,
    key_filter: Option<String>,
}

impl ChangeReceiver {
    fn new(receiver: broadcast::Receiver<Arc<KvChange>>, key_filter: Option<String>) -> Self {
        Self {
            receiver,
            key_filter,
        }
    }

    fn matches(&self, change: &KvChange) -> bool {
        self.key_filter
            .as_deref()
            .is_none_or(|key| change.key == key)
    }

    /// Receive the next matching change.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn recv(&mut self) -> Option<Arc<KvChange>> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if self.matches(&change) => return Some(change),
                Ok(_) => {},
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(skipped = count, "change receiver lagged, changes dropped");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Receive the next matching change without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<KvChange>> {
        loop {
            match self.receiver.try_recv() {
                Ok(change) if self.matches(&change) => return Some(change),
                Ok(_) => {},
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!(skipped = count, "change receiver lagged, changes dropped");
                },
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_register_and_notify() {
        let notifier = ChangeNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);

        notifier.register(Arc::new(FnSubscriber::new("counter", move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        })));

        notifier.notify(KvChange::set("a", "1"));
        notifier.notify(KvChange::removed("a"));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unregister() {
        let notifier = ChangeNotifier::new();
        let id = notifier.register(Arc::new(FnSubscriber::new("noop", |_| {})));
        assert_eq!(notifier.len(), 1);
        assert!(notifier.unregister(id));
        assert!(!notifier.unregister(id));
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_subscriber_may_register_during_callback() {
        let notifier = Arc::new(ChangeNotifier::new());
        let weak = Arc::downgrade(&notifier);
        notifier.register(Arc::new(FnSubscriber::new("reentrant", move |_| {
            if let Some(n) = weak.upgrade() {
                n.register(Arc::new(FnSubscriber::new("late", |_| {})));
            }
        })));

        notifier.notify(KvChange::set("k", "v"));
        assert_eq!(notifier.len(), 2);
    }

    #[tokio::test]
    async fn test_watch_receives_changes() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.watch();
        notifier.notify(KvChange::set("fileSystem", "[]"));

        let change = rx.recv().await.unwrap();
        assert_eq!(change.key, "fileSystem");
        assert_eq!(change.new_value.as_deref(), Some("[]"));
    }

    #[test]
    fn test_watch_key_filters() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.watch_key("recentFiles");
        notifier.notify(KvChange::set("fileSystem", "[]"));
        notifier.notify(KvChange::removed("recentFiles"));

        let change = rx.try_recv().unwrap();
        assert_eq!(change.key, "recentFiles");
        assert!(change.new_value.is_none());
        assert!(rx.try_recv().is_none());
    }
}
