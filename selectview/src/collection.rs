//! Observable ordered collection of models.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::Model;
use crate::value::Value;

/// Change notifications emitted by a [`Collection`].
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionEvent {
    Add(Model),
    Remove(Model),
    Reset,
}

/// Handle returned by [`Collection::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

impl Subscription {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

type Subscriber = Arc<dyn Fn(&CollectionEvent) + Send + Sync>;

struct CollectionInner {
    models: Vec<Model>,
    main_index: String,
    subscribers: Vec<(Subscription, Subscriber)>,
}

/// A shared, observable list of models.
///
/// Clones share the same underlying list. Subscribers are notified after the
/// mutation is complete and the internal lock is released, in the order the
/// mutations happened, so a subscriber may read the collection freely.
///
/// # Example
///
/// ```
/// use selectview::{Collection, Model};
///
/// let coll = Collection::new([
///     Model::new().set("id", 1).set("title", "Option one"),
///     Model::new().set("id", 2).set("title", "Option two"),
/// ]);
/// assert_eq!(coll.len(), 2);
/// assert!(coll.get("2").is_some());
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<RwLock<CollectionInner>>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("Collection")
            .field("main_index", &inner.main_index)
            .field("models", &inner.models)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Collection {
    /// Create a collection keyed on the `id` field.
    pub fn new(models: impl IntoIterator<Item = Model>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CollectionInner {
                models: models.into_iter().collect(),
                main_index: "id".into(),
                subscribers: Vec::new(),
            })),
        }
    }

    /// Parse a JSON array of objects into a collection.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let models: Vec<Model> = serde_json::from_str(json)?;
        Ok(Self::new(models))
    }

    /// Use a different field as the collection's id.
    pub fn with_main_index(self, field: impl Into<String>) -> Self {
        self.write().main_index = field.into();
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, CollectionInner> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CollectionInner> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // -------------------------------------------------------------------------
    // Reading
    // -------------------------------------------------------------------------

    pub fn main_index(&self) -> String {
        self.read().main_index.clone()
    }

    pub fn len(&self) -> usize {
        self.read().models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().models.is_empty()
    }

    /// Snapshot of the models in order.
    pub fn models(&self) -> Vec<Model> {
        self.read().models.clone()
    }

    pub fn at(&self, index: usize) -> Option<Model> {
        self.read().models.get(index).cloned()
    }

    pub fn first(&self) -> Option<Model> {
        self.at(0)
    }

    /// Find a model whose main index loosely equals `id`.
    pub fn get(&self, id: impl Into<Value>) -> Option<Model> {
        let id = id.into();
        let inner = self.read();
        inner
            .models
            .iter()
            .find(|m| m.get_or_null(&inner.main_index).loose_eq(&id))
            .cloned()
    }

    /// Position of this exact model (by identity).
    pub fn index_of(&self, model: &Model) -> Option<usize> {
        self.read().models.iter().position(|m| m == model)
    }

    pub fn contains(&self, model: &Model) -> bool {
        self.index_of(model).is_some()
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Append a model and notify subscribers.
    pub fn add(&self, model: Model) {
        self.write().models.push(model.clone());
        log::debug!("Collection::add {}", model.cid());
        self.notify(CollectionEvent::Add(model));
    }

    /// Remove the model whose main index loosely equals `id`.
    pub fn remove(&self, id: impl Into<Value>) -> Option<Model> {
        let id = id.into();
        let removed = {
            let mut inner = self.write();
            let main_index = inner.main_index.clone();
            let position = inner
                .models
                .iter()
                .position(|m| m.get_or_null(&main_index).loose_eq(&id))?;
            inner.models.remove(position)
        };
        log::debug!("Collection::remove {}", removed.cid());
        self.notify(CollectionEvent::Remove(removed.clone()));
        Some(removed)
    }

    /// Remove this exact model.
    pub fn remove_model(&self, model: &Model) -> bool {
        let removed = {
            let mut inner = self.write();
            let before = inner.models.len();
            inner.models.retain(|m| m != model);
            inner.models.len() != before
        };
        if removed {
            self.notify(CollectionEvent::Remove(model.clone()));
        }
        removed
    }

    /// Replace every model at once.
    pub fn reset(&self, models: impl IntoIterator<Item = Model>) {
        let models: Vec<Model> = models.into_iter().collect();
        log::debug!("Collection::reset count={}", models.len());
        self.write().models = models;
        self.notify(CollectionEvent::Reset);
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Subscribe to add/remove/reset notifications.
    pub fn subscribe(
        &self,
        handler: impl Fn(&CollectionEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let subscription = Subscription::new();
        self.write()
            .subscribers
            .push((subscription, Arc::new(handler)));
        subscription
    }

    /// Drop a subscription. Returns false when it was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut inner = self.write();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(s, _)| *s != subscription);
        inner.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.read().subscribers.len()
    }

    fn notify(&self, event: CollectionEvent) {
        let subscribers: Vec<Subscriber> = self
            .read()
            .subscribers
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(&event);
        }
    }
}
