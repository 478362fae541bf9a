//! # Todo Model
//!
//! Observable, optimistic view of the to-do list.
//!
//! Every mutation is applied locally and announced to listeners before the
//! store call is awaited, then settled (or reverted) when the call returns.
//!
//! ## Item lifecycle
//!
//! ```text
//! add ──▶ Pending(Create) ──ack──▶ Settled ──toggle/delete──▶ Pending(op)
//!              │                      ▲                          │
//!              └──error──▶ Failed ────┴────────retry─────────────┘
//! ```
//!
//! Listeners are called synchronously, in registration order, with a
//! snapshot of the list. No lock is held while a listener runs or while a
//! store call is in flight.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::{HubError, ItemOperation, ItemState, LocalId, TodoItem};
use crate::ports::TodoStoreApi;

type Listener = Arc<dyn Fn(&[TodoItem]) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

struct ModelState {
    items: Vec<TodoItem>,
    loading: bool,
    next_local_id: u64,
}

impl ModelState {
    fn allocate(&mut self) -> LocalId {
        self.next_local_id += 1;
        LocalId(self.next_local_id)
    }

    fn find_mut(&mut self, local_id: LocalId) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| item.local_id == local_id)
    }

    fn find(&self, local_id: LocalId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.local_id == local_id)
    }
}

/// Handle for a registered listener.
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Stop receiving change notifications.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Observable to-do list backed by a [`TodoStoreApi`].
pub struct TodoModel {
    store: Arc<dyn TodoStoreApi>,
    state: Mutex<ModelState>,
    listeners: Arc<Mutex<Listeners>>,
}

impl TodoModel {
    /// Create an empty model in the loading state.
    pub fn new(store: Arc<dyn TodoStoreApi>) -> Self {
        Self {
            store,
            state: Mutex::new(ModelState {
                items: Vec::new(),
                loading: true,
                next_local_id: 0,
            }),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Register a change listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[TodoItem]) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    /// Snapshot of the current list.
    pub fn todos(&self) -> Vec<TodoItem> {
        self.state.lock().items.clone()
    }

    /// Snapshot of one item.
    pub fn get(&self, local_id: LocalId) -> Option<TodoItem> {
        self.state.lock().find(local_id).cloned()
    }

    /// True until the first load finishes.
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Replace the list with a fresh read from the store.
    ///
    /// Items the model already holds keep their local id, matched by object
    /// id. A pending item is kept as-is until its commit returns; a failed
    /// item takes the fetched values but stays failed so it can be retried.
    /// Local items that have no Hub object yet are kept at the end of the
    /// list. On failure the current list is left alone; either way the
    /// loading flag is cleared.
    pub async fn load(&self) -> Result<(), HubError> {
        let result = self.store.fetch_todos().await;

        {
            let mut state = self.state.lock();
            state.loading = false;

            if let Ok(fetched) = &result {
                let mut known: HashMap<String, TodoItem> = HashMap::new();
                let mut unassigned = Vec::new();
                for item in state.items.drain(..) {
                    if item.object_id.is_empty() {
                        unassigned.push(item);
                    } else {
                        known.insert(item.object_id.clone(), item);
                    }
                }

                let mut items = Vec::with_capacity(fetched.len() + unassigned.len());
                for item in fetched.iter().cloned() {
                    let merged = match known.remove(&item.object_id) {
                        // The in-flight commit settles it.
                        Some(existing) if existing.state.is_pending() => existing,
                        Some(existing) => {
                            let mut item = item.with_local_id(existing.local_id);
                            item.set_state(existing.state);
                            item
                        }
                        None => {
                            let local_id = state.allocate();
                            item.with_local_id(local_id)
                        }
                    };
                    items.push(merged);
                }
                items.extend(unassigned);
                state.items = items;
            }
        }

        match &result {
            Ok(items) => debug!("[hub-sync] Model loaded {} items", items.len()),
            Err(e) => warn!("[hub-sync] Failed to load to-dos: {}", e),
        }

        self.inform();
        result.map(|_| ())
    }

    /// Add a to-do.
    ///
    /// The item appears immediately as pending and settles once the Hub
    /// assigns its object id. Returns the item's local id.
    pub async fn add_todo(&self, text: &str) -> Result<LocalId, HubError> {
        if text.trim().is_empty() {
            return Err(HubError::EmptyTodoText);
        }

        let local_id = {
            let mut state = self.state.lock();
            let local_id = state.allocate();
            state.items.push(TodoItem::pending(text).with_local_id(local_id));
            local_id
        };
        self.inform();

        self.commit_create(local_id, text.to_string()).await?;
        Ok(local_id)
    }

    /// Flip an item's done flag.
    pub async fn toggle_todo(&self, local_id: LocalId) -> Result<(), HubError> {
        let (object_id, text, done) = {
            let mut state = self.state.lock();
            let item = state
                .find_mut(local_id)
                .ok_or_else(|| HubError::UnknownTodo(local_id.to_string()))?;
            if item.object_id.is_empty() {
                return Err(HubError::NotYetCreated(local_id.to_string()));
            }

            item.done = !item.done;
            item.set_state(ItemState::Pending(ItemOperation::Update));
            (item.object_id.clone(), item.text.clone(), item.done)
        };
        self.inform();

        let result = self.store.update_todo(&object_id, &text, done).await;

        {
            let mut state = self.state.lock();
            if let Some(item) = state.find_mut(local_id) {
                match &result {
                    Ok(_) => item.set_state(ItemState::Settled),
                    Err(e) => {
                        warn!("[hub-sync] Failed to update to-do {}: {}", object_id, e);
                        item.done = !done;
                        item.set_state(ItemState::Failed {
                            operation: ItemOperation::Update,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        self.inform();

        result.map(|_| ())
    }

    /// Delete an item. It stays in the list, marked pending, until the Hub
    /// acknowledges the delete.
    pub async fn delete_todo(&self, local_id: LocalId) -> Result<(), HubError> {
        let object_id = {
            let mut state = self.state.lock();
            let item = state
                .find_mut(local_id)
                .ok_or_else(|| HubError::UnknownTodo(local_id.to_string()))?;
            if item.object_id.is_empty() {
                return Err(HubError::NotYetCreated(local_id.to_string()));
            }

            item.set_state(ItemState::Pending(ItemOperation::Delete));
            item.object_id.clone()
        };
        self.inform();

        let result = self.store.delete_todo(&object_id).await;

        {
            let mut state = self.state.lock();
            match &result {
                Ok(_) => state
                    .items
                    .retain(|item| item.local_id != local_id && item.object_id != object_id),
                Err(e) => {
                    warn!("[hub-sync] Failed to delete to-do {}: {}", object_id, e);
                    if let Some(item) = state.find_mut(local_id) {
                        item.set_state(ItemState::Failed {
                            operation: ItemOperation::Delete,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        self.inform();

        result.map(|_| ())
    }

    /// Re-attempt the operation that last failed for an item. Items that
    /// are not in the failed state are left alone.
    pub async fn retry(&self, local_id: LocalId) -> Result<(), HubError> {
        let (operation, text) = {
            let state = self.state.lock();
            let item = state
                .find(local_id)
                .ok_or_else(|| HubError::UnknownTodo(local_id.to_string()))?;
            match &item.state {
                ItemState::Failed { operation, .. } => (*operation, item.text.clone()),
                _ => return Ok(()),
            }
        };

        debug!("[hub-sync] Retrying {:?} for {}", operation, local_id);
        match operation {
            ItemOperation::Create => {
                if let Some(item) = self.state.lock().find_mut(local_id) {
                    item.set_state(ItemState::Pending(ItemOperation::Create));
                }
                self.inform();
                self.commit_create(local_id, text).await
            }
            ItemOperation::Update => self.toggle_todo(local_id).await,
            ItemOperation::Delete => self.delete_todo(local_id).await,
        }
    }

    /// Drop an item whose create failed. Returns whether anything was
    /// removed.
    pub fn discard(&self, local_id: LocalId) -> bool {
        let removed = {
            let mut state = self.state.lock();
            let before = state.items.len();
            state.items.retain(|item| {
                item.local_id != local_id || !item.object_id.is_empty() || !item.state.is_failed()
            });
            state.items.len() != before
        };

        if removed {
            self.inform();
        }
        removed
    }

    /// Send the create commit for a pending item and settle it.
    async fn commit_create(&self, local_id: LocalId, text: String) -> Result<(), HubError> {
        let result = self.store.create_todo(&text).await;

        {
            let mut state = self.state.lock();
            match &result {
                Ok(object_id) => {
                    // A reload may already have picked the new object up.
                    let duplicate = state
                        .items
                        .iter()
                        .any(|item| item.local_id != local_id && &item.object_id == object_id);
                    if duplicate {
                        state.items.retain(|item| item.local_id != local_id);
                    } else if let Some(item) = state.find_mut(local_id) {
                        item.object_id = object_id.clone();
                        item.set_state(ItemState::Settled);
                    }
                }
                Err(e) => {
                    warn!("[hub-sync] Failed to create to-do: {}", e);
                    if let Some(item) = state.find_mut(local_id) {
                        item.set_state(ItemState::Failed {
                            operation: ItemOperation::Create,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        self.inform();

        result.map(|_| ())
    }

    /// Notify every listener with a snapshot of the list.
    fn inform(&self) {
        let snapshot = self.todos();
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&snapshot);
        }
    }
}
