// Task store: the board's single source of truth

use crate::blob::BlobStore;
use crate::models::{Task, TaskDraft, TaskPatch, TaskStatus, Toast, ToastKind, new_id};
use crate::seed::seed_tasks;
use crate::toast::ToastQueue;
use chrono::Utc;
use eyre::{Context, Result, eyre};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Key the serialized task list is stored under
pub const STORAGE_KEY: &str = "taskflow-tasks";

const EVENT_CAPACITY: usize = 256;

/// Change notification delivered to subscribers after each mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Loaded { count: usize, seeded: bool },
    TaskAdded { id: String },
    TaskUpdated { id: String },
    TaskDeleted { id: String },
    TaskMoved { id: String, status: TaskStatus },
    ToastAdded { id: String },
    ToastRemoved { id: String },
}

/// In-process task collection with blob persistence and toast notifications
///
/// A store starts out not ready. `load()` restores the persisted tasks (or
/// the seed set) and only then exposes a task snapshot and accepts mutations.
pub struct TaskStore {
    blob: Box<dyn BlobStore>,
    tasks: Vec<Task>,
    ready: bool,
    // False when the blob could not be read, so its contents are unknown
    writable: bool,
    toasts: ToastQueue,
    events: broadcast::Sender<StoreEvent>,
}

impl TaskStore {
    /// Create a store over `blob` without loading anything yet
    pub fn new(blob: Box<dyn BlobStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            blob,
            tasks: Vec::new(),
            ready: false,
            writable: true,
            toasts: ToastQueue::new(events.clone()),
            events,
        }
    }

    /// Create a store and load it
    pub fn open(blob: Box<dyn BlobStore>) -> Self {
        let mut store = Self::new(blob);
        store.load();
        store
    }

    /// Restore tasks from the blob store, seeding when nothing usable is there
    ///
    /// Never fails: absent, corrupt or unreadable state is replaced by the
    /// seed set. Seeding does not write; the first mutation does. When the
    /// blob could not be read at all, the session runs on the seed set but
    /// never writes, so whatever is persisted survives; every mutation then
    /// returns an error after updating memory. Calling this on a ready store
    /// does nothing.
    pub fn load(&mut self) {
        if self.ready {
            return;
        }

        let (tasks, seeded) = match self.blob.get(STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Task>>(&json) {
                Ok(tasks) => (tasks, false),
                Err(e) => {
                    warn!(key = STORAGE_KEY, error = %e, "Persisted tasks are malformed, using seed data");
                    (seed_tasks(Utc::now()), true)
                }
            },
            Ok(None) => {
                debug!(key = STORAGE_KEY, "No persisted tasks, using seed data");
                (seed_tasks(Utc::now()), true)
            }
            Err(e) => {
                warn!(key = STORAGE_KEY, error = ?e, "Failed to read persisted tasks, using seed data without saving");
                self.writable = false;
                (seed_tasks(Utc::now()), true)
            }
        };

        self.tasks = tasks;
        self.ready = true;

        info!(count = self.tasks.len(), seeded, "Task store ready");
        self.notify(StoreEvent::Loaded {
            count: self.tasks.len(),
            seeded,
        });
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Task snapshot, `None` until the store is ready
    pub fn tasks(&self) -> Option<&[Task]> {
        self.ready.then_some(self.tasks.as_slice())
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks()?.iter().find(|t| t.id == id)
    }

    /// Current toasts, oldest first
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.snapshot()
    }

    /// Register an observer; it sees every event emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    #[cfg(test)]
    fn blob(&self) -> &dyn BlobStore {
        self.blob.as_ref()
    }

    // ========================================================================
    // Task operations
    // ========================================================================

    /// Prepend a new task built from `draft` and return its id
    ///
    /// The draft is not validated; an empty title is stored as given.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<String> {
        self.ensure_ready()?;

        let task = Task::from_draft(draft, new_id(), Utc::now());
        let id = task.id.clone();
        self.tasks.insert(0, task);

        debug!(id = %id, count = self.tasks.len(), "Task added");
        let persisted = self.persist();
        self.notify(StoreEvent::TaskAdded { id: id.clone() });
        self.add_toast("Task created successfully", ToastKind::Success);

        persisted.map(|_| id)
    }

    /// Merge `patch` into the task with `id`; unknown ids are ignored
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<()> {
        self.ensure_ready()?;

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "update_task: no such task");
            return Ok(());
        };
        task.apply(patch);

        debug!(id, "Task updated");
        let persisted = self.persist();
        self.notify(StoreEvent::TaskUpdated { id: id.to_string() });
        persisted
    }

    /// Remove the task with `id`
    ///
    /// The "Task deleted" toast is emitted whether or not the id existed.
    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        self.ensure_ready()?;

        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;

        let persisted = if removed {
            debug!(id, count = self.tasks.len(), "Task deleted");
            let persisted = self.persist();
            self.notify(StoreEvent::TaskDeleted { id: id.to_string() });
            persisted
        } else {
            debug!(id, "delete_task: no such task");
            Ok(())
        };

        self.add_toast("Task deleted", ToastKind::Info);
        persisted
    }

    /// Set the status of the task with `id`
    ///
    /// The "Task status updated" toast is emitted whether or not the id
    /// existed, and also when the status is unchanged.
    pub fn move_task(&mut self, id: &str, status: TaskStatus) -> Result<()> {
        self.ensure_ready()?;

        let found = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        };

        let persisted = if found {
            debug!(id, %status, "Task moved");
            let persisted = self.persist();
            self.notify(StoreEvent::TaskMoved {
                id: id.to_string(),
                status,
            });
            persisted
        } else {
            debug!(id, "move_task: no such task");
            Ok(())
        };

        self.add_toast("Task status updated", ToastKind::Success);
        persisted
    }

    // ========================================================================
    // Toasts
    // ========================================================================

    /// Queue a toast that removes itself after `TOAST_TTL`
    pub fn add_toast(&self, message: impl Into<String>, kind: ToastKind) -> String {
        self.toasts.add(message, kind)
    }

    /// Dismiss a toast; unknown ids are ignored
    pub fn remove_toast(&self, id: &str) -> bool {
        self.toasts.remove(id)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn ensure_ready(&self) -> Result<()> {
        if !self.ready {
            return Err(eyre!("Task store is not loaded yet"));
        }
        Ok(())
    }

    /// Write the whole collection under `STORAGE_KEY`
    fn persist(&mut self) -> Result<()> {
        if !self.writable {
            return Err(eyre!("Persisted tasks could not be read at load time, not overwriting them"));
        }
        let json = serde_json::to_string(&self.tasks).context("Failed to serialize tasks")?;
        self.blob
            .set(STORAGE_KEY, &json)
            .with_context(|| format!("Failed to persist {} tasks", self.tasks.len()))
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
