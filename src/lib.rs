// TaskFlow - Task board state with local persistence and toast notifications

pub mod blob;
pub mod board;
pub mod config;
pub mod filter;
pub mod models;
pub mod seed;
pub mod stats;
pub mod store;
pub mod toast;

// Re-export main types for convenience
pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore, SqliteBlobStore};
pub use board::{Column, DragPayload, columns, drop_on_column};
pub use config::{Backend, Config};
pub use filter::{PriorityFilter, TaskFilter};
pub use models::{Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus, Toast, ToastKind, User};
pub use stats::{BoardStats, completion_rate, overdue_count, recent_tasks};
pub use store::{STORAGE_KEY, StoreEvent, TaskStore};
pub use toast::{TOAST_TTL, ToastQueue};
