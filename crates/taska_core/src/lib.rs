//! Core state logic for the Taska task list.
//! This crate is the single source of truth for task invariants; the UI
//! shell only feeds events in and draws the frames handed back.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use app::{
    BootstrapError, EditModal, KeyPress, RenderFrame, RenderSink, SqliteTaskApp, TaskApp, UiEvent,
};
pub use config::{CoreConfig, LoggingConfig, StorageLocation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Priority, Task, TaskId, TaskValidationError};
pub use repo::slot_repo::{MemorySlotStore, SlotStore, SqliteSlotStore};
pub use repo::task_repo::{SlotTaskRepository, TaskRepository, DEFAULT_STORAGE_KEY};
pub use repo::{RepoError, RepoResult};
pub use service::edit_session::{CommitOutcome, EditSession};
pub use service::task_store::{StoreError, StoreResult, TaskStore};
pub use view::projection::{project, FilterMode, Projection, TaskView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
