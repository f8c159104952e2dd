//! Event-driven controller between the UI shell and the core.
//!
//! # Responsibility
//! - Own the task store, current filter and edit session as one actor.
//! - Turn one UI event at a time into mutations, then hand a fresh
//!   render frame to the sink.
//!
//! # Invariants
//! - `dispatch` takes `&mut self`; two events can never interleave.
//! - No event fails: rejections and storage failures are logged and the
//!   frame is rendered from whatever state the store holds.
//! - Domain text never reaches log lines.

use crate::config::{CoreConfig, StorageLocation};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::init_logging;
use crate::model::task::{Priority, TaskId};
use crate::repo::slot_repo::SqliteSlotStore;
use crate::repo::task_repo::{SlotTaskRepository, TaskRepository};
use crate::service::edit_session::{CommitOutcome, EditSession};
use crate::service::task_store::{StoreResult, TaskStore};
use crate::view::projection::{project, FilterMode, Projection, TaskView};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Keyboard shortcuts the edit modal reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Escape,
    CtrlEnter,
}

/// Input emitted by the UI shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SubmitNewTask { text: String, priority: Priority },
    Toggle(TaskId),
    RequestEdit(TaskId),
    /// First phase of a delete; the row starts its exit transition.
    RequestDelete(TaskId),
    /// The exit transition finished; the task is removed now.
    DeleteConfirmed(TaskId),
    ChangeFilter(FilterMode),
    ClearCompletedRequested,
    EditDraftChanged(String),
    EditCommitRequested,
    EditCancelRequested,
    /// Click on the backdrop around the edit modal.
    OverlayDismissed,
    Key(KeyPress),
}

/// Edit modal contents for the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditModal {
    pub target: TaskId,
    pub draft: String,
}

/// Complete snapshot handed to the sink after every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub projection: Projection,
    pub modal: Option<EditModal>,
}

impl RenderFrame {
    pub fn tasks(&self) -> &[TaskView] {
        &self.projection.tasks
    }

    pub fn done_count(&self) -> usize {
        self.projection.done_count
    }

    pub fn left_count(&self) -> usize {
        self.projection.left_count
    }

    pub fn is_empty(&self) -> bool {
        self.projection.is_empty()
    }

    pub fn filter(&self) -> FilterMode {
        self.projection.filter
    }
}

/// Consumer of render frames, implemented by the presentation layer.
pub trait RenderSink {
    fn render(&mut self, frame: &RenderFrame);
}

/// Records every frame; handy for headless shells and tests.
impl RenderSink for Vec<RenderFrame> {
    fn render(&mut self, frame: &RenderFrame) {
        self.push(frame.clone());
    }
}

/// Failure while wiring storage and logging at startup.
#[derive(Debug)]
pub enum BootstrapError {
    Logging(String),
    Db(DbError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Db(err) => write!(f, "storage open failed: {err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for BootstrapError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// SQLite-backed controller built by `TaskApp::bootstrap`.
pub type SqliteTaskApp = TaskApp<SlotTaskRepository<SqliteSlotStore>>;

/// The single logical actor owning all client state.
pub struct TaskApp<R: TaskRepository> {
    store: TaskStore<R>,
    filter: FilterMode,
    edit: EditSession,
}

impl SqliteTaskApp {
    /// Initializes logging (when configured), opens storage and loads tasks.
    pub fn bootstrap(config: &CoreConfig) -> Result<Self, BootstrapError> {
        if let Some(logging) = &config.logging {
            init_logging(&logging.level, &logging.log_dir).map_err(BootstrapError::Logging)?;
        }

        let conn = match &config.storage {
            StorageLocation::File(path) => open_db(path)?,
            StorageLocation::InMemory => open_db_in_memory()?,
        };
        let repo = SlotTaskRepository::with_key(SqliteSlotStore::new(conn), &config.storage_key);
        Ok(Self::new(repo))
    }
}

impl<R: TaskRepository> TaskApp<R> {
    /// Loads the collection; filter starts at `all`, no edit open.
    pub fn new(repo: R) -> Self {
        let store = TaskStore::open(repo);
        info!("event=app_ready module=app status=ok count={}", store.len());
        Self {
            store,
            filter: FilterMode::default(),
            edit: EditSession::new(),
        }
    }

    /// Handles one event and renders the resulting frame.
    pub fn dispatch(&mut self, event: UiEvent, sink: &mut dyn RenderSink) {
        self.apply(event);
        self.render(sink);
    }

    /// Renders the current state without handling an event.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        sink.render(&self.frame());
    }

    /// Handles one event without rendering.
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::SubmitNewTask { text, priority } => {
                report("task_add", self.store.add(&text, priority));
            }
            UiEvent::Toggle(id) => report("task_toggle", self.store.toggle(&id)),
            UiEvent::RequestEdit(id) => {
                if !self.edit.open(&self.store, &id) {
                    debug!("event=edit_open module=app status=ignored reason=not_found id={id}");
                }
            }
            UiEvent::RequestDelete(id) => {
                report("task_delete_request", self.store.request_delete(&id));
            }
            UiEvent::DeleteConfirmed(id) => {
                report("task_delete_confirm", self.store.confirm_delete(&id));
            }
            UiEvent::ChangeFilter(filter) => {
                debug!("event=filter_change module=app status=ok filter={filter}");
                self.filter = filter;
            }
            UiEvent::ClearCompletedRequested => {
                report("tasks_clear_completed", self.store.clear_completed());
            }
            UiEvent::EditDraftChanged(text) => {
                self.edit.update_draft(&text);
            }
            UiEvent::EditCommitRequested | UiEvent::Key(KeyPress::CtrlEnter) => {
                self.commit_edit();
            }
            UiEvent::EditCancelRequested
            | UiEvent::OverlayDismissed
            | UiEvent::Key(KeyPress::Escape) => self.edit.cancel(),
        }
    }

    /// Builds the frame for the current state.
    pub fn frame(&self) -> RenderFrame {
        let modal = match &self.edit {
            EditSession::Open { target, draft } => Some(EditModal {
                target: target.clone(),
                draft: draft.clone(),
            }),
            EditSession::Closed => None,
        };
        RenderFrame {
            projection: project(
                self.store.tasks(),
                self.store.pending_removals(),
                self.filter,
            ),
            modal,
        }
    }

    pub fn store(&self) -> &TaskStore<R> {
        &self.store
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    fn commit_edit(&mut self) {
        if !self.edit.is_open() {
            return;
        }
        match self.edit.commit(&mut self.store) {
            Ok(CommitOutcome::Saved) => {}
            Ok(outcome) => debug!("event=edit_commit module=app status=ignored outcome={outcome:?}"),
            Err(err) => warn!("event=edit_commit module=app status=error error={err}"),
        }
    }
}

fn report<T>(event: &str, result: StoreResult<T>) {
    match result {
        Ok(_) => {}
        Err(err) if err.is_rejection() => {
            debug!("event={event} module=app status=rejected reason={err}");
        }
        Err(err) => warn!("event={event} module=app status=error error={err}"),
    }
}
