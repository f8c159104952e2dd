//! Edit session: the transient state of the edit modal.
//!
//! # Responsibility
//! - Track at most one in-progress edit (target id + draft text).
//! - Commit drafts through the task store or discard them.
//!
//! # Invariants
//! - The session holds no task data besides the draft; the store stays
//!   authoritative for text.
//! - A blank draft never reaches the store and keeps the session open.
//! - Any commit that reached the store closes the session.

use crate::model::task::TaskId;
use crate::repo::task_repo::TaskRepository;
use crate::service::task_store::{StoreError, StoreResult, TaskStore};
use log::debug;

/// Edit modal state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Closed,
    Open { target: TaskId, draft: String },
}

/// What a commit attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Draft stored; session closed.
    Saved,
    /// Draft was blank; session left open for another attempt.
    EmptyDraft,
    /// Target task no longer exists; session closed.
    TargetMissing,
    /// No edit was in progress.
    NotOpen,
}

impl EditSession {
    pub fn new() -> Self {
        Self::Closed
    }

    /// Opens (or retargets) the session on an existing task.
    ///
    /// The draft starts as the task's current text. Returns `false` and
    /// leaves the state untouched when the task does not exist.
    pub fn open<R: TaskRepository>(&mut self, store: &TaskStore<R>, id: &TaskId) -> bool {
        let Some(task) = store.get(id) else {
            return false;
        };
        *self = Self::Open {
            target: task.id.clone(),
            draft: task.text.clone(),
        };
        debug!("event=edit_open module=edit status=ok id={id}");
        true
    }

    /// Replaces the draft. Returns `false` when closed.
    pub fn update_draft(&mut self, text: &str) -> bool {
        match self {
            Self::Open { draft, .. } => {
                text.clone_into(draft);
                true
            }
            Self::Closed => false,
        }
    }

    /// Commits the draft to the store.
    ///
    /// # Errors
    /// - `Persist` when the edit was applied but not saved; the session is
    ///   closed in that case as well.
    pub fn commit<R: TaskRepository>(
        &mut self,
        store: &mut TaskStore<R>,
    ) -> StoreResult<CommitOutcome> {
        let Self::Open { target, draft } = &*self else {
            return Ok(CommitOutcome::NotOpen);
        };

        let outcome = match store.edit(target, draft) {
            Ok(()) => Ok(CommitOutcome::Saved),
            Err(StoreError::EmptyText) => {
                debug!("event=edit_commit module=edit status=rejected reason=empty_draft");
                return Ok(CommitOutcome::EmptyDraft);
            }
            Err(StoreError::TaskNotFound(_)) => Ok(CommitOutcome::TargetMissing),
            Err(err) => Err(err),
        };

        debug!("event=edit_commit module=edit status=closed");
        *self = Self::Closed;
        outcome
    }

    /// Discards any draft and closes the session.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("event=edit_cancel module=edit status=ok");
        }
        *self = Self::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn target(&self) -> Option<&TaskId> {
        match self {
            Self::Open { target, .. } => Some(target),
            Self::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            Self::Open { draft, .. } => Some(draft.as_str()),
            Self::Closed => None,
        }
    }
}
