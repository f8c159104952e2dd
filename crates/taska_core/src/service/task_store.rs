//! Task store: the authoritative in-memory collection.
//!
//! # Responsibility
//! - Apply add/toggle/edit/delete/clear-completed mutations.
//! - Persist the full collection through the repository after each change.
//! - Track deferred deletes as a pending-removal set keyed by id.
//!
//! # Invariants
//! - New tasks are prepended; edits and toggles never reorder.
//! - Rejected operations leave the collection untouched and do not persist.
//! - A pending id is removed at most once, on its first confirmation.
//! - A failed save never rolls back the in-memory change.

use crate::model::task::{normalize_text, Priority, Task, TaskId, TaskValidationError};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a store operation that did not go through.
///
/// `EmptyText`, `InvalidId` and `TaskNotFound` are validation rejections:
/// nothing changed.
/// `Persist` means the in-memory change was applied but the durable write
/// failed; the store is still consistent and callers may log and continue.
#[derive(Debug)]
pub enum StoreError {
    EmptyText,
    InvalidId,
    TaskNotFound(TaskId),
    Persist(RepoError),
}

impl StoreError {
    /// Whether this is a validation rejection rather than a storage failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Persist(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::InvalidId => write!(f, "task id must not be empty"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Persist(err) => write!(f, "failed to persist tasks: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        match value {
            TaskValidationError::EmptyText => Self::EmptyText,
            TaskValidationError::EmptyId => Self::InvalidId,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persist(value)
    }
}

/// Owns the task collection and the pending-removal set.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    pending_removals: HashSet<TaskId>,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Creates a store seeded from `repo.load()`.
    pub fn open(repo: R) -> Self {
        let tasks = repo.load();
        Self {
            repo,
            tasks,
            pending_removals: HashSet::new(),
        }
    }

    /// Creates a new task and prepends it.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank; nothing is stored.
    /// - `Persist` when the task was added but could not be saved.
    pub fn add(&mut self, text: &str, priority: Priority) -> StoreResult<TaskId> {
        let task = Task::new(text, priority)?;
        let id = task.id.clone();
        self.tasks.insert(0, task);
        info!(
            "event=task_add module=store status=ok id={id} priority={} count={}",
            priority.label(),
            self.tasks.len()
        );
        self.persist()?;
        Ok(id)
    }

    /// Flips completion on one task and returns the new value.
    pub fn toggle(&mut self, id: &TaskId) -> StoreResult<bool> {
        let completed = self.find_mut(id)?.toggle();
        debug!("event=task_toggle module=store status=ok id={id} completed={completed}");
        self.persist()?;
        Ok(completed)
    }

    /// Replaces the text of one task.
    ///
    /// Blank text is rejected before the id is looked up.
    pub fn edit(&mut self, id: &TaskId, text: &str) -> StoreResult<()> {
        let text = normalize_text(text).ok_or(StoreError::EmptyText)?;
        self.find_mut(id)?.text = text;
        debug!("event=task_edit module=store status=ok id={id}");
        self.persist()?;
        Ok(())
    }

    /// Starts a deferred delete by marking the task as pending removal.
    ///
    /// The collection is unchanged until `confirm_delete`. Returns `false`
    /// when the id was already pending.
    pub fn request_delete(&mut self, id: &TaskId) -> StoreResult<bool> {
        if self.get(id).is_none() {
            return Err(StoreError::TaskNotFound(id.clone()));
        }
        let newly_marked = self.pending_removals.insert(id.clone());
        debug!(
            "event=task_delete_request module=store status=ok id={id} newly_marked={newly_marked}"
        );
        Ok(newly_marked)
    }

    /// Completes a deferred delete.
    ///
    /// Confirmations for ids that are not pending are ignored and return
    /// `false`. A pending task already removed by `clear_completed` only has
    /// its mark cleared.
    pub fn confirm_delete(&mut self, id: &TaskId) -> StoreResult<bool> {
        if !self.pending_removals.remove(id) {
            debug!("event=task_delete_confirm module=store status=ignored id={id}");
            return Ok(false);
        }
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        if self.tasks.len() == before {
            return Ok(true);
        }
        info!(
            "event=task_delete module=store status=ok id={id} count={}",
            self.tasks.len()
        );
        self.persist()?;
        Ok(true)
    }

    /// Removes every completed task and returns how many were removed.
    pub fn clear_completed(&mut self) -> StoreResult<usize> {
        let before = self.tasks.len();
        let pending = &mut self.pending_removals;
        self.tasks.retain(|task| {
            if task.completed {
                pending.remove(&task.id);
            }
            !task.completed
        });
        let removed = before - self.tasks.len();
        info!("event=tasks_clear_completed module=store status=ok removed={removed}");
        self.persist()?;
        Ok(removed)
    }

    /// Tasks in collection order, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn is_pending_removal(&self, id: &TaskId) -> bool {
        self.pending_removals.contains(id)
    }

    pub fn pending_removals(&self) -> &HashSet<TaskId> {
        &self.pending_removals
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn find_mut(&mut self, id: &TaskId) -> StoreResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| &task.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))
    }

    fn persist(&self) -> StoreResult<()> {
        self.repo.save(&self.tasks).map_err(|err| {
            warn!(
                "event=tasks_save module=store status=error error_code=save_failed count={} error={err}",
                self.tasks.len()
            );
            StoreError::Persist(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreError, TaskStore};
    use crate::model::task::{Priority, TaskId, TaskValidationError};
    use crate::repo::slot_repo::MemorySlotStore;
    use crate::repo::task_repo::SlotTaskRepository;

    fn empty_store() -> TaskStore<SlotTaskRepository<MemorySlotStore>> {
        TaskStore::open(SlotTaskRepository::new(MemorySlotStore::new()))
    }

    #[test]
    fn add_prepends_newest_first() {
        let mut store = empty_store();
        let first = store.add("first", Priority::Low).unwrap();
        let second = store.add("second", Priority::High).unwrap();

        assert_eq!(store.tasks()[0].id, second);
        assert_eq!(store.tasks()[1].id, first);
    }

    #[test]
    fn blank_add_is_rejected_without_persisting() {
        let mut store = empty_store();
        let err = store.add("   ", Priority::Medium).unwrap_err();

        assert!(matches!(err, StoreError::EmptyText));
        assert!(err.is_rejection());
        assert!(store.is_empty());
        assert_eq!(store.repository().slots().raw("taska_tasks"), None);
    }

    #[test]
    fn validation_errors_keep_their_cause() {
        let empty_id = StoreError::from(TaskValidationError::EmptyId);
        assert!(matches!(empty_id, StoreError::InvalidId));
        assert!(empty_id.is_rejection());
        assert!(matches!(
            StoreError::from(TaskValidationError::EmptyText),
            StoreError::EmptyText
        ));
    }

    #[test]
    fn edit_rejects_blank_before_lookup() {
        let mut store = empty_store();
        let err = store.edit(&TaskId::from("missing"), " ").unwrap_err();
        assert!(matches!(err, StoreError::EmptyText));

        let err = store.edit(&TaskId::from("missing"), "text").unwrap_err();
        assert!(matches!(err, StoreError::TaskNotFound(id) if id.as_str() == "missing"));
    }

    #[test]
    fn clear_completed_drops_pending_marks_of_removed_tasks() {
        let mut store = empty_store();
        let id = store.add("done soon", Priority::Medium).unwrap();
        store.toggle(&id).unwrap();
        assert!(store.request_delete(&id).unwrap());

        assert_eq!(store.clear_completed().unwrap(), 1);
        assert!(!store.is_pending_removal(&id));
        assert!(!store.confirm_delete(&id).unwrap());
    }
}
