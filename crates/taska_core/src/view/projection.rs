//! Filter/view projection.
//!
//! # Responsibility
//! - Derive the visible subset of tasks for a filter mode.
//! - Produce view-ready records and the done/left counters.
//!
//! # Invariants
//! - Visible tasks keep collection order.
//! - `done_count + left_count` equals the collection size, whatever the filter.

use crate::model::task::{Priority, Task, TaskId};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which tasks the list shows. UI state only; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "unsupported filter `{other}`; expected all|active|completed"
            )),
        }
    }
}

/// One row as the render sink should display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    /// Short local date, e.g. `Mar 5`.
    pub created_label: String,
    /// Deferred delete requested; the sink should play its exit transition.
    pub removing: bool,
}

impl TaskView {
    pub fn priority_label(&self) -> &'static str {
        self.priority.label()
    }
}

/// Filtered rows plus summary counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub filter: FilterMode,
    pub tasks: Vec<TaskView>,
    /// Completed tasks across the whole collection.
    pub done_count: usize,
    /// Incomplete tasks across the whole collection.
    pub left_count: usize,
}

impl Projection {
    /// Whether the filtered list is empty (empty-state indicator).
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn total(&self) -> usize {
        self.done_count + self.left_count
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.iter().any(|view| &view.id == id)
    }
}

/// Projects `tasks` through `filter`, flagging ids in `pending` as removing.
pub fn project(tasks: &[Task], pending: &HashSet<TaskId>, filter: FilterMode) -> Projection {
    let done_count = tasks.iter().filter(|task| task.completed).count();
    let views = filter_tasks(tasks, filter)
        .map(|task| TaskView {
            id: task.id.clone(),
            text: task.text.clone(),
            completed: task.completed,
            priority: task.priority,
            created_label: format_created_label(task.created_at),
            removing: pending.contains(&task.id),
        })
        .collect();

    Projection {
        filter,
        tasks: views,
        done_count,
        left_count: tasks.len() - done_count,
    }
}

/// Borrowing filter over the collection, in collection order.
pub fn filter_tasks(tasks: &[Task], filter: FilterMode) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(move |task| filter.matches(task))
}

/// Formats a creation time as short month and day in local time.
pub fn format_created_label(created_at: DateTime<Utc>) -> String {
    created_at
        .with_timezone(&Local)
        .format("%b %-d")
        .to_string()
}
